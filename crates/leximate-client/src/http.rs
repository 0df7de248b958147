//! HTTP client for the LexiMate backend's REST surface.

use async_trait::async_trait;
use leximate_core::RawDocument;
use leximate_core::chat::{ChatSession, StoredMessage};
use leximate_core::profile::Profile;
use leximate_core::wire::{
    Ack, ChatHistoryResponse, ChatReply, ChatRequest, DocumentResponse, DocumentsResponse,
    GenerateRequest, GenerateResponse, MessagesResponse, StartChatResponse, UploadResponse,
    UserResponse,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::backend::{AuthBackend, ChatBackend, DocumentBackend, ProfileBackend};
use crate::ApiError;

/// Client for the backend's document, chat, profile and auth endpoints.
///
/// Every request carries `Authorization: Bearer <token>` once a token is set.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the given backend base URL.
    ///
    /// `base_url` should be like `http://localhost:5000`; a trailing slash is trimmed.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `<base><prefix>/<id>`, with `id` percent-encoded as a single segment.
    fn item_url(&self, prefix: &str, id: &str) -> Result<reqwest::Url, ApiError> {
        let raw = self.url(prefix);
        let mut url =
            reqwest::Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(raw.clone()))?
            .push(id);
        Ok(url)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn checked(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = Self::checked(self.authed(req).send().await?).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl DocumentBackend for ApiClient {
    async fn generate_document(
        &self,
        req: &GenerateRequest,
    ) -> Result<GenerateResponse, ApiError> {
        let url = self.url("/generate-document");
        info!(
            url = %url,
            intent = req.intent().as_str(),
            document_type = %req.document_type,
            reuse = req.document_id.is_some(),
            "writing document"
        );
        let resp: GenerateResponse = self.send_json(self.client.post(&url).json(req)).await?;
        if !resp.success {
            return Err(ApiError::rejected("/generate-document", resp.error));
        }
        Ok(resp)
    }

    async fn list_documents(&self) -> Result<Vec<RawDocument>, ApiError> {
        let url = self.url("/documents");
        debug!(url = %url, "listing documents");
        let resp: DocumentsResponse = self.send_json(self.client.get(&url)).await?;
        if !resp.success {
            return Err(ApiError::rejected("/documents", None));
        }
        info!(count = resp.documents.len(), "listed documents");
        Ok(resp.documents)
    }

    async fn get_document(&self, id: &str) -> Result<RawDocument, ApiError> {
        let url = self.item_url("/documents", id)?;
        let path = url.path().to_string();
        let resp: DocumentResponse = self.send_json(self.client.get(url)).await?;
        if !resp.success {
            return Err(ApiError::rejected(&path, None));
        }
        resp.document.ok_or_else(|| ApiError::missing(&path, "document"))
    }

    async fn update_document(
        &self,
        id: &str,
        fields: &Map<String, Value>,
    ) -> Result<(), ApiError> {
        let url = self.item_url("/documents", id)?;
        let path = url.path().to_string();
        info!(id, fields = fields.len(), "updating document");
        let ack: Ack = self.send_json(self.client.put(url).json(fields)).await?;
        if !ack.success {
            return Err(ApiError::rejected(&path, ack.error.or(ack.message)));
        }
        Ok(())
    }

    async fn delete_document(&self, id: &str) -> Result<(), ApiError> {
        let url = self.item_url("/documents", id)?;
        let path = url.path().to_string();
        info!(id, "deleting document");
        let ack: Ack = self.send_json(self.client.delete(url)).await?;
        if !ack.success {
            return Err(ApiError::rejected(&path, ack.error.or(ack.message)));
        }
        Ok(())
    }

    async fn download_document(&self, id: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.item_url("/download-document", id)?;
        info!(url = %url, "downloading document");
        let resp = Self::checked(self.authed(self.client.get(url)).send().await?).await?;
        let bytes = resp.bytes().await?;
        info!(bytes = bytes.len(), "download complete");
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn start_chat(&self) -> Result<String, ApiError> {
        let resp: StartChatResponse = self
            .send_json(self.client.post(self.url("/startChat")))
            .await?;
        if !resp.success {
            return Err(ApiError::rejected("/startChat", None));
        }
        let id = resp
            .session_id
            .ok_or_else(|| ApiError::missing("/startChat", "session_id"))?;
        info!(session_id = %id, "chat session started");
        Ok(id)
    }

    async fn chat_history(&self) -> Result<Vec<ChatSession>, ApiError> {
        let resp: ChatHistoryResponse = self
            .send_json(self.client.get(self.url("/chatHistory")))
            .await?;
        if !resp.success {
            return Err(ApiError::rejected("/chatHistory", None));
        }
        Ok(resp.chats)
    }

    async fn messages(&self, session_id: &str) -> Result<Vec<StoredMessage>, ApiError> {
        let url = self.item_url("/getMessages", session_id)?;
        let path = url.path().to_string();
        let resp: MessagesResponse = self.send_json(self.client.get(url)).await?;
        if !resp.success {
            return Err(ApiError::rejected(&path, None));
        }
        Ok(resp.messages)
    }

    async fn send_message(&self, req: &ChatRequest) -> Result<Option<String>, ApiError> {
        debug!(session_id = %req.session_id, "sending chat message");
        let reply: ChatReply = self
            .send_json(self.client.post(self.url("/chat")).json(req))
            .await?;
        Ok(reply.reply)
    }

    async fn delete_chat(&self, session_id: &str) -> Result<(), ApiError> {
        let url = self.item_url("/deleteChat", session_id)?;
        let path = url.path().to_string();
        let ack: Ack = self.send_json(self.client.delete(url)).await?;
        if !ack.success {
            return Err(ApiError::rejected(&path, ack.error.or(ack.message)));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileBackend for ApiClient {
    async fn get_profile(&self) -> Result<Value, ApiError> {
        let resp: UserResponse = self
            .send_json(self.client.get(self.url("/getProfile")))
            .await?;
        if !resp.success {
            return Err(ApiError::rejected("/getProfile", None));
        }
        resp.user.ok_or_else(|| ApiError::missing("/getProfile", "user"))
    }

    async fn update_profile(&self, profile: &Profile) -> Result<Value, ApiError> {
        let resp: UserResponse = self
            .send_json(self.client.put(self.url("/updateProfile")).json(profile))
            .await?;
        if !resp.success {
            return Err(ApiError::rejected("/updateProfile", None));
        }
        resp.user
            .ok_or_else(|| ApiError::missing("/updateProfile", "user"))
    }

    async fn upload_avatar(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        info!(file_name, bytes = bytes.len(), "uploading avatar");
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new().part("avatar", part);
        let resp: UploadResponse = self
            .send_json(self.client.post(self.url("/uploadProfileImage")).multipart(form))
            .await?;
        match (resp.success, resp.url) {
            (true, Some(url)) => Ok(url),
            (true, None) => Err(ApiError::missing("/uploadProfileImage", "url")),
            (false, _) => Err(ApiError::rejected("/uploadProfileImage", resp.message)),
        }
    }
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn me(&self, token: &str) -> Result<Option<Value>, ApiError> {
        let req = self.client.get(self.url("/api/me")).bearer_auth(token);
        let resp = Self::checked(req.send().await?).await?;
        let body: UserResponse = serde_json::from_slice(&resp.bytes().await?)?;
        Ok(body.user)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let resp = self.authed(self.client.post(self.url("/logout"))).send().await?;
        Self::checked(resp).await?;
        info!("logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:5000/".into());
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/documents"), "http://localhost:5000/documents");
    }

    #[test]
    fn item_ids_are_one_encoded_segment() {
        let client = ApiClient::new("http://localhost:5000/".into());
        let url = client.item_url("/documents", "abc123").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/documents/abc123");

        let url = client.item_url("/deleteChat", "a b/c?d#e").unwrap();
        assert_eq!(url.path(), "/deleteChat/a%20b%2Fc%3Fd%23e");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn service_base_path_is_kept() {
        let client = ApiClient::new("https://api.example.com/v1".into());
        let url = client.item_url("/download-document", "d1").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/download-document/d1");
    }

    #[test]
    fn token_is_optional() {
        let client = ApiClient::new("http://localhost:5000".into());
        assert!(client.token.is_none());
        let client = client.with_token(Some("tok".into()));
        assert_eq!(client.token.as_deref(), Some("tok"));
    }
}
