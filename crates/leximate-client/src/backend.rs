//! Seams between the controllers and the backend.
//!
//! Controllers in `leximate-app` are generic over these traits; the HTTP
//! client implements all of them, and tests substitute in-memory fakes.

use async_trait::async_trait;
use leximate_core::chat::{ChatSession, StoredMessage};
use leximate_core::profile::Profile;
use leximate_core::wire::{ChatRequest, GenerateRequest, GenerateResponse};
use leximate_core::RawDocument;
use serde_json::{Map, Value};

use crate::ApiError;

#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// `POST /generate-document`. Upserts when the request carries a `documentId`.
    async fn generate_document(&self, req: &GenerateRequest)
    -> Result<GenerateResponse, ApiError>;

    /// `GET /documents`, in backend order.
    async fn list_documents(&self) -> Result<Vec<RawDocument>, ApiError>;

    /// `GET /documents/{id}`.
    async fn get_document(&self, id: &str) -> Result<RawDocument, ApiError>;

    /// `PUT /documents/{id}` with only the fields being changed.
    async fn update_document(&self, id: &str, fields: &Map<String, Value>)
    -> Result<(), ApiError>;

    /// `DELETE /documents/{id}`.
    async fn delete_document(&self, id: &str) -> Result<(), ApiError>;

    /// `GET /download-document/{id}`; the PDF bytes.
    async fn download_document(&self, id: &str) -> Result<Vec<u8>, ApiError>;
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `POST /startChat`; the new session id.
    async fn start_chat(&self) -> Result<String, ApiError>;

    /// `GET /chatHistory`, unsorted.
    async fn chat_history(&self) -> Result<Vec<ChatSession>, ApiError>;

    /// `GET /getMessages/{id}`.
    async fn messages(&self, session_id: &str) -> Result<Vec<StoredMessage>, ApiError>;

    /// `POST /chat`; the assistant reply if the backend sent one.
    async fn send_message(&self, req: &ChatRequest) -> Result<Option<String>, ApiError>;

    /// `DELETE /deleteChat/{id}`.
    async fn delete_chat(&self, session_id: &str) -> Result<(), ApiError>;
}

#[async_trait]
pub trait ProfileBackend: Send + Sync {
    /// `GET /getProfile`; the raw user object.
    async fn get_profile(&self) -> Result<Value, ApiError>;

    /// `PUT /updateProfile`; the persisted user object.
    async fn update_profile(&self, profile: &Profile) -> Result<Value, ApiError>;

    /// `POST /uploadProfileImage` (multipart field `avatar`); the public URL.
    async fn upload_avatar(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError>;
}

#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// `GET /api/me` with the given bearer token; `None` if the token maps to no user.
    async fn me(&self, token: &str) -> Result<Option<Value>, ApiError>;

    /// `POST /logout`.
    async fn logout(&self) -> Result<(), ApiError>;
}
