//! Request and response bodies exchanged with the LexiMate backend.

use serde::{Deserialize, Serialize};

use crate::chat::{ChatSession, StoredMessage};
use crate::draft::{DocumentType, DraftForm};
use crate::record::RawDocument;

/// Page number the review step reports when marking a document pending.
pub const REVIEW_PAGE: u8 = 4;

/// Which of the three writes a `/generate-document` call performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteIntent {
    /// Placeholder record created on reaching the review step.
    MarkPending,
    SaveDraft,
    Generate,
}

impl WriteIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MarkPending => "mark_pending",
            Self::SaveDraft => "save_draft",
            Self::Generate => "generate",
        }
    }
}

/// Body of `POST /generate-document`.
///
/// Carries every draft field plus exactly one control flag
/// (`generateNow`, `saveAsDraft` or `currentPage`) and, once the session
/// holds one, the `documentId` the backend should upsert into.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub document_type: DocumentType,
    #[serde(flatten)]
    pub form: DraftForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    generate_now: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    save_as_draft: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_page: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

impl GenerateRequest {
    pub fn new(
        intent: WriteIntent,
        document_type: DocumentType,
        form: DraftForm,
        document_id: Option<String>,
    ) -> Self {
        let (generate_now, save_as_draft, current_page) = match intent {
            WriteIntent::MarkPending => (None, None, Some(REVIEW_PAGE)),
            WriteIntent::SaveDraft => (None, Some(true), None),
            WriteIntent::Generate => (Some(true), None, None),
        };
        Self {
            document_type,
            form,
            generate_now,
            save_as_draft,
            current_page,
            document_id,
        }
    }

    pub fn intent(&self) -> WriteIntent {
        if self.generate_now.is_some() {
            WriteIntent::Generate
        } else if self.save_as_draft.is_some() {
            WriteIntent::SaveDraft
        } else {
            WriteIntent::MarkPending
        }
    }
}

/// Reply to `POST /generate-document`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateResponse {
    pub success: bool,
    pub document_id: Option<String>,
    pub document_text: Option<String>,
    pub status: Option<String>,
    pub error: Option<String>,
}

/// Reply to `GET /documents`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocumentsResponse {
    pub success: bool,
    pub documents: Vec<RawDocument>,
}

/// Reply to `GET /documents/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocumentResponse {
    pub success: bool,
    pub document: Option<RawDocument>,
}

/// Generic `{ success, message?, error? }` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Ack {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StartChatResponse {
    pub success: bool,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChatHistoryResponse {
    pub success: bool,
    pub chats: Vec<ChatSession>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessagesResponse {
    pub success: bool,
    pub messages: Vec<StoredMessage>,
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChatReply {
    pub reply: Option<String>,
}

/// Reply to `GET /getProfile`, `PUT /updateProfile` and `GET /api/me`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserResponse {
    pub success: bool,
    pub user: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UploadResponse {
    pub success: bool,
    pub url: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::DraftField;

    fn form() -> DraftForm {
        let mut f = DraftForm::default();
        f.set(DraftField::DisclosingParty, "Acme");
        f
    }

    #[test]
    fn mark_pending_sends_current_page_only() {
        let req = GenerateRequest::new(WriteIntent::MarkPending, DocumentType::Nda, form(), None);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["documentType"], "nda");
        assert_eq!(json["disclosingParty"], "Acme");
        assert_eq!(json["currentPage"], 4);
        assert!(json.get("generateNow").is_none());
        assert!(json.get("saveAsDraft").is_none());
        assert!(json.get("documentId").is_none());
    }

    #[test]
    fn exactly_one_control_flag_per_intent() {
        for intent in [
            WriteIntent::MarkPending,
            WriteIntent::SaveDraft,
            WriteIntent::Generate,
        ] {
            let req = GenerateRequest::new(intent, DocumentType::Service, form(), Some("d1".into()));
            assert_eq!(req.intent(), intent);
            let json = serde_json::to_value(&req).unwrap();
            let flags = ["generateNow", "saveAsDraft", "currentPage"]
                .iter()
                .filter(|k| json.get(**k).is_some())
                .count();
            assert_eq!(flags, 1, "{intent:?}");
            assert_eq!(json["documentId"], "d1");
        }
    }

    #[test]
    fn generate_response_tolerates_partial_bodies() {
        let resp: GenerateResponse = serde_json::from_str(r#"{"error":"Invalid request"}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.document_id.is_none());

        let resp: GenerateResponse = serde_json::from_str(
            r#"{"success":true,"documentId":"d1","documentText":"NDA","status":"completed"}"#,
        )
        .unwrap();
        assert_eq!(resp.document_id.as_deref(), Some("d1"));
        assert_eq!(resp.document_text.as_deref(), Some("NDA"));
    }

    #[test]
    fn chat_request_uses_snake_case() {
        let req = ChatRequest {
            session_id: "s1".into(),
            message: "hi".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["session_id"], "s1");
    }
}
