//! In-memory backend for controller tests. Records every request.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use leximate_client::{ApiError, AuthBackend, ChatBackend, DocumentBackend, ProfileBackend};
use leximate_core::chat::{ChatSession, StoredMessage};
use leximate_core::profile::Profile;
use leximate_core::wire::{ChatRequest, GenerateRequest, GenerateResponse};
use leximate_core::RawDocument;
use serde_json::{Map, Value};

#[derive(Default)]
pub struct FakeState {
    /// Operation names that fail with a 500.
    pub failing: HashSet<&'static str>,

    pub documents: Vec<RawDocument>,
    pub list_calls: usize,
    pub generate_bodies: Vec<Value>,
    /// Scripted replies; when empty the fake upserts honestly.
    pub generate_replies: VecDeque<GenerateResponse>,
    pub next_id: usize,
    pub updates: Vec<(String, Map<String, Value>)>,
    pub deleted: Vec<String>,
    pub pdf: Vec<u8>,

    pub started: usize,
    pub sessions: Vec<ChatSession>,
    pub messages: HashMap<String, Vec<StoredMessage>>,
    pub chat_requests: Vec<ChatRequest>,
    pub reply: Option<String>,
    pub deleted_chats: Vec<String>,

    pub user: Value,
    pub profile_updates: Vec<Profile>,
    pub uploads: Vec<(String, String, usize)>,

    pub me: Option<Value>,
    pub me_tokens: Vec<String>,
    pub logouts: usize,
}

#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with(f: impl FnOnce(&mut FakeState)) -> Arc<Self> {
        let fake = Self::default();
        f(&mut fake.state());
        Arc::new(fake)
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn check(&self, op: &'static str) -> Result<(), ApiError> {
        if self.state().failing.contains(op) {
            return Err(ApiError::Server {
                status: 500,
                body: format!("{op} failed"),
            });
        }
        Ok(())
    }
}

pub fn raw(id: &str, doc_type: &str) -> RawDocument {
    RawDocument {
        id: id.to_string(),
        doc_type: Some(doc_type.to_string()),
        ..Default::default()
    }
}

#[async_trait]
impl DocumentBackend for FakeBackend {
    async fn generate_document(&self, req: &GenerateRequest) -> Result<GenerateResponse, ApiError> {
        let mut s = self.state();
        s.generate_bodies.push(serde_json::to_value(req)?);
        if s.failing.contains("generate") {
            return Err(ApiError::Server {
                status: 500,
                body: "generate failed".into(),
            });
        }
        if let Some(reply) = s.generate_replies.pop_front() {
            return Ok(reply);
        }
        let id = match &req.document_id {
            Some(id) => id.clone(),
            None => {
                s.next_id += 1;
                format!("doc-{}", s.next_id)
            }
        };
        Ok(GenerateResponse {
            success: true,
            document_id: Some(id),
            document_text: Some(format!("{} text", req.document_type.label())),
            status: Some("completed".into()),
            error: None,
        })
    }

    async fn list_documents(&self) -> Result<Vec<RawDocument>, ApiError> {
        self.state().list_calls += 1;
        self.check("list")?;
        Ok(self.state().documents.clone())
    }

    async fn get_document(&self, id: &str) -> Result<RawDocument, ApiError> {
        self.check("get")?;
        self.state()
            .documents
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Server {
                status: 404,
                body: "Document not found".into(),
            })
    }

    async fn update_document(&self, id: &str, fields: &Map<String, Value>) -> Result<(), ApiError> {
        self.check("update")?;
        self.state().updates.push((id.to_string(), fields.clone()));
        Ok(())
    }

    async fn delete_document(&self, id: &str) -> Result<(), ApiError> {
        self.check("delete")?;
        let mut s = self.state();
        s.documents.retain(|d| d.id != id);
        s.deleted.push(id.to_string());
        Ok(())
    }

    async fn download_document(&self, _id: &str) -> Result<Vec<u8>, ApiError> {
        self.check("download")?;
        Ok(self.state().pdf.clone())
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn start_chat(&self) -> Result<String, ApiError> {
        self.check("start_chat")?;
        let mut s = self.state();
        s.started += 1;
        Ok(format!("chat-{}", s.started))
    }

    async fn chat_history(&self) -> Result<Vec<ChatSession>, ApiError> {
        self.check("history")?;
        Ok(self.state().sessions.clone())
    }

    async fn messages(&self, session_id: &str) -> Result<Vec<StoredMessage>, ApiError> {
        self.check("messages")?;
        Ok(self
            .state()
            .messages
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_message(&self, req: &ChatRequest) -> Result<Option<String>, ApiError> {
        self.state().chat_requests.push(req.clone());
        self.check("chat")?;
        Ok(self.state().reply.clone())
    }

    async fn delete_chat(&self, session_id: &str) -> Result<(), ApiError> {
        self.check("delete_chat")?;
        let mut s = self.state();
        s.sessions.retain(|c| c.id != session_id);
        s.deleted_chats.push(session_id.to_string());
        Ok(())
    }
}

#[async_trait]
impl ProfileBackend for FakeBackend {
    async fn get_profile(&self) -> Result<Value, ApiError> {
        self.check("get_profile")?;
        Ok(self.state().user.clone())
    }

    async fn update_profile(&self, profile: &Profile) -> Result<Value, ApiError> {
        self.check("update_profile")?;
        self.state().profile_updates.push(profile.clone());
        Ok(serde_json::to_value(profile)?)
    }

    async fn upload_avatar(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        self.check("upload")?;
        self.state()
            .uploads
            .push((file_name.to_string(), content_type.to_string(), bytes.len()));
        Ok(format!("https://cdn.example.com/{file_name}"))
    }
}

#[async_trait]
impl AuthBackend for FakeBackend {
    async fn me(&self, token: &str) -> Result<Option<Value>, ApiError> {
        self.check("me")?;
        let mut s = self.state();
        s.me_tokens.push(token.to_string());
        Ok(s.me.clone())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.state().logouts += 1;
        self.check("logout")
    }
}
