//! The AI legal-assistant chat.

use std::sync::Arc;

use chrono::Utc;
use leximate_client::ChatBackend;
use leximate_core::chat::{FALLBACK_REPLY, GREETING, SUGGESTED_QUESTIONS, sort_history};
use leximate_core::wire::ChatRequest;
use leximate_core::{ChatSession, DeliveryState, Message};
use tracing::{debug, error, info, warn};

use crate::notice::{Notice, Notifier};

pub const DELETE_CHAT_FAILED: &str = "Failed to delete chat";

pub struct ChatView<B> {
    backend: Arc<B>,
    notifier: Arc<dyn Notifier>,
    session_id: Option<String>,
    messages: Vec<Message>,
    history: Vec<ChatSession>,
    input: String,
    next_id: u64,
}

impl<B: ChatBackend> ChatView<B> {
    pub fn new(backend: Arc<B>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            session_id: None,
            messages: Vec::new(),
            history: Vec::new(),
            input: String::new(),
            next_id: 1,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn history(&self) -> &[ChatSession] {
        &self.history
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Suggested questions, offered only while the greeting stands alone.
    pub fn suggestions(&self) -> &'static [&'static str] {
        if self.messages.len() == 1 {
            &SUGGESTED_QUESTIONS
        } else {
            &[]
        }
    }

    /// Start a fresh session, seed the greeting and load history.
    pub async fn enter(&mut self) {
        self.session_id = match self.backend.start_chat().await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, "could not start chat session");
                None
            }
        };
        self.messages.clear();
        let greeting = self.message(GREETING, false, DeliveryState::Confirmed);
        self.messages.push(greeting);
        self.reload_history().await;
    }

    pub async fn reload_history(&mut self) {
        match self.backend.chat_history().await {
            Ok(mut sessions) => {
                sort_history(&mut sessions);
                debug!(count = sessions.len(), "chat history loaded");
                self.history = sessions;
            }
            Err(e) => warn!(error = %e, "chat history reload failed"),
        }
    }

    /// Replace the transcript with a stored session's messages.
    pub async fn select(&mut self, session_id: &str) -> bool {
        match self.backend.messages(session_id).await {
            Ok(stored) => {
                let now = Utc::now();
                let mut messages = Vec::with_capacity(stored.len());
                for m in &stored {
                    messages.push(Message::from_stored(self.take_id(), m, now));
                }
                self.messages = messages;
                self.session_id = Some(session_id.to_string());
                info!(session_id, count = self.messages.len(), "chat session opened");
                true
            }
            Err(e) => {
                warn!(session_id, error = %e, "could not load chat messages");
                false
            }
        }
    }

    /// Send the current input. The user message is shown before the reply
    /// arrives and is marked `Failed` if the send does not go through.
    pub async fn send(&mut self) {
        let Some(session_id) = self.session_id.clone() else {
            return;
        };
        // Blank input is ignored; anything else goes out exactly as typed.
        if self.input.trim().is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.input);
        let user = self.message(&text, true, DeliveryState::Pending);
        let user_id = user.id;
        self.messages.push(user);

        let req = ChatRequest {
            session_id,
            message: text,
        };
        match self.backend.send_message(&req).await {
            Ok(reply) => {
                self.mark(user_id, DeliveryState::Confirmed);
                let reply = reply.filter(|r| !r.trim().is_empty());
                let reply = self.message(
                    reply.as_deref().unwrap_or(FALLBACK_REPLY),
                    false,
                    DeliveryState::Confirmed,
                );
                self.messages.push(reply);
                self.reload_history().await;
            }
            Err(e) => {
                self.mark(user_id, DeliveryState::Failed);
                warn!(session_id = %req.session_id, error = %e, "chat send failed");
            }
        }
    }

    /// Delete a stored session; deleting the open one starts a new chat.
    pub async fn delete(&mut self, session_id: &str) -> bool {
        if let Err(e) = self.backend.delete_chat(session_id).await {
            error!(session_id, error = %e, "delete chat failed");
            self.notifier.notify(Notice::failure(DELETE_CHAT_FAILED));
            return false;
        }
        self.history.retain(|s| s.id != session_id);
        info!(session_id, "chat session deleted");
        if self.session_id.as_deref() == Some(session_id) {
            self.enter().await;
        }
        true
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn message(&mut self, content: &str, is_user: bool, delivery: DeliveryState) -> Message {
        Message {
            id: self.take_id(),
            content: content.to_string(),
            is_user,
            timestamp: Utc::now(),
            delivery,
        }
    }

    fn mark(&mut self, id: u64, delivery: DeliveryState) {
        if let Some(m) = self.messages.iter_mut().find(|m| m.id == id) {
            m.delivery = delivery;
        }
    }
}
