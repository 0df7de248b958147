//! Chat assistant sessions and messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Assistant greeting seeded locally into every fresh session.
pub const GREETING: &str = "Hello! I'm your LexiMate AI assistant. I'm here to help you with legal questions. How can I assist you with today?";

/// Shown in place of an empty assistant reply.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong.";

pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "What should I include in an NDA?",
    "How do I protect intellectual property?",
    "What are standard contract terms?",
    "Explain liability clauses",
];

/// A chat session as listed in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ChatSession {
    fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated_at
            .as_deref()
            .and_then(crate::record::parse_timestamp)
            .map(|dt| dt.and_utc())
    }
}

/// Most recently updated first; sessions without a timestamp sink to the end.
pub fn sort_history(sessions: &mut [ChatSession]) {
    sessions.sort_by_key(|s| std::cmp::Reverse(s.updated()));
}

/// Who wrote a persisted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// A message as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    #[serde(default)]
    pub session_id: String,
    pub sender: Sender,
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Delivery state of a message in the local transcript.
///
/// Sends are optimistic: the user's message is shown as `Pending` at once,
/// then settles to `Confirmed` or `Failed` when the backend answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    Pending,
    Confirmed,
    Failed,
}

/// A message in the local transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub content: String,
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
    pub delivery: DeliveryState,
}

impl Message {
    pub fn from_stored(id: u64, stored: &StoredMessage, now: DateTime<Utc>) -> Self {
        let timestamp = stored
            .timestamp
            .as_deref()
            .and_then(crate::record::parse_timestamp)
            .map(|dt| dt.and_utc())
            .unwrap_or(now);
        Self {
            id,
            content: stored.message.clone(),
            is_user: stored.sender == Sender::User,
            timestamp,
            delivery: DeliveryState::Confirmed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str, updated: Option<&str>) -> ChatSession {
        ChatSession {
            id: id.into(),
            title: format!("chat {id}"),
            created_at: None,
            updated_at: updated.map(Into::into),
        }
    }

    #[test]
    fn history_sorted_newest_first() {
        let mut sessions = vec![
            session("a", Some("2026-01-01T00:00:00")),
            session("b", None),
            session("c", Some("2026-02-01T00:00:00")),
        ];
        sort_history(&mut sessions);
        let ids: Vec<_> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn history_with_http_dates_sorted_newest_first() {
        let mut sessions = vec![
            session("old", Some("Mon, 12 Oct 2026 09:00:00 GMT")),
            session("new", Some("Wed, 14 Oct 2026 10:00:00 GMT")),
            session("mid", Some("Tue, 13 Oct 2026 23:59:59 GMT")),
        ];
        sort_history(&mut sessions);
        let ids: Vec<_> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn stored_message_maps_sender_and_timestamp() {
        let json = r#"{"session_id":"s1","user_id":"u1","sender":"user","message":"hi","timestamp":"2026-02-21T10:00:00"}"#;
        let stored: StoredMessage = serde_json::from_str(json).unwrap();
        let msg = Message::from_stored(7, &stored, Utc::now());
        assert!(msg.is_user);
        assert_eq!(msg.content, "hi");
        assert_eq!(msg.timestamp.format("%Y-%m-%d").to_string(), "2026-02-21");
        assert_eq!(msg.delivery, DeliveryState::Confirmed);
    }

    #[test]
    fn missing_timestamp_uses_now() {
        let stored = StoredMessage {
            session_id: "s1".into(),
            sender: Sender::Assistant,
            message: "hello".into(),
            timestamp: None,
        };
        let now = Utc::now();
        let msg = Message::from_stored(1, &stored, now);
        assert!(!msg.is_user);
        assert_eq!(msg.timestamp, now);
    }
}
