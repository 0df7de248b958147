//! Shared LexiMate types: draft forms, stored documents, chat and profile.

pub mod chat;
pub mod dashboard;
pub mod draft;
pub mod profile;
pub mod record;
pub mod wire;

pub use chat::{ChatSession, DeliveryState, Message};
pub use dashboard::{DashboardSummary, summarize};
pub use draft::{DocumentType, DraftField, DraftForm};
pub use profile::{AvatarError, Profile};
pub use record::{DocumentFilter, DocumentRecord, DocumentStatus, EditForm, RawDocument};
pub use wire::{GenerateRequest, GenerateResponse, WriteIntent};
