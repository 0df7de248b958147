//! Backend access for LexiMate: trait seams, reqwest transport, persisted session.

pub mod backend;
mod error;
pub mod session;

#[cfg(feature = "http")]
pub mod http;

pub use backend::{AuthBackend, ChatBackend, DocumentBackend, ProfileBackend};
pub use error::{ApiError, SessionError};
pub use session::{AuthSession, SessionStore};

#[cfg(feature = "http")]
pub use http::ApiClient;
