//! Controllers behind the LexiMate client: the document wizard and its
//! backend synchronizer, the document list, chat, profile, dashboard polling
//! and the login session.
//!
//! Every controller is generic over the backend traits in `leximate-client`
//! and reports user-facing outcomes through a [`Notifier`].

pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod documents;
pub mod draft;
pub mod notice;
pub mod profile;
pub mod sync;
pub mod viewer;
pub mod wizard;

#[cfg(test)]
mod fakes;

pub use auth::{AuthContext, AuthError};
pub use chat::ChatView;
pub use dashboard::DashboardPoller;
pub use documents::DocumentsView;
pub use draft::DraftEditor;
pub use notice::{LogNotifier, Notice, NoticeKind, Notifier, RecordingNotifier};
pub use profile::ProfileEditor;
pub use sync::{DraftSynchronizer, GeneratedDocument, PendingRetry};
pub use viewer::Preview;
pub use wizard::{Step, StepController, Transition, WizardError};
