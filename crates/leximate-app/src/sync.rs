//! Keeps one backend document per wizard session.
//!
//! Whichever write returns an id first (mark-pending, save-draft or
//! generate) fixes the session's document id. Every later write sends it
//! back as `documentId`, and a reply naming a different id never replaces it.

use std::sync::Arc;

use leximate_client::{ApiError, DocumentBackend};
use leximate_core::wire::{GenerateRequest, GenerateResponse, WriteIntent};
use leximate_core::{DocumentType, DraftForm};
use tracing::{debug, error, info, warn};

use crate::notice::{Notice, Notifier};

pub const DRAFT_SAVED: &str = "Draft saved";
pub const DRAFT_SAVE_FAILED: &str = "Failed to save draft";
pub const GENERATED: &str = "Document generated successfully!";
pub const GENERATE_FAILED: &str = "Failed to generate document.";

/// What to do after a mark-pending write fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PendingRetry {
    /// Never fire again for this session.
    #[default]
    Abandon,
    /// Fire again the next time the review step is entered.
    RetryOnReentry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub id: String,
    pub text: String,
    pub status: Option<String>,
}

pub struct DraftSynchronizer<B> {
    backend: Arc<B>,
    notifier: Arc<dyn Notifier>,
    retry: PendingRetry,
    pending_id: Option<String>,
    generated: Option<GeneratedDocument>,
    pending_attempted: bool,
}

impl<B: DocumentBackend> DraftSynchronizer<B> {
    pub fn new(backend: Arc<B>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            retry: PendingRetry::default(),
            pending_id: None,
            generated: None,
            pending_attempted: false,
        }
    }

    pub fn with_retry(mut self, retry: PendingRetry) -> Self {
        self.retry = retry;
        self
    }

    pub fn pending_id(&self) -> Option<&str> {
        self.pending_id.as_deref()
    }

    pub fn generated(&self) -> Option<&GeneratedDocument> {
        self.generated.as_ref()
    }

    /// Id the wizard downloads: the generated document's, else the pending one.
    pub fn document_id(&self) -> Option<&str> {
        self.generated
            .as_ref()
            .map(|g| g.id.as_str())
            .or(self.pending_id.as_deref())
    }

    /// Create the placeholder record on entering review.
    ///
    /// Returns whether a write was attempted. Failures are logged only.
    pub async fn mark_pending(&mut self, document_type: DocumentType, form: &DraftForm) -> bool {
        if self.generated.is_some() || self.pending_id.is_some() {
            return false;
        }
        if self.pending_attempted && self.retry == PendingRetry::Abandon {
            debug!("mark-pending already attempted this session");
            return false;
        }
        self.pending_attempted = true;

        let result = self.write(WriteIntent::MarkPending, document_type, form).await;
        match result.and_then(|resp| returned_id(resp, WriteIntent::MarkPending)) {
            Ok((id, _)) => {
                self.adopt(id);
                info!(id = self.pending_id.as_deref().unwrap_or_default(), "document marked pending");
            }
            Err(e) => warn!(error = %e, "mark-pending failed"),
        }
        true
    }

    /// Save without generating. Returns the held id on success.
    pub async fn save_draft(
        &mut self,
        document_type: DocumentType,
        form: &DraftForm,
    ) -> Option<String> {
        let result = self.write(WriteIntent::SaveDraft, document_type, form).await;
        match result.and_then(|resp| returned_id(resp, WriteIntent::SaveDraft)) {
            Ok((id, _)) => {
                self.adopt(id);
                info!(id = self.pending_id.as_deref().unwrap_or_default(), "draft saved");
                self.notifier.notify(Notice::info(DRAFT_SAVED));
                self.pending_id.clone()
            }
            Err(e) => {
                error!(error = %e, "save draft failed");
                self.notifier.notify(Notice::failure(DRAFT_SAVE_FAILED));
                None
            }
        }
    }

    pub async fn generate(
        &mut self,
        document_type: DocumentType,
        form: &DraftForm,
    ) -> Option<&GeneratedDocument> {
        let result = self.write(WriteIntent::Generate, document_type, form).await;
        match result.and_then(|resp| returned_id(resp, WriteIntent::Generate)) {
            Ok((id, resp)) => {
                self.adopt(id);
                let id = self.pending_id.clone().unwrap_or_default();
                info!(id = %id, "document generated");
                self.generated = Some(GeneratedDocument {
                    id,
                    text: resp.document_text.unwrap_or_default(),
                    status: resp.status,
                });
                self.notifier.notify(Notice::info(GENERATED));
                self.generated.as_ref()
            }
            Err(e) => {
                error!(error = %e, "generate failed");
                self.notifier.notify(Notice::failure(GENERATE_FAILED));
                None
            }
        }
    }

    /// Load an existing document into `form` and adopt its id.
    ///
    /// Non-null stored fields overwrite the form; the rest keep their value.
    /// Returns the stored document type when it is recognized. A failed
    /// fetch or an unknown id leaves everything untouched.
    pub async fn resume(&mut self, id: &str, form: &mut DraftForm) -> Option<DocumentType> {
        let docs = match self.backend.list_documents().await {
            Ok(docs) => docs,
            Err(e) => {
                warn!(id, error = %e, "could not load document for editing");
                return None;
            }
        };
        let Some(doc) = docs.iter().find(|d| d.id == id) else {
            warn!(id, "document to resume not found");
            return None;
        };
        doc.merge_into(form);
        self.pending_id = Some(doc.id.clone());
        info!(id, "resumed document");
        doc.document_type()
    }

    async fn write(
        &self,
        intent: WriteIntent,
        document_type: DocumentType,
        form: &DraftForm,
    ) -> Result<GenerateResponse, ApiError> {
        let req = GenerateRequest::new(intent, document_type, form.clone(), self.pending_id.clone());
        self.backend.generate_document(&req).await
    }

    fn adopt(&mut self, id: String) {
        match &self.pending_id {
            None => self.pending_id = Some(id),
            Some(held) if *held != id => {
                warn!(held = %held, returned = %id, "backend returned a different document id; keeping the held one");
            }
            Some(_) => {}
        }
    }
}

fn returned_id(
    resp: GenerateResponse,
    intent: WriteIntent,
) -> Result<(String, GenerateResponse), ApiError> {
    if !resp.success {
        return Err(ApiError::rejected("/generate-document", resp.error));
    }
    match resp.document_id.clone().filter(|id| !id.is_empty()) {
        Some(id) => Ok((id, resp)),
        None => {
            debug!(intent = intent.as_str(), "reply without documentId");
            Err(ApiError::missing("/generate-document", "documentId"))
        }
    }
}
