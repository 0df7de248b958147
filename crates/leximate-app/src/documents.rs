//! The document list: load, filter, edit and delete.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use leximate_client::DocumentBackend;
use leximate_core::record::normalize_all;
use leximate_core::{DashboardSummary, DocumentFilter, DocumentRecord, EditForm, RawDocument, summarize};
use tracing::{error, info, warn};

use crate::notice::{Notice, Notifier};
use crate::viewer::{self, Preview};

pub const DELETED: &str = "Document deleted";
pub const DELETE_FAILED: &str = "Failed to delete document";
pub const UPDATED: &str = "Document updated";
pub const UPDATE_FAILED: &str = "Failed to update document";
pub const EDIT_LOAD_FAILED: &str = "Failed to load document for editing";

pub struct DocumentsView<B> {
    backend: Arc<B>,
    notifier: Arc<dyn Notifier>,
    raw: Vec<RawDocument>,
    records: Vec<DocumentRecord>,
}

impl<B: DocumentBackend> DocumentsView<B> {
    pub fn new(backend: Arc<B>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            raw: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Fetch and normalize the collection, keeping backend order.
    ///
    /// A failed fetch keeps the previous list and returns `false`.
    pub async fn load(&mut self) -> bool {
        match self.backend.list_documents().await {
            Ok(docs) => {
                self.records = normalize_all(&docs);
                self.raw = docs;
                info!(count = self.records.len(), "documents loaded");
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to load documents");
                false
            }
        }
    }

    pub fn records(&self) -> &[DocumentRecord] {
        &self.records
    }

    pub fn filter(&self, filter: &DocumentFilter) -> Vec<&DocumentRecord> {
        filter.apply(&self.records)
    }

    pub fn summary(&self) -> DashboardSummary {
        summarize(&self.raw)
    }

    pub async fn delete(&mut self, id: &str) -> bool {
        match self.backend.delete_document(id).await {
            Ok(()) => {
                self.records.retain(|d| d.id != id);
                self.raw.retain(|d| d.id != id);
                info!(id, "document deleted");
                self.notifier.notify(Notice::info(DELETED));
                true
            }
            Err(e) => {
                error!(id, error = %e, "delete failed");
                self.notifier.notify(Notice::failure(DELETE_FAILED));
                false
            }
        }
    }

    pub async fn open_edit(&self, id: &str) -> Option<EditForm> {
        match self.backend.get_document(id).await {
            Ok(doc) => Some(EditForm::from_raw(&doc)),
            Err(e) => {
                error!(id, error = %e, "could not load document for editing");
                self.notifier.notify(Notice::failure(EDIT_LOAD_FAILED));
                None
            }
        }
    }

    /// Send the non-empty fields of `edit` and patch the local record.
    pub async fn submit_edit(&mut self, id: &str, edit: &EditForm) -> bool {
        let payload = edit.to_payload();
        match self.backend.update_document(id, &payload).await {
            Ok(()) => {
                let today = chrono::Local::now().date_naive();
                if let Some(doc) = self.records.iter_mut().find(|d| d.id == id) {
                    edit.apply_to(doc, today);
                }
                if let Some(raw) = self.raw.iter_mut().find(|d| d.id == id) {
                    edit.apply_to_raw(raw);
                }
                info!(id, fields = payload.len(), "document updated");
                self.notifier.notify(Notice::info(UPDATED));
                true
            }
            Err(e) => {
                error!(id, error = %e, "update failed");
                self.notifier.notify(Notice::failure(UPDATE_FAILED));
                false
            }
        }
    }

    pub async fn preview(&self, id: &str) -> Option<Preview> {
        viewer::preview_document(self.backend.as_ref(), self.notifier.as_ref(), id).await
    }

    pub async fn download(&self, id: &str, dir: &Path) -> Option<PathBuf> {
        viewer::download_document(self.backend.as_ref(), self.notifier.as_ref(), id, dir).await
    }
}
