//! Document preview and PDF download.

use std::path::{Path, PathBuf};

use leximate_client::DocumentBackend;
use leximate_core::RawDocument;
use tracing::{error, info};

use crate::notice::{Notice, Notifier};

pub const NO_PREVIEW: &str = "No preview available for this document.";
pub const NOT_FOUND: &str = "Document not found";
pub const PREVIEW_FAILED: &str = "Failed to fetch document for preview";
pub const NO_DOCUMENT_SELECTED: &str = "No document selected";
pub const DOWNLOAD_FAILED: &str = "Failed to download document";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub title: String,
    /// Shown verbatim; whitespace is significant.
    pub content: String,
}

impl Preview {
    pub fn of(doc: &RawDocument) -> Self {
        let title = format!(
            "{} - {}",
            doc.doc_type.as_deref().unwrap_or("Document"),
            doc.company_name.as_deref().unwrap_or("")
        );
        let content = doc.text().unwrap_or(NO_PREVIEW).to_string();
        Self { title, content }
    }
}

pub fn download_file_name(id: &str) -> String {
    format!("document_{id}.pdf")
}

/// Re-fetch the collection and preview the record with `id`.
pub async fn preview_document<B: DocumentBackend + ?Sized>(
    backend: &B,
    notifier: &dyn Notifier,
    id: &str,
) -> Option<Preview> {
    let docs = match backend.list_documents().await {
        Ok(docs) => docs,
        Err(e) => {
            error!(id, error = %e, "preview fetch failed");
            notifier.notify(Notice::failure(PREVIEW_FAILED));
            return None;
        }
    };
    match docs.iter().find(|d| d.id == id) {
        Some(doc) => Some(Preview::of(doc)),
        None => {
            notifier.notify(Notice::failure(NOT_FOUND));
            None
        }
    }
}

/// Fetch the PDF for `id` into `dir/document_<id>.pdf`.
pub async fn download_document<B: DocumentBackend + ?Sized>(
    backend: &B,
    notifier: &dyn Notifier,
    id: &str,
    dir: &Path,
) -> Option<PathBuf> {
    if id.is_empty() {
        notifier.notify(Notice::failure(NO_DOCUMENT_SELECTED));
        return None;
    }
    match fetch_to(backend, id, dir).await {
        Ok(path) => {
            info!(id, path = %path.display(), "document downloaded");
            Some(path)
        }
        Err(e) => {
            error!(id, error = %e, "download failed");
            notifier.notify(Notice::failure(DOWNLOAD_FAILED));
            None
        }
    }
}

async fn fetch_to<B: DocumentBackend + ?Sized>(
    backend: &B,
    id: &str,
    dir: &Path,
) -> Result<PathBuf, leximate_client::ApiError> {
    let bytes = backend.download_document(id).await?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(download_file_name(id));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
