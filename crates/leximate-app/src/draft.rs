//! The document wizard wired to its synchronizer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use leximate_client::DocumentBackend;
use leximate_core::{DocumentType, DraftField, DraftForm};
use tracing::debug;

use crate::notice::{Notice, Notifier};
use crate::sync::{DraftSynchronizer, GeneratedDocument, PendingRetry};
use crate::viewer::{self, Preview};
use crate::wizard::{Step, StepController, Transition, WizardError};

pub const NOT_GENERATED: &str = "Please generate the document first!";
pub const GENERATE_TO_PREVIEW: &str = "Generate the document to preview it.";

pub struct DraftEditor<B> {
    backend: Arc<B>,
    notifier: Arc<dyn Notifier>,
    steps: StepController,
    document_type: Option<DocumentType>,
    form: DraftForm,
    sync: DraftSynchronizer<B>,
}

impl<B: DocumentBackend> DraftEditor<B> {
    pub fn new(backend: Arc<B>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            sync: DraftSynchronizer::new(backend.clone(), notifier.clone()),
            backend,
            notifier,
            steps: StepController::new(),
            document_type: None,
            form: DraftForm::default(),
        }
    }

    pub fn with_retry(mut self, retry: PendingRetry) -> Self {
        self.sync = self.sync.with_retry(retry);
        self
    }

    pub fn step(&self) -> Step {
        self.steps.step()
    }

    pub fn document_type(&self) -> Option<DocumentType> {
        self.document_type
    }

    pub fn form(&self) -> &DraftForm {
        &self.form
    }

    pub fn synchronizer(&self) -> &DraftSynchronizer<B> {
        &self.sync
    }

    pub fn select_type(&mut self, document_type: DocumentType) {
        self.document_type = Some(document_type);
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Advance one step. Arriving at review creates the pending record.
    pub async fn next(&mut self) -> Result<Step, WizardError> {
        match self.steps.next(self.document_type)? {
            Transition::Moved(step) => Ok(step),
            Transition::EnteredReview => {
                if let Some(ty) = self.document_type {
                    self.sync.mark_pending(ty, &self.form).await;
                }
                Ok(Step::Review)
            }
        }
    }

    pub fn back(&mut self) -> Step {
        self.steps.back()
    }

    pub async fn save_draft(&mut self) -> Option<String> {
        let ty = self.require_type()?;
        self.sync.save_draft(ty, &self.form).await
    }

    pub async fn generate(&mut self) -> Option<&GeneratedDocument> {
        let ty = self.require_type()?;
        self.sync.generate(ty, &self.form).await
    }

    /// Load a stored document for editing.
    pub async fn resume(&mut self, id: &str) -> bool {
        let before = self.sync.pending_id().map(str::to_string);
        if let Some(ty) = self.sync.resume(id, &mut self.form).await {
            self.document_type = Some(ty);
        }
        self.sync.pending_id().is_some() && self.sync.pending_id() != before.as_deref()
    }

    /// Preview panel on the review step.
    pub fn review_preview(&self) -> Preview {
        let label = self.document_type.map(DocumentType::label).unwrap_or("Document");
        let content = self
            .sync
            .generated()
            .map(|g| g.text.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(GENERATE_TO_PREVIEW);
        Preview {
            title: format!("Preview - {label}"),
            content: content.to_string(),
        }
    }

    /// Full-page preview; requires generated text.
    pub fn open_preview(&self) -> Option<Preview> {
        let has_text = self.sync.generated().is_some_and(|g| !g.text.is_empty());
        if !has_text {
            self.notifier.notify(Notice::failure(NOT_GENERATED));
            return None;
        }
        Some(self.review_preview())
    }

    pub async fn download(&self, dir: &Path) -> Option<PathBuf> {
        let Some(id) = self.sync.document_id() else {
            self.notifier.notify(Notice::failure(NOT_GENERATED));
            return None;
        };
        viewer::download_document(self.backend.as_ref(), self.notifier.as_ref(), id, dir).await
    }

    fn require_type(&self) -> Option<DocumentType> {
        if self.document_type.is_none() {
            debug!("write attempted without a document type");
            self.notifier
                .notify(Notice::failure(WizardError::TypeNotSelected.to_string()));
        }
        self.document_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeBackend, raw};
    use crate::notice::RecordingNotifier;

    fn editor(backend: Arc<FakeBackend>) -> (DraftEditor<FakeBackend>, Arc<RecordingNotifier>) {
        let notes = Arc::new(RecordingNotifier::new());
        (DraftEditor::new(backend, notes.clone()), notes)
    }

    async fn to_review(ed: &mut DraftEditor<FakeBackend>) {
        ed.next().await.unwrap();
        ed.next().await.unwrap();
        assert_eq!(ed.next().await.unwrap(), Step::Review);
    }

    #[tokio::test]
    async fn acme_nda_scenario() {
        let backend = FakeBackend::new();
        let (mut ed, _) = editor(backend.clone());
        ed.select_type(DocumentType::Nda);
        ed.set_field(DraftField::DisclosingParty, "Acme");
        to_review(&mut ed).await;

        {
            let s = backend.state();
            assert_eq!(s.generate_bodies.len(), 1);
            assert_eq!(s.generate_bodies[0]["documentType"], "nda");
            assert_eq!(s.generate_bodies[0]["disclosingParty"], "Acme");
        }

        let generated = ed.generate().await.cloned().unwrap();
        let s = backend.state();
        assert_eq!(s.generate_bodies.len(), 2);
        assert_eq!(s.generate_bodies[1]["documentId"], "doc-1");
        assert_eq!(generated.id, "doc-1");
    }

    #[tokio::test]
    async fn revisiting_review_marks_pending_once() {
        let backend = FakeBackend::new();
        let (mut ed, _) = editor(backend.clone());
        ed.select_type(DocumentType::Service);
        to_review(&mut ed).await;
        for _ in 0..3 {
            ed.back();
            assert_eq!(ed.next().await.unwrap(), Step::Review);
        }
        assert_eq!(backend.state().generate_bodies.len(), 1);
    }

    #[tokio::test]
    async fn cannot_leave_type_step_without_type() {
        let backend = FakeBackend::new();
        let (mut ed, _) = editor(backend.clone());
        assert_eq!(ed.next().await, Err(WizardError::TypeNotSelected));
        assert_eq!(ed.step(), Step::Type);
        assert!(backend.state().generate_bodies.is_empty());
    }

    #[tokio::test]
    async fn writes_without_type_are_guarded() {
        let backend = FakeBackend::new();
        let (mut ed, notes) = editor(backend.clone());
        assert!(ed.save_draft().await.is_none());
        assert!(backend.state().generate_bodies.is_empty());
        assert_eq!(notes.texts(), vec!["Please select a document type"]);
    }

    #[tokio::test]
    async fn preview_placeholder_until_generated() {
        let backend = FakeBackend::new();
        let (mut ed, notes) = editor(backend);
        ed.select_type(DocumentType::Contract);
        let p = ed.review_preview();
        assert_eq!(p.title, "Preview - Freelancer Contract");
        assert_eq!(p.content, GENERATE_TO_PREVIEW);
        assert!(ed.open_preview().is_none());
        assert_eq!(notes.take(), vec![Notice::failure(NOT_GENERATED)]);

        ed.generate().await;
        let p = ed.open_preview().unwrap();
        assert_eq!(p.content, "Freelancer Contract text");
    }

    #[tokio::test]
    async fn download_guard_and_success() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = FakeBackend::with(|s| s.pdf = b"pdf".to_vec());
        let (mut ed, notes) = editor(backend.clone());
        assert!(ed.download(tmp.path()).await.is_none());
        assert_eq!(notes.take(), vec![Notice::failure(NOT_GENERATED)]);

        ed.select_type(DocumentType::Nda);
        ed.generate().await;
        let path = ed.download(tmp.path()).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "document_doc-1.pdf");
    }

    #[tokio::test]
    async fn resume_sets_type_and_skips_pending() {
        let backend = FakeBackend::with(|s| {
            let mut doc = raw("d9", "service");
            doc.client_name = Some("Globex".into());
            s.documents.push(doc);
        });
        let (mut ed, _) = editor(backend.clone());
        assert!(ed.resume("d9").await);
        assert_eq!(ed.document_type(), Some(DocumentType::Service));
        assert_eq!(ed.form().get(DraftField::ClientName), "Globex");

        to_review(&mut ed).await;
        assert!(backend.state().generate_bodies.is_empty());
    }
}
