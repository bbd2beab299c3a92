//! OperationWorkflow - input selection, submission and result of one
//! transformation kind.
//!
//! ```text
//! Idle -> FilesSelected -> Submitting -> Succeeded | Failed
//!              ^                              |
//!              +------ file replaced ---------+
//! ```
//!
//! State is guarded by a short synchronous lock that is never held across the
//! gateway call, so two updates never interleave. The `Submitting` phase is the
//! gate that keeps at most one call in flight per workflow.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};
use veil_core::gateway::Gateway;
use veil_core::media::{
    AudioEncodeRequest, Blob, DecodeRequest, ImageEncodeRequest, OperationKind, OperationResult,
    SlotId, TextEncodeRequest, UploadSpec,
};
use veil_core::{PreviewHandle, PreviewRegistry, ValidationError};

use super::render::{Notification, ResultView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    FilesSelected,
    Submitting,
    Succeeded,
    Failed,
}

/// What happened to a call of [`OperationWorkflow::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Inputs are incomplete; nothing was sent.
    Rejected(ValidationError),
    /// A submission is already in flight; nothing was sent.
    AlreadyInFlight,
    /// The call settled and its result is now the workflow result.
    Settled(OperationResult),
    /// The call settled after the inputs changed or the workflow was torn
    /// down; its result was dropped.
    Discarded,
}

impl SubmitOutcome {
    /// Notification to show for this outcome, if any.
    pub fn notification(&self, kind: OperationKind) -> Option<Notification> {
        match self {
            Self::Rejected(error) => Some(Notification::for_validation(kind, error)),
            Self::Settled(result) => Some(Notification::for_result(kind, result)),
            Self::AlreadyInFlight | Self::Discarded => None,
        }
    }
}

struct SlotEntry {
    blob: Blob,
    preview: Option<PreviewHandle>,
}

struct Inner {
    phase: WorkflowState,
    slots: BTreeMap<SlotId, SlotEntry>,
    message: String,
    result: Option<OperationResult>,
    /// Bumped on every input file change; a call whose epoch is stale on
    /// return describes superseded inputs.
    epoch: u64,
    torn_down: bool,
}

impl Inner {
    fn blob(&self, slot: SlotId) -> Result<Blob, ValidationError> {
        self.slots
            .get(&slot)
            .map(|entry| entry.blob.clone())
            .ok_or(ValidationError::MissingField {
                field: slot.label(),
            })
    }

    fn build_spec(&self, kind: OperationKind) -> Result<UploadSpec, ValidationError> {
        let spec = match kind {
            OperationKind::TextInImage => UploadSpec::Text(TextEncodeRequest::new(
                self.blob(SlotId::CoverImage)?,
                self.message.clone(),
            )?),
            OperationKind::ImageInImage => UploadSpec::Image(ImageEncodeRequest::new(
                self.blob(SlotId::CoverImage)?,
                self.blob(SlotId::HiddenImage)?,
            )?),
            OperationKind::AudioInImage => UploadSpec::Audio(AudioEncodeRequest::new(
                self.blob(SlotId::CoverImage)?,
                self.blob(SlotId::AudioFile)?,
            )?),
            OperationKind::Decode => {
                UploadSpec::Decode(DecodeRequest::new(self.blob(SlotId::EncodedImage)?)?)
            }
        };
        Ok(spec)
    }

    fn release_all(&mut self, registry: &PreviewRegistry) {
        for (_, entry) in std::mem::take(&mut self.slots) {
            if let Some(handle) = entry.preview {
                registry.release(&handle);
            }
        }
    }
}

/// Stateful orchestration of one transformation kind.
pub struct OperationWorkflow {
    kind: OperationKind,
    gateway: Arc<dyn Gateway>,
    previews: Arc<PreviewRegistry>,
    inner: Mutex<Inner>,
}

impl OperationWorkflow {
    pub fn new(
        kind: OperationKind,
        gateway: Arc<dyn Gateway>,
        previews: Arc<PreviewRegistry>,
    ) -> Self {
        Self {
            kind,
            gateway,
            previews,
            inner: Mutex::new(Inner {
                phase: WorkflowState::Idle,
                slots: BTreeMap::new(),
                message: String::new(),
                result: None,
                epoch: 0,
                torn_down: false,
            }),
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn state(&self) -> WorkflowState {
        self.inner.lock().phase
    }

    /// Places a file in `slot`, replacing any earlier selection.
    ///
    /// The preview handle of the replaced file is released before the new one
    /// is acquired, and any previous result is cleared. Slots without a
    /// preview (audio) return `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the operation has no such slot or the
    /// slot does not accept the file type. The slot is left unchanged.
    pub fn select_file(
        &self,
        slot: SlotId,
        blob: Blob,
    ) -> Result<Option<PreviewHandle>, ValidationError> {
        if !self.kind.uses_slot(slot) {
            return Err(ValidationError::SlotNotUsed {
                field: slot.label(),
            });
        }
        if !slot.accepts(&blob) {
            return Err(ValidationError::UnsupportedFile {
                field: slot.label(),
                file_name: blob.name().to_string(),
            });
        }

        let mut inner = self.inner.lock();
        if inner.torn_down {
            debug!(kind = ?self.kind, "selection ignored after teardown");
            return Ok(None);
        }

        if let Some(previous) = inner.slots.remove(&slot) {
            if let Some(handle) = previous.preview {
                self.previews.release(&handle);
            }
        }

        let preview = slot
            .is_previewable()
            .then(|| self.previews.acquire(&blob));
        debug!(kind = ?self.kind, ?slot, file = blob.name(), "file selected");
        inner.slots.insert(
            slot,
            SlotEntry {
                blob,
                preview: preview.clone(),
            },
        );

        inner.result = None;
        inner.epoch += 1;
        if inner.phase != WorkflowState::Submitting {
            inner.phase = WorkflowState::FilesSelected;
        }
        Ok(preview)
    }

    /// Sets the secret message. Only meaningful for text encoding.
    pub fn set_message(&self, message: impl Into<String>) {
        self.inner.lock().message = message.into();
    }

    pub fn message(&self) -> String {
        self.inner.lock().message.clone()
    }

    pub fn selected(&self, slot: SlotId) -> Option<Blob> {
        self.inner.lock().slots.get(&slot).map(|entry| entry.blob.clone())
    }

    /// URL of the live preview for `slot`, if any.
    pub fn preview_url(&self, slot: SlotId) -> Option<String> {
        self.inner
            .lock()
            .slots
            .get(&slot)
            .and_then(|entry| entry.preview.as_ref())
            .map(|handle| handle.url().to_string())
    }

    /// Result of the last settled submission for the current inputs.
    pub fn result(&self) -> Option<OperationResult> {
        self.inner.lock().result.clone()
    }

    /// Rendered view of a successful result.
    pub fn view(&self) -> Option<ResultView> {
        match self.inner.lock().result.as_ref() {
            Some(Ok(output)) => Some(ResultView::from_output(output)),
            _ => None,
        }
    }

    /// Submits the current inputs with exactly one gateway call.
    ///
    /// Incomplete inputs are rejected without a call, as is a second
    /// submission while one is in flight.
    pub async fn submit(&self) -> SubmitOutcome {
        let (spec, epoch) = {
            let mut inner = self.inner.lock();
            if inner.torn_down {
                return SubmitOutcome::Discarded;
            }
            if inner.phase == WorkflowState::Submitting {
                debug!(kind = ?self.kind, "submission already in flight");
                return SubmitOutcome::AlreadyInFlight;
            }
            let spec = match inner.build_spec(self.kind) {
                Ok(spec) => spec,
                Err(error) => {
                    debug!(kind = ?self.kind, %error, "submission rejected locally");
                    return SubmitOutcome::Rejected(error);
                }
            };
            inner.phase = WorkflowState::Submitting;
            inner.result = None;
            (spec, inner.epoch)
        };
        info!(kind = ?self.kind, "submitting");

        let pending = PendingSubmit {
            inner: &self.inner,
            kind: self.kind,
        };
        let result = self.gateway.submit(&spec).await;
        std::mem::forget(pending);

        let mut inner = self.inner.lock();
        if inner.torn_down {
            debug!(kind = ?self.kind, "response discarded after teardown");
            return SubmitOutcome::Discarded;
        }
        if inner.epoch != epoch {
            debug!(kind = ?self.kind, "response discarded, inputs changed");
            inner.phase = WorkflowState::FilesSelected;
            return SubmitOutcome::Discarded;
        }

        inner.phase = match &result {
            Ok(_) => WorkflowState::Succeeded,
            Err(_) => WorkflowState::Failed,
        };
        match &result {
            Ok(_) => info!(kind = ?self.kind, "operation succeeded"),
            Err(failure) => info!(kind = ?self.kind, reason = %failure, "operation failed"),
        }
        inner.result = Some(result.clone());
        SubmitOutcome::Settled(result)
    }

    /// Releases every preview handle and stops all further state changes.
    ///
    /// A call still in flight completes on the wire but its result is dropped.
    pub fn teardown(&self) {
        let mut inner = self.inner.lock();
        if inner.torn_down {
            return;
        }
        inner.torn_down = true;
        inner.release_all(&self.previews);
        debug!(kind = ?self.kind, "workflow torn down");
    }
}

/// Reopens the workflow when a submission future is dropped before the
/// gateway call settles.
struct PendingSubmit<'a> {
    inner: &'a Mutex<Inner>,
    kind: OperationKind,
}

impl Drop for PendingSubmit<'_> {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        if inner.torn_down || inner.phase != WorkflowState::Submitting {
            return;
        }
        inner.phase = if inner.slots.is_empty() {
            WorkflowState::Idle
        } else {
            WorkflowState::FilesSelected
        };
        debug!(kind = ?self.kind, "submission cancelled before it settled");
    }
}

impl Drop for OperationWorkflow {
    fn drop(&mut self) {
        self.inner.get_mut().release_all(&self.previews);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeGateway, png};
    use veil_core::media::{Failure, FailureKind, MediaKind, OperationOutput, Url};
    use veil_core::session::MemoryTokenStore;

    fn encoded(path: &str) -> OperationResult {
        Ok(OperationOutput::Encoded {
            download_url: Url::parse(&format!("http://localhost:8000{}", path)).unwrap(),
        })
    }

    type Fixture = (Arc<OperationWorkflow>, Arc<FakeGateway>, Arc<PreviewRegistry>);

    fn setup(kind: OperationKind, result: OperationResult) -> Fixture {
        let gateway = Arc::new(FakeGateway::new(Arc::new(MemoryTokenStore::new()), result));
        let previews = Arc::new(PreviewRegistry::new());
        let workflow = Arc::new(OperationWorkflow::new(
            kind,
            gateway.clone(),
            previews.clone(),
        ));
        (workflow, gateway, previews)
    }

    #[tokio::test]
    async fn test_missing_inputs_are_rejected_locally() {
        let (workflow, gateway, _) = setup(OperationKind::TextInImage, encoded("/out/1.png"));

        assert!(matches!(
            workflow.submit().await,
            SubmitOutcome::Rejected(ValidationError::MissingField { field: "cover image" })
        ));

        workflow.select_file(SlotId::CoverImage, png("cover.png")).unwrap();
        workflow.set_message("   ");
        assert_eq!(
            workflow.submit().await,
            SubmitOutcome::Rejected(ValidationError::EmptyField { field: "message" })
        );

        assert_eq!(gateway.submit_count(), 0);
        assert_eq!(workflow.state(), WorkflowState::FilesSelected);
    }

    #[tokio::test]
    async fn test_empty_file_is_rejected_locally() {
        let (workflow, gateway, _) = setup(OperationKind::Decode, encoded("/x.png"));
        workflow
            .select_file(SlotId::EncodedImage, Blob::new("empty.png", Vec::<u8>::new()))
            .unwrap();

        assert_eq!(
            workflow.submit().await,
            SubmitOutcome::Rejected(ValidationError::EmptyField {
                field: "encoded image"
            })
        );
        assert_eq!(gateway.submit_count(), 0);
    }

    #[tokio::test]
    async fn test_text_encode_succeeds() {
        let (workflow, gateway, _) = setup(OperationKind::TextInImage, encoded("/out/1.png"));
        assert_eq!(workflow.state(), WorkflowState::Idle);

        workflow.select_file(SlotId::CoverImage, png("cover.png")).unwrap();
        workflow.set_message("secret");
        let outcome = workflow.submit().await;

        assert_eq!(outcome, SubmitOutcome::Settled(encoded("/out/1.png")));
        assert_eq!(workflow.state(), WorkflowState::Succeeded);
        assert_eq!(workflow.result(), Some(encoded("/out/1.png")));
        assert_eq!(gateway.submit_count(), 1);

        let spec = gateway.submitted.lock()[0].clone();
        assert_eq!(spec.text_fields(), vec![("message", "secret")]);

        let note = outcome.notification(OperationKind::TextInImage).unwrap();
        assert_eq!(note.title, "Encoding successful!");
        assert_eq!(
            workflow.view().unwrap().download().unwrap().url,
            "http://localhost:8000/out/1.png"
        );
    }

    #[tokio::test]
    async fn test_failure_is_terminal_and_verbatim() {
        let failure = Failure::new(FailureKind::Operation, "payload too large");
        let (workflow, gateway, _) = setup(OperationKind::ImageInImage, Err(failure.clone()));
        workflow.select_file(SlotId::CoverImage, png("cover.png")).unwrap();
        workflow.select_file(SlotId::HiddenImage, png("hidden.png")).unwrap();

        assert_eq!(workflow.submit().await, SubmitOutcome::Settled(Err(failure.clone())));
        assert_eq!(workflow.state(), WorkflowState::Failed);
        assert_eq!(workflow.result(), Some(Err(failure)));
        assert!(workflow.view().is_none());
        assert_eq!(gateway.submit_count(), 1);
    }

    #[tokio::test]
    async fn test_decode_audio_result() {
        let audio = Ok(OperationOutput::DecodedMedia {
            kind: MediaKind::Audio,
            download_url: Url::parse("http://localhost:8000/x.png").unwrap(),
        });
        let (workflow, _, _) = setup(OperationKind::Decode, audio);
        workflow.select_file(SlotId::EncodedImage, png("stego.png")).unwrap();
        workflow.submit().await;

        let view = workflow.view().unwrap();
        assert_eq!(view.heading(), "Hidden AUDIO Found!");
        assert_eq!(view.download().unwrap().label, "Download Audio");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_second_submit_while_in_flight_is_noop() {
        let (workflow, gateway, _) = setup(OperationKind::Decode, encoded("/x.png"));
        workflow.select_file(SlotId::EncodedImage, png("stego.png")).unwrap();
        gateway.hold_submissions();

        let first = tokio::spawn({
            let workflow = workflow.clone();
            async move { workflow.submit().await }
        });
        gateway.wait_for_submit().await;

        assert_eq!(workflow.state(), WorkflowState::Submitting);
        assert_eq!(workflow.submit().await, SubmitOutcome::AlreadyInFlight);
        assert_eq!(gateway.submit_count(), 1);

        gateway.release();
        assert!(matches!(first.await.unwrap(), SubmitOutcome::Settled(Ok(_))));
        assert_eq!(workflow.state(), WorkflowState::Succeeded);
        assert_eq!(gateway.submit_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancelled_submit_allows_resubmission() {
        let (workflow, gateway, _) = setup(OperationKind::Decode, encoded("/x.png"));
        workflow.select_file(SlotId::EncodedImage, png("a.png")).unwrap();
        gateway.hold_submissions();

        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(50), workflow.submit()).await;
        assert!(timed_out.is_err());
        assert_eq!(workflow.state(), WorkflowState::FilesSelected);
        assert!(workflow.result().is_none());

        gateway.release();
        assert!(matches!(
            workflow.submit().await,
            SubmitOutcome::Settled(Ok(_))
        ));
        assert_eq!(workflow.state(), WorkflowState::Succeeded);
        assert_eq!(gateway.submit_count(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_replacing_file_during_submit_discards_result() {
        let (workflow, gateway, _) = setup(OperationKind::Decode, encoded("/x.png"));
        workflow.select_file(SlotId::EncodedImage, png("a.png")).unwrap();
        gateway.hold_submissions();

        let first = tokio::spawn({
            let workflow = workflow.clone();
            async move { workflow.submit().await }
        });
        gateway.wait_for_submit().await;

        workflow.select_file(SlotId::EncodedImage, png("b.png")).unwrap();
        assert_eq!(workflow.state(), WorkflowState::Submitting);

        gateway.release();
        assert_eq!(first.await.unwrap(), SubmitOutcome::Discarded);
        assert_eq!(workflow.state(), WorkflowState::FilesSelected);
        assert!(workflow.result().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_teardown_during_submit_discards_result() {
        let (workflow, gateway, previews) = setup(OperationKind::Decode, encoded("/x.png"));
        workflow.select_file(SlotId::EncodedImage, png("a.png")).unwrap();
        gateway.hold_submissions();

        let first = tokio::spawn({
            let workflow = workflow.clone();
            async move { workflow.submit().await }
        });
        gateway.wait_for_submit().await;

        workflow.teardown();
        assert_eq!(previews.live_count(), 0);

        gateway.release();
        assert_eq!(first.await.unwrap(), SubmitOutcome::Discarded);
        assert_eq!(workflow.state(), WorkflowState::Submitting);
        assert!(workflow.result().is_none());
    }

    #[tokio::test]
    async fn test_new_selection_clears_result() {
        let (workflow, _, _) = setup(OperationKind::Decode, encoded("/x.png"));
        workflow.select_file(SlotId::EncodedImage, png("a.png")).unwrap();
        workflow.submit().await;
        assert_eq!(workflow.state(), WorkflowState::Succeeded);

        workflow.select_file(SlotId::EncodedImage, png("b.png")).unwrap();
        assert_eq!(workflow.state(), WorkflowState::FilesSelected);
        assert!(workflow.result().is_none());
    }

    #[test]
    fn test_replacing_file_releases_previous_preview() {
        let (workflow, _, previews) = setup(OperationKind::ImageInImage, encoded("/x.png"));

        let first = workflow
            .select_file(SlotId::CoverImage, png("a.png"))
            .unwrap()
            .unwrap();
        let second = workflow
            .select_file(SlotId::CoverImage, png("b.png"))
            .unwrap()
            .unwrap();

        assert!(!previews.is_live(&first));
        assert!(previews.is_live(&second));
        assert_eq!(previews.live_count(), 1);
        assert_eq!(workflow.preview_url(SlotId::CoverImage).as_deref(), Some(second.url()));

        workflow.select_file(SlotId::HiddenImage, png("c.png")).unwrap();
        assert_eq!(previews.live_count(), 2);
    }

    #[test]
    fn test_audio_slot_has_no_preview() {
        let (workflow, _, previews) = setup(OperationKind::AudioInImage, encoded("/x.png"));
        let handle = workflow
            .select_file(SlotId::AudioFile, Blob::new("clip.mp3", vec![1u8, 2, 3]))
            .unwrap();

        assert!(handle.is_none());
        assert_eq!(previews.live_count(), 0);
        assert!(workflow.selected(SlotId::AudioFile).is_some());
    }

    #[test]
    fn test_rejected_selection_leaves_slot_unchanged() {
        let (workflow, _, previews) = setup(OperationKind::AudioInImage, encoded("/x.png"));
        workflow.select_file(SlotId::CoverImage, png("cover.png")).unwrap();

        let err = workflow
            .select_file(SlotId::CoverImage, Blob::new("notes.txt", b"hi".to_vec()))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsupportedFile {
                field: "cover image",
                file_name: "notes.txt".into()
            }
        );
        assert_eq!(workflow.selected(SlotId::CoverImage).unwrap().name(), "cover.png");
        assert_eq!(previews.live_count(), 1);

        let err = workflow
            .select_file(SlotId::EncodedImage, png("x.png"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::SlotNotUsed { .. }));
    }

    #[test]
    fn test_drop_releases_previews() {
        let (workflow, _, previews) = setup(OperationKind::ImageInImage, encoded("/x.png"));
        workflow.select_file(SlotId::CoverImage, png("a.png")).unwrap();
        workflow.select_file(SlotId::HiddenImage, png("b.png")).unwrap();
        assert_eq!(previews.live_count(), 2);

        drop(workflow);
        assert_eq!(previews.live_count(), 0);
    }
}
