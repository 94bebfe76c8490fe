use super::snapshot::SessionSnapshot;
use super::state::{Phase, SessionState};
use crate::analysis::{AnalysisError, AnalysisService};
use crate::audio::{AudioFile, FileId, PlaybackController, PlaybackSurface, PreviewHandle, SeekOutcome};
use crate::feedback::{FeedbackCollection, FeedbackItem, FeedbackStore};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// An analysis request in flight.
///
/// Dropping it before `wait` completes aborts the request and marks the
/// session's pending slot as abandoned; the session then fails the analysis
/// on its next event so the file can be retried.
#[must_use = "an analysis that is never waited on is abandoned"]
pub struct PendingAnalysis {
    file_id: FileId,
    task: Option<JoinHandle<Result<FeedbackCollection, AnalysisError>>>,
    abandoned: Arc<AtomicBool>,
}

impl PendingAnalysis {
    /// File selection this request was issued for
    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    /// Wait for the service to answer
    pub async fn wait(mut self) -> AnalysisOutcome {
        let result = match self.task.as_mut() {
            Some(task) => match task.await {
                Ok(result) => result,
                Err(e) => Err(AnalysisError::Task(e.to_string())),
            },
            None => Err(AnalysisError::Abandoned),
        };
        self.task = None;

        AnalysisOutcome {
            file_id: self.file_id,
            result,
        }
    }
}

impl Drop for PendingAnalysis {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            warn!("Analysis for file {} dropped before it finished", self.file_id);
            task.abort();
            self.abandoned.store(true, Ordering::SeqCst);
        }
    }
}

/// The session's single pending-analysis slot
struct InFlight {
    file_id: FileId,
    abandoned: Arc<AtomicBool>,
}

/// A finished analysis, tagged with the file selection it belongs to
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub file_id: FileId,
    pub result: Result<FeedbackCollection, AnalysisError>,
}

/// What `UploadSession::resolve` did with an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// The session moved on before the result arrived; it was discarded
    Stale,
}

/// Coordinates file selection, analysis and playback for one reviewer.
///
/// Owns the selected file's preview handle and the single playback surface.
/// Every transition publishes a `SessionSnapshot` to subscribers.
pub struct UploadSession {
    state: SessionState,
    store: FeedbackStore,
    preview: Option<PreviewHandle>,
    playback: PlaybackController,
    service: Arc<dyn AnalysisService>,
    in_flight: Option<InFlight>,
    /// Index of the last moment reached through `jump_next`
    cursor: Option<usize>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl UploadSession {
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        Self::with_playback(service, PlaybackController::default())
    }

    pub fn with_surface(service: Arc<dyn AnalysisService>, surface: Box<dyn PlaybackSurface>) -> Self {
        Self::with_playback(service, PlaybackController::new(surface))
    }

    fn with_playback(service: Arc<dyn AnalysisService>, playback: PlaybackController) -> Self {
        let state = SessionState::Idle;
        let (snapshots, _) = watch::channel(SessionSnapshot::capture(&state, playback.status()));

        Self {
            state,
            store: FeedbackStore::new(),
            preview: None,
            playback,
            service,
            in_flight: None,
            cursor: None,
            snapshots,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn feedback(&self) -> &FeedbackStore {
        &self.store
    }

    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    /// Path of the local preview the playback surface is loaded with
    pub fn preview_path(&self) -> Option<&Path> {
        self.preview.as_ref().map(|p| p.path())
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.state, self.playback.status())
    }

    /// Make `file` the active recording.
    ///
    /// Releases the previous preview, clears any feedback and supersedes an
    /// analysis that may still be in flight.
    pub fn select_file(&mut self, file: AudioFile) {
        info!("Selected {} ({} bytes)", file.name, file.size());

        if self.in_flight.take().is_some() && self.state.phase() == Phase::Analyzing {
            info!("Superseding in-flight analysis");
        }

        self.release_preview();

        match PreviewHandle::create(&file) {
            Ok(preview) => {
                self.playback.load(preview.path());
                self.preview = Some(preview);
            }
            Err(e) => warn!("No preview for {}: {:#}", file.name, e),
        }

        self.store.clear();
        self.cursor = None;
        self.state = self.state.select_file(file);
        self.publish();
    }

    /// Submit the active file for analysis.
    ///
    /// Returns `None` without contacting the service unless the session is in
    /// `FileSelected` or `Failed`. Must be called from within a tokio runtime.
    pub fn submit(&mut self) -> Option<PendingAnalysis> {
        self.reap_abandoned();

        let Some((next, request)) = self.state.begin_analysis() else {
            debug!("Submit ignored in {:?}", self.state.phase());
            return None;
        };

        let file_id = request.file.id;
        info!("Analyzing {}", request.file.name);

        self.state = next;
        self.publish();

        let service = Arc::clone(&self.service);
        let task = tokio::spawn(async move { service.analyze(request).await });

        let abandoned = Arc::new(AtomicBool::new(false));
        self.in_flight = Some(InFlight {
            file_id,
            abandoned: Arc::clone(&abandoned),
        });

        Some(PendingAnalysis {
            file_id,
            task: Some(task),
            abandoned,
        })
    }

    /// Fail an analysis whose `PendingAnalysis` was dropped unresolved.
    ///
    /// Runs at the start of every event; returns true when it changed state.
    pub fn reap_abandoned(&mut self) -> bool {
        let abandoned = self
            .in_flight
            .as_ref()
            .filter(|f| f.abandoned.load(Ordering::SeqCst))
            .map(|f| f.file_id);

        match abandoned {
            Some(file_id) => {
                let outcome = AnalysisOutcome {
                    file_id,
                    result: Err(AnalysisError::Abandoned),
                };
                self.resolve(outcome) == Resolution::Applied
            }
            None => false,
        }
    }

    /// Apply a finished analysis if it still belongs to the active request
    pub fn resolve(&mut self, outcome: AnalysisOutcome) -> Resolution {
        if self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.file_id == outcome.file_id)
        {
            self.in_flight = None;
        }

        let Some(next) = self.state.resolve(outcome.file_id, &outcome.result) else {
            info!(
                "Discarding stale analysis result for file {}",
                outcome.file_id
            );
            return Resolution::Stale;
        };

        match &outcome.result {
            Ok(feedback) => {
                info!("Analysis complete: {} moments", feedback.len());
                self.store.replace(feedback.clone());
                self.cursor = None;
            }
            Err(e) => error!("Analysis failed: {}", e),
        }

        self.state = next;
        self.publish();

        Resolution::Applied
    }

    /// Submit and wait for the result in one step
    pub async fn analyze(&mut self) -> Option<Resolution> {
        let pending = self.submit()?;
        let outcome = pending.wait().await;
        Some(self.resolve(outcome))
    }

    /// Jump playback to a feedback item
    pub fn seek_and_play(&mut self, item: &FeedbackItem) -> SeekOutcome {
        self.reap_abandoned();

        if self.state.file().is_none() {
            debug!("Seek ignored: no file selected");
            return SeekOutcome::NoSource;
        }

        let outcome = self.playback.seek_and_play(item);
        self.publish();
        outcome
    }

    /// Jump to the moment at `index` in the current feedback
    pub fn seek_to_moment(&mut self, index: usize) -> Option<SeekOutcome> {
        let item = self.store.get(index)?.clone();
        self.cursor = Some(index);
        Some(self.seek_and_play(&item))
    }

    /// Jump to the moment after the last one visited, wrapping to the first.
    ///
    /// Returns the index jumped to along with the seek outcome.
    pub fn jump_next(&mut self) -> Option<(usize, SeekOutcome)> {
        if self.store.is_empty() {
            return None;
        }

        let next = match self.cursor {
            Some(i) if i + 1 < self.store.len() => i + 1,
            _ => 0,
        };
        self.seek_to_moment(next).map(|outcome| (next, outcome))
    }

    /// End the session, releasing the preview and unloading playback
    pub fn close(&mut self) {
        info!("Closing session");
        self.in_flight = None;
        self.release_preview();
        self.store.clear();
        self.cursor = None;
        self.state = SessionState::Idle;
        self.publish();
    }

    fn release_preview(&mut self) {
        self.playback.unload();
        if let Some(preview) = self.preview.take() {
            preview.release();
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}

impl Drop for UploadSession {
    fn drop(&mut self) {
        if let Some(preview) = self.preview.take() {
            preview.release();
        }
    }
}
