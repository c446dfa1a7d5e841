use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use tokio::sync::{broadcast, watch};
use tracing::info;

use crate::api::{
    JobApi, NotePageContent, NotePageCredentials, NotePageRequest, NotePageResponse,
};
use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::export::{self, ExportArtifact};
use crate::model::{JobStatus, StatusEntry, SummaryNotes, Transcript};
use crate::playback::{PlaybackClock, PlaybackSynchronizer};
use crate::search::SearchNavigator;
use crate::viewport::TranscriptViewport;
use crate::{poller, tailer};

/// Guard that aborts a spawned task when dropped.
///
/// `tokio::spawn` returns a `JoinHandle` whose `Drop` impl detaches (does NOT
/// abort) the task. This wrapper ensures every polling loop dies with the
/// session that owns it, so an in-flight response is discarded instead of
/// being applied to a torn-down view.
pub(crate) struct AbortOnDrop(pub(crate) tokio::task::JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Which half of the completed-job data failed to arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Transcript,
    Notes,
}

/// Events published to the host UI.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    StatusChanged(JobStatus),
    TranscriptReady,
    NotesReady,
    /// The log buffer was replaced; carries the new line count.
    LogsUpdated(usize),
    /// The job itself failed; carries the server-supplied (or fallback) message.
    Failed(String),
    /// The job completed but one half of its data could not be fetched.
    /// The rest of the view stays usable.
    DataUnavailable { kind: DataKind, message: String },
}

/// Point-in-time snapshot of everything the host UI renders.
#[derive(Debug, Clone)]
pub struct JobView {
    pub job_id: String,
    pub status: JobStatus,
    pub title: Option<String>,
    pub channel: Option<String>,
    pub source_url: Option<String>,
    pub error_message: Option<String>,
    pub transcript: Option<Arc<Transcript>>,
    pub notes: Option<SummaryNotes>,
    /// Append-only processing history, one entry per observed status change.
    pub history: Vec<StatusEntry>,
    /// Live transcription log; replaced wholesale on every tail poll.
    pub log_lines: Vec<String>,
    pub transcript_error: Option<String>,
    pub notes_error: Option<String>,
}

impl JobView {
    fn new(job_id: String) -> Self {
        Self {
            job_id,
            status: JobStatus::Loading,
            title: None,
            channel: None,
            source_url: None,
            error_message: None,
            transcript: None,
            notes: None,
            history: Vec::new(),
            log_lines: Vec::new(),
            transcript_error: None,
            notes_error: None,
        }
    }
}

/// State shared between the session handle and its polling tasks.
pub(crate) struct Shared {
    pub(crate) job_id: String,
    pub(crate) api: Arc<dyn JobApi>,
    pub(crate) config: ViewerConfig,
    pub(crate) state: RwLock<JobView>,
    events: broadcast::Sender<SessionEvent>,
    pub(crate) status_tx: watch::Sender<JobStatus>,
}

impl Shared {
    pub(crate) fn emit(&self, event: SessionEvent) {
        // A send error only means no subscriber is listening right now.
        let _ = self.events.send(event);
    }
}

/// Handle for one open job view.
///
/// Created once per job; spawns the lifecycle poller and the log-tail
/// supervisor. Dropping (or `close()`-ing) the session aborts both, which is
/// what keeps state from leaking across job switches.
pub struct JobSession {
    shared: Arc<Shared>,
    tasks: Mutex<Vec<AbortOnDrop>>,
}

impl JobSession {
    /// Opens a job view and starts polling.
    pub fn open(api: Arc<dyn JobApi>, job_id: impl Into<String>, config: ViewerConfig) -> Arc<Self> {
        let job_id = job_id.into();
        let (events, _) = broadcast::channel(64);
        let (status_tx, status_rx) = watch::channel(JobStatus::Loading);

        let mut view = JobView::new(job_id.clone());
        view.history.push(StatusEntry {
            at: Utc::now(),
            status: JobStatus::Loading,
            line: "Starting transcription process...".to_string(),
        });

        let shared = Arc::new(Shared {
            job_id: job_id.clone(),
            api,
            config,
            state: RwLock::new(view),
            events,
            status_tx,
        });

        info!(%job_id, "Job session opened");

        let tasks = vec![
            AbortOnDrop(tokio::spawn(poller::run(Arc::clone(&shared)))),
            AbortOnDrop(tokio::spawn(tailer::supervise(Arc::clone(&shared), status_rx))),
        ];

        Arc::new(Self {
            shared,
            tasks: Mutex::new(tasks),
        })
    }

    /// Returns a receiver for session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    /// Clones the current view state.
    pub fn snapshot(&self) -> JobView {
        self.shared.state.read().clone()
    }

    pub fn status(&self) -> JobStatus {
        self.shared.state.read().status
    }

    /// The processing history so far, oldest first.
    pub fn history(&self) -> Vec<StatusEntry> {
        self.shared.state.read().history.clone()
    }

    /// The immutable transcript, once fetched.
    pub fn transcript(&self) -> Option<Arc<Transcript>> {
        self.shared.state.read().transcript.clone()
    }

    /// Builds a playback synchronizer bound to this session's transcript.
    ///
    /// Fails with `NotReady` until the transcript has been fetched.
    pub fn synchronizer(
        &self,
        clock: Arc<dyn PlaybackClock>,
        viewport: Arc<dyn TranscriptViewport>,
    ) -> Result<Arc<PlaybackSynchronizer>, ViewerError> {
        let transcript = self.transcript().ok_or(ViewerError::NotReady)?;
        Ok(PlaybackSynchronizer::new(
            transcript,
            clock,
            viewport,
            self.shared.config.playback_sample_interval_ms,
        ))
    }

    /// Builds a search navigator over this session's transcript.
    pub fn search(
        &self,
        viewport: Arc<dyn TranscriptViewport>,
    ) -> Result<SearchNavigator, ViewerError> {
        let transcript = self.transcript().ok_or(ViewerError::NotReady)?;
        Ok(SearchNavigator::new(transcript, viewport))
    }

    /// Replaces the summary notes using a different model.
    pub async fn regenerate_notes(&self, model: Option<&str>) -> Result<(), ViewerError> {
        let notes = self
            .shared
            .api
            .regenerate_notes(&self.shared.job_id, model)
            .await?;
        {
            let mut state = self.shared.state.write();
            state.notes = Some(notes);
            state.notes_error = None;
        }
        self.shared.emit(SessionEvent::NotesReady);
        Ok(())
    }

    /// Renders the plain-text export.
    pub fn export_txt(&self, now: DateTime<Utc>) -> Result<ExportArtifact, ViewerError> {
        let (transcript, notes) = self.export_inputs()?;
        let body = export::txt::render_txt(&transcript, notes.as_ref(), now);
        Ok(ExportArtifact {
            filename: export::export_filename(&transcript.title, now.date_naive(), "txt"),
            bytes: body.into_bytes(),
        })
    }

    /// Renders the subtitle export.
    pub fn export_srt(&self, now: DateTime<Utc>) -> Result<ExportArtifact, ViewerError> {
        let (transcript, _) = self.export_inputs()?;
        let body = export::srt::render_srt(&transcript);
        Ok(ExportArtifact {
            filename: export::export_filename(&transcript.title, now.date_naive(), "srt"),
            bytes: body.into_bytes(),
        })
    }

    /// Renders the paginated PDF export.
    pub fn export_pdf(&self, now: DateTime<Utc>) -> Result<ExportArtifact, ViewerError> {
        let (transcript, notes) = self.export_inputs()?;
        let settings = export::pdf::PdfSettings {
            font_dir: self.shared.config.pdf_font_dir.clone(),
            font_family: self.shared.config.pdf_font_family.clone(),
        };
        let bytes = export::pdf::render_pdf(&transcript, notes.as_ref(), now, &settings)?;
        Ok(ExportArtifact {
            filename: export::export_filename(&transcript.title, now.date_naive(), "pdf"),
            bytes,
        })
    }

    /// Pushes the transcript and notes to the external note service as a new
    /// page. A failure here is reported to the caller and leaves the job
    /// view untouched.
    pub async fn export_note_page(
        &self,
        credentials: NotePageCredentials,
    ) -> Result<NotePageResponse, ViewerError> {
        let (transcript, notes) = self.export_inputs()?;
        let (summary, key_points) = match notes {
            Some(n) => (n.summary, n.key_points),
            None => (String::new(), Vec::new()),
        };
        let request = NotePageRequest {
            content: NotePageContent {
                title: transcript.title.clone(),
                channel: transcript.channel.clone(),
                source_url: transcript.source_url.clone(),
                summary,
                key_points,
                transcript_lines: transcript
                    .segments
                    .iter()
                    .map(|s| format!("[{}] {}", export::format_clock(s.start), s.text))
                    .collect(),
            },
            credentials,
        };
        let response = self.shared.api.export_note_page(&request).await?;
        info!(job_id = %self.shared.job_id, page_url = ?response.page_url, "Note page exported");
        Ok(response)
    }

    /// Stops all polling tasks. Also happens implicitly on drop.
    pub fn close(&self) {
        self.tasks.lock().clear();
        info!(job_id = %self.shared.job_id, "Job session closed");
    }

    fn export_inputs(&self) -> Result<(Arc<Transcript>, Option<SummaryNotes>), ViewerError> {
        let state = self.shared.state.read();
        let transcript = state.transcript.clone().ok_or(ViewerError::NotReady)?;
        Ok((transcript, state.notes.clone()))
    }
}
