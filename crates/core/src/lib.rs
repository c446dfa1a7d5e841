pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod playback;
mod poller;
pub mod search;
pub mod session;
pub mod tailer;
pub mod viewport;

pub use api::{
    HttpJobApi, JobApi, JobStatusResponse, NotePageContent, NotePageCredentials, NotePageRequest,
    NotePageResponse,
};
pub use config::ViewerConfig;
pub use error::{ApiError, ViewerError};
pub use export::ExportArtifact;
pub use model::{EtaEstimator, JobStatus, Segment, StatusEntry, SummaryNotes, Transcript};
pub use playback::{PlaybackClock, PlaybackSynchronizer, segment_at};
pub use search::{HighlightSpan, SearchNavigator};
pub use session::{DataKind, JobSession, JobView, SessionEvent};
pub use viewport::TranscriptViewport;
