use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pipeline state of a transcription job.
///
/// Transitions are monotonic through the pipeline
/// (`Loading → Downloading → Transcribing → GeneratingNotes → Complete`),
/// except that `Error` is reachable from any non-terminal state.
/// `Complete` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Loading,
    Downloading,
    Transcribing,
    GeneratingNotes,
    Complete,
    Error,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Error)
    }

    /// Human-readable status message shown while the job is in flight.
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Loading => "Waiting for the job to start...",
            JobStatus::Downloading => "Downloading video audio...",
            JobStatus::Transcribing => "Transcribing audio (this may take a few minutes)...",
            JobStatus::GeneratingNotes => "Generating smart notes from transcript...",
            JobStatus::Complete => "Processing complete!",
            JobStatus::Error => "Error processing video.",
        }
    }

    /// Target progress per stage. The transcription stage is by far the
    /// heaviest, so it owns most of the range.
    pub fn progress_percent(&self) -> u8 {
        match self {
            JobStatus::Loading | JobStatus::Error => 0,
            JobStatus::Downloading => 20,
            JobStatus::Transcribing => 90,
            JobStatus::GeneratingNotes | JobStatus::Complete => 100,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Loading => "loading",
            JobStatus::Downloading => "downloading",
            JobStatus::Transcribing => "transcribing",
            JobStatus::GeneratingNotes => "generating_notes",
            JobStatus::Complete => "complete",
            JobStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// One timed unit of transcribed speech.
///
/// Segments are ordered by `start` and never reordered or mutated once the
/// transcript is fetched; the position in the transcript's segment list is
/// the stable identity used for UI anchoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Offset of the first word, in seconds from the start of the media.
    pub start: f64,
    /// Offset just past the last word, in seconds.
    pub end: f64,
    pub text: String,
}

/// A completed transcript as returned by the job service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub title: String,
    pub channel: String,
    #[serde(rename = "url")]
    pub source_url: String,
    #[serde(default)]
    pub language: Option<String>,
    pub segments: Vec<Segment>,
    /// Pre-joined full text, when the service provides it.
    #[serde(default, rename = "text")]
    pub full_text: Option<String>,
}

/// Generated summary and key points for a completed transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryNotes {
    pub summary: String,
    pub key_points: Vec<String>,
}

/// One entry in the append-only processing history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEntry {
    pub at: DateTime<Utc>,
    pub status: JobStatus,
    pub line: String,
}

impl StatusEntry {
    pub fn observed(status: JobStatus, at: DateTime<Utc>) -> Self {
        Self {
            at,
            status,
            line: format!("Status changed to: {}", status.label()),
        }
    }
}

/// Extrapolates remaining processing time from elapsed time and stage
/// progress: assume progress grows linearly and project the total from the
/// share already done.
#[derive(Debug, Clone, Copy)]
pub struct EtaEstimator {
    started_at: DateTime<Utc>,
}

impl EtaEstimator {
    pub fn started_at(started_at: DateTime<Utc>) -> Self {
        Self { started_at }
    }

    /// Estimated minutes remaining, rounded up. `None` while there is no
    /// signal to extrapolate from (0%) or once the job is done (100%).
    pub fn remaining_minutes(&self, status: JobStatus, now: DateTime<Utc>) -> Option<u64> {
        let progress = status.progress_percent() as f64;
        if progress <= 0.0 || progress >= 100.0 {
            return None;
        }
        let elapsed_ms = (now - self.started_at).num_milliseconds().max(0) as f64;
        let total_ms = elapsed_ms / progress * 100.0;
        let remaining_ms = total_ms - elapsed_ms;
        Some((remaining_ms / 60_000.0).ceil() as u64)
    }
}
