use serde::{Deserialize, Serialize};

/// Configuration for the job viewer engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Base URL of the job-processing service (for `HttpJobApi`).
    pub base_url: String,
    /// Interval between job-status polls in milliseconds.
    pub status_poll_interval_ms: u64,
    /// Interval between playback-position samples in milliseconds.
    pub playback_sample_interval_ms: u64,
    /// Lower bound for the adaptive log-tail interval in milliseconds.
    pub log_poll_floor_ms: u64,
    /// Upper bound for the adaptive log-tail interval in milliseconds.
    pub log_poll_ceiling_ms: u64,
    /// Per-received-line increment of the log-tail interval in milliseconds.
    pub log_poll_per_line_ms: u64,
    /// Directory holding the font files used by the PDF export.
    pub pdf_font_dir: String,
    /// Font family name within `pdf_font_dir` (e.g. "LiberationSans").
    pub pdf_font_family: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            status_poll_interval_ms: 5000,
            playback_sample_interval_ms: 500,
            log_poll_floor_ms: 500,
            log_poll_ceiling_ms: 2000,
            log_poll_per_line_ms: 10,
            pdf_font_dir: "fonts".to_string(),
            pdf_font_family: "LiberationSans".to_string(),
        }
    }
}
