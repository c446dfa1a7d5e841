
use vidscribe_core::{Segment, SummaryNotes, Transcript, ViewerConfig};

/// Config with all polling cadences shrunk so paused-clock tests settle in
/// a few simulated seconds.
pub fn fast_config() -> ViewerConfig {
    ViewerConfig {
        status_poll_interval_ms: 10,
        playback_sample_interval_ms: 10,
        log_poll_floor_ms: 10,
        log_poll_ceiling_ms: 40,
        log_poll_per_line_ms: 1,
        ..ViewerConfig::default()
    }
}

pub fn sample_transcript() -> Transcript {
    Transcript {
        title: "Ownership and Borrowing".to_string(),
        channel: "RustConf".to_string(),
        source_url: "https://example.com/v/own".to_string(),
        language: Some("en".to_string()),
        segments: vec![
            segment(0.0, 5.0, "The cat sat on the mat."),
            segment(5.0, 9.0, "Dogs prefer the sofa."),
            segment(12.0, 15.0, "Cat naps are underrated."),
            segment(15.0, 20.0, "A catalog of animals."),
        ],
        full_text: None,
    }
}

pub fn sample_notes() -> SummaryNotes {
    SummaryNotes {
        summary: "Animals occupy furniture.".to_string(),
        key_points: vec![
            "Cats claim mats.".to_string(),
            "Dogs claim sofas.".to_string(),
        ],
    }
}

pub fn segment(start: f64, end: f64, text: &str) -> Segment {
    Segment {
        start,
        end,
        text: text.to_string(),
    }
}
