use crate::model::Transcript;

/// Duration given to the last entry when its segment carries no usable
/// duration of its own.
const LAST_ENTRY_FALLBACK_SECS: f64 = 2.0;

/// Renders the transcript as SRT.
///
/// Entries are 1-indexed. The end time of entry `i` is the start time of
/// entry `i + 1`; the last entry keeps its own duration
/// (`start + (end - start)`), falling back to two seconds when the segment
/// has none.
pub fn render_srt(transcript: &Transcript) -> String {
    let segments = &transcript.segments;
    let mut out = String::new();

    for (i, segment) in segments.iter().enumerate() {
        let start = segment.start;
        let end = if i + 1 < segments.len() {
            segments[i + 1].start
        } else if segment.end > segment.start {
            start + (segment.end - segment.start)
        } else {
            start + LAST_ENTRY_FALLBACK_SECS
        };

        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_srt_time(start),
            format_srt_time(end),
            segment.text
        ));
    }

    out
}

/// Formats seconds as SRT time "HH:MM:SS,mmm".
pub fn format_srt_time(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    format!(
        "{:02}:{:02}:{:02},{:03}",
        total_secs / 3600,
        (total_secs % 3600) / 60,
        total_secs % 60,
        ms
    )
}
