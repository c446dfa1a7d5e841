use chrono::{DateTime, Utc};

use crate::export::{EXPORT_STAMP_FORMAT, format_clock};
use crate::model::{SummaryNotes, Transcript};

/// Renders the plain-text export.
///
/// Byte-for-byte reproducible for a given `(transcript, notes,
/// exported_at)`. Notes are optional so a partial-data failure still lets
/// the transcript be exported.
pub fn render_txt(
    transcript: &Transcript,
    notes: Option<&SummaryNotes>,
    exported_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    out.push_str(&transcript.title);
    out.push('\n');
    out.push_str(&format!("Channel: {}\n", transcript.channel));
    out.push_str(&format!("Source: {}\n", transcript.source_url));
    out.push_str(&format!(
        "Exported: {}\n",
        exported_at.format(EXPORT_STAMP_FORMAT)
    ));

    if let Some(notes) = notes {
        out.push_str("\nSummary\n-------\n");
        out.push_str(&notes.summary);
        out.push('\n');

        out.push_str("\nKey Points\n----------\n");
        for (i, point) in notes.key_points.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, point));
        }
    }

    out.push_str("\nTranscript\n----------\n");
    for segment in &transcript.segments {
        out.push_str(&format!(
            "[{}] {}\n",
            format_clock(segment.start),
            segment.text
        ));
    }

    out
}
