pub mod layout;
pub mod pdf;
pub mod srt;
pub mod txt;

use chrono::NaiveDate;

/// Timestamp format stamped into the TXT and PDF exports. Fixed so that
/// identical input plus an identical export time yields identical bytes.
pub(crate) const EXPORT_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// A locally generated export: the suggested filename plus the file bytes.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// `m:ss` clock used for transcript line prefixes.
pub fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Derives an export filename from a title: ASCII alphanumerics kept, runs
/// of anything else collapsed to a single underscore, truncated, then
/// suffixed with the ISO date and extension.
pub fn export_filename(title: &str, date: NaiveDate, extension: &str) -> String {
    const MAX_STEM: usize = 60;

    let mut stem = String::new();
    let mut gap = false;
    for ch in title.chars() {
        if stem.len() >= MAX_STEM {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            if gap && !stem.is_empty() {
                stem.push('_');
            }
            gap = false;
            stem.push(ch);
        } else {
            gap = true;
        }
    }
    if stem.is_empty() {
        stem.push_str("transcript");
    }
    format!("{}-{}.{}", stem, date.format("%Y-%m-%d"), extension)
}
