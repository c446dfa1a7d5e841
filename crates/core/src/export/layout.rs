use chrono::{DateTime, Utc};

use crate::export::{EXPORT_STAMP_FORMAT, format_clock};
use crate::model::{SummaryNotes, Transcript};

/// Page geometry in text rows and columns.
///
/// The PDF renderer maps one row to one fixed-height line, so all
/// pagination arithmetic happens here and stays testable without fonts.
#[derive(Debug, Clone)]
pub struct PageSpec {
    /// Wrap width in characters.
    pub width_chars: usize,
    /// Body rows per page, footer excluded.
    pub rows_per_page: usize,
}

impl Default for PageSpec {
    fn default() -> Self {
        // A4 at 10pt with 15mm margins.
        Self {
            width_chars: 90,
            rows_per_page: 54,
        }
    }
}

/// One laid-out page, footer already stamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub rows: Vec<String>,
    /// "Page i of N".
    pub footer: String,
}

/// Explicit layout cursor threaded through every content block.
///
/// Tracks the remaining vertical space on the current page, wraps long
/// lines to the page width, and breaks the page when a row does not fit.
/// Footers are stamped in `finish()`, after the total page count is known.
pub struct LayoutCursor {
    spec: PageSpec,
    done: Vec<Vec<String>>,
    current: Vec<String>,
}

impl LayoutCursor {
    pub fn new(spec: PageSpec) -> Self {
        Self {
            spec,
            done: Vec::new(),
            current: Vec::new(),
        }
    }

    fn remaining_rows(&self) -> usize {
        self.spec.rows_per_page - self.current.len()
    }

    fn break_page(&mut self) {
        self.done.push(std::mem::take(&mut self.current));
    }

    /// Appends a line, wrapping it to the page width and breaking pages as
    /// needed.
    pub fn push_line(&mut self, text: &str) {
        for row in wrap(text, self.spec.width_chars) {
            if self.remaining_rows() == 0 {
                self.break_page();
            }
            self.current.push(row);
        }
    }

    /// Appends a blank row. Dropped at the top of a page or when the page
    /// is full, so no page starts or "ends" with dead space.
    pub fn push_blank(&mut self) {
        if !self.current.is_empty() && self.remaining_rows() > 0 {
            self.current.push(String::new());
        }
    }

    /// Appends a heading, breaking first if fewer than two rows remain so a
    /// heading is never orphaned at the bottom of a page.
    pub fn push_heading(&mut self, text: &str) {
        if self.remaining_rows() < 2 {
            self.break_page();
        }
        self.push_line(text);
    }

    /// Post-layout pass: closes the final page and stamps every footer now
    /// that the total page count is known.
    pub fn finish(mut self) -> Vec<Page> {
        if !self.current.is_empty() || self.done.is_empty() {
            let current = std::mem::take(&mut self.current);
            self.done.push(current);
        }
        let total = self.done.len();
        self.done
            .into_iter()
            .enumerate()
            .map(|(i, rows)| Page {
                rows,
                footer: format!("Page {} of {}", i + 1, total),
            })
            .collect()
    }
}

/// Word-wraps `text` to `width` characters. Words longer than the width are
/// hard-split. Empty input yields a single empty row.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let mut rows = Vec::new();
    let mut row = String::new();
    let mut row_chars = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();

        if word_chars > width {
            // Flush the current row, then hard-split the oversized word.
            if row_chars > 0 {
                rows.push(std::mem::take(&mut row));
                row_chars = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(width) {
                let piece: String = chunk.iter().collect();
                if chunk.len() == width {
                    rows.push(piece);
                } else {
                    row = piece;
                    row_chars = chunk.len();
                }
            }
            continue;
        }

        let needed = if row_chars == 0 { word_chars } else { word_chars + 1 };
        if row_chars + needed > width && row_chars > 0 {
            rows.push(std::mem::take(&mut row));
            row_chars = 0;
        }
        if row_chars > 0 {
            row.push(' ');
            row_chars += 1;
        }
        row.push_str(word);
        row_chars += word_chars;
    }

    if row_chars > 0 || rows.is_empty() {
        rows.push(row);
    }
    rows
}

/// Lays out the full export document: title and metadata, summary, key
/// points, then the timestamped transcript.
pub fn paginate_document(
    transcript: &Transcript,
    notes: Option<&SummaryNotes>,
    exported_at: DateTime<Utc>,
    spec: PageSpec,
) -> Vec<Page> {
    let mut cursor = LayoutCursor::new(spec);

    cursor.push_line(&transcript.title);
    cursor.push_line(&format!("Channel: {}", transcript.channel));
    cursor.push_line(&format!("Source: {}", transcript.source_url));
    cursor.push_line(&format!("Exported: {}", exported_at.format(EXPORT_STAMP_FORMAT)));

    if let Some(notes) = notes {
        cursor.push_blank();
        cursor.push_heading("Summary");
        cursor.push_line(&notes.summary);

        cursor.push_blank();
        cursor.push_heading("Key Points");
        for (i, point) in notes.key_points.iter().enumerate() {
            cursor.push_line(&format!("{}. {}", i + 1, point));
        }
    }

    cursor.push_blank();
    cursor.push_heading("Transcript");
    for segment in &transcript.segments {
        cursor.push_line(&format!("[{}] {}", format_clock(segment.start), segment.text));
    }

    cursor.finish()
}
