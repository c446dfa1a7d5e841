use std::sync::Arc;

use crate::model::Transcript;
use crate::viewport::{TranscriptViewport, reveal};

/// One rendered piece of a segment's text: either a match for the current
/// query or the text between matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    pub text: String,
    pub matched: bool,
}

/// Stateful substring search over the transcript with cyclic navigation.
///
/// Matching is case-insensitive. The cursor wraps in both directions, so
/// `next` and `previous` are never a no-op while there is at least one
/// match.
pub struct SearchNavigator {
    transcript: Arc<Transcript>,
    viewport: Arc<dyn TranscriptViewport>,
    query: String,
    matches: Vec<usize>,
    cursor: usize,
}

impl SearchNavigator {
    pub(crate) fn new(transcript: Arc<Transcript>, viewport: Arc<dyn TranscriptViewport>) -> Self {
        Self {
            transcript,
            viewport,
            query: String::new(),
            matches: Vec::new(),
            cursor: 0,
        }
    }

    /// Recomputes the match list for a new query and moves the cursor to
    /// the first match, revealing it. A blank query clears the search.
    /// Returns the segment index the cursor landed on.
    pub fn set_query(&mut self, query: &str) -> Option<usize> {
        if query.trim().is_empty() {
            self.clear();
            return None;
        }
        self.query = query.to_string();
        let folded = query.to_lowercase();
        self.matches = self
            .transcript
            .segments
            .iter()
            .enumerate()
            .filter(|(_, s)| find_ci(&s.text, &folded, 0).is_some())
            .map(|(i, _)| i)
            .collect();
        self.cursor = 0;
        let first = self.matches.first().copied();
        if let Some(index) = first {
            reveal(self.viewport.as_ref(), index);
        }
        first
    }

    /// Moves to the next match, wrapping past the last one.
    pub fn next(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.matches.len();
        let index = self.matches[self.cursor];
        reveal(self.viewport.as_ref(), index);
        Some(index)
    }

    /// Moves to the previous match, wrapping before the first one.
    pub fn previous(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        let len = self.matches.len();
        self.cursor = (self.cursor + len - 1) % len;
        let index = self.matches[self.cursor];
        reveal(self.viewport.as_ref(), index);
        Some(index)
    }

    /// Clears the query, match list and cursor.
    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.cursor = 0;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Segment indices matching the current query, in transcript order.
    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    /// Segment index under the cursor.
    pub fn current(&self) -> Option<usize> {
        self.matches.get(self.cursor).copied()
    }

    /// 1-based cursor position for "i of n" display.
    pub fn position(&self) -> Option<(usize, usize)> {
        if self.matches.is_empty() {
            None
        } else {
            Some((self.cursor + 1, self.matches.len()))
        }
    }

    /// Splits a segment's text into matched/unmatched spans for rendering.
    pub fn highlight(&self, text: &str) -> Vec<HighlightSpan> {
        highlight(text, &self.query)
    }
}

/// Splits `text` on case-insensitive occurrences of `query`, preserving the
/// original casing of every span. A blank query yields the whole text as a
/// single unmatched span.
pub fn highlight(text: &str, query: &str) -> Vec<HighlightSpan> {
    if query.trim().is_empty() {
        return vec![HighlightSpan {
            text: text.to_string(),
            matched: false,
        }];
    }
    let folded = query.to_lowercase();
    let mut spans = Vec::new();
    let mut cursor = 0;
    while let Some((start, end)) = find_ci(text, &folded, cursor) {
        if start > cursor {
            spans.push(HighlightSpan {
                text: text[cursor..start].to_string(),
                matched: false,
            });
        }
        spans.push(HighlightSpan {
            text: text[start..end].to_string(),
            matched: true,
        });
        cursor = end;
    }
    if cursor < text.len() {
        spans.push(HighlightSpan {
            text: text[cursor..].to_string(),
            matched: false,
        });
    }
    if spans.is_empty() {
        spans.push(HighlightSpan {
            text: text.to_string(),
            matched: false,
        });
    }
    spans
}

/// Case-insensitive substring search starting at byte offset `from`.
///
/// `query_folded` must already be lowercased. Works on char boundaries of
/// the original text, so multi-byte input never produces a split inside a
/// character. Returns the byte range of the match in `text`.
fn find_ci(text: &str, query_folded: &str, from: usize) -> Option<(usize, usize)> {
    if query_folded.is_empty() {
        return None;
    }
    for (offset, _) in text[from..].char_indices() {
        let start = from + offset;
        if let Some(end) = match_at(text, start, query_folded) {
            return Some((start, end));
        }
    }
    None
}

/// Tries to match the folded query at byte offset `start`; returns the end
/// offset of the match. A query that ends inside a character's lowercase
/// expansion still covers the whole character.
fn match_at(text: &str, start: usize, query_folded: &str) -> Option<usize> {
    let mut remaining = query_folded;
    for (offset, ch) in text[start..].char_indices() {
        if remaining.is_empty() {
            return Some(start + offset);
        }
        for folded in ch.to_lowercase() {
            if let Some(rest) = remaining.strip_prefix(folded) {
                remaining = rest;
            } else if remaining.is_empty() {
                break;
            } else {
                return None;
            }
        }
        if remaining.is_empty() {
            return Some(start + offset + ch.len_utf8());
        }
    }
    if remaining.is_empty() {
        Some(text.len())
    } else {
        None
    }
}
