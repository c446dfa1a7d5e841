/// Host-UI capability for anchoring the transcript list to a segment.
///
/// Segment identity is the index into the transcript's segment list.
pub trait TranscriptViewport: Send + Sync + 'static {
    /// Whether the segment is currently fully visible in the scroll area.
    fn is_visible(&self, segment_index: usize) -> bool;

    /// Scrolls the segment into view.
    fn scroll_to(&self, segment_index: usize);
}

/// Scrolls to the segment only when it is not already fully visible, so
/// automatic synchronization never fights the user's manual scrolling.
pub fn reveal(viewport: &dyn TranscriptViewport, segment_index: usize) {
    if !viewport.is_visible(segment_index) {
        viewport.scroll_to(segment_index);
    }
}
