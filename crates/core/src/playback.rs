use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::model::{Segment, Transcript};
use crate::session::AbortOnDrop;
use crate::viewport::{TranscriptViewport, reveal};

/// Playback-clock capability of the external media player.
///
/// Injected so the synchronizer can be driven by a fake in tests instead of
/// a real player surface.
pub trait PlaybackClock: Send + Sync + 'static {
    /// Current playback position in seconds.
    fn position_seconds(&self) -> f64;

    /// Jumps playback to the given position.
    fn seek(&self, seconds: f64);

    /// Resumes playback if paused.
    fn resume(&self);

    fn is_playing(&self) -> bool;
}

/// Finds the segment covering `position`: the first `i` with
/// `segments[i].start <= position < segments[i].end`.
///
/// Linear scan. Transcripts run to a few hundred segments and this is
/// sampled twice a second, so the O(n) cost is not worth an index.
pub fn segment_at(segments: &[Segment], position: f64) -> Option<usize> {
    segments
        .iter()
        .position(|s| s.start <= position && position < s.end)
}

/// Keeps the transcript selection in sync with the player clock.
///
/// One direction samples the clock and updates the active segment; the
/// other (`activate_segment`, a segment click) seeks the player. The click
/// records the active index before seeking, so the next position sample
/// sees it already current and the round trip stays a one-shot update.
pub struct PlaybackSynchronizer {
    transcript: Arc<Transcript>,
    clock: Arc<dyn PlaybackClock>,
    viewport: Arc<dyn TranscriptViewport>,
    active: RwLock<Option<usize>>,
    sample_interval: Duration,
    task: Mutex<Option<AbortOnDrop>>,
}

impl PlaybackSynchronizer {
    pub(crate) fn new(
        transcript: Arc<Transcript>,
        clock: Arc<dyn PlaybackClock>,
        viewport: Arc<dyn TranscriptViewport>,
        sample_interval_ms: u64,
    ) -> Arc<Self> {
        Arc::new(Self {
            transcript,
            clock,
            viewport,
            active: RwLock::new(None),
            sample_interval: Duration::from_millis(sample_interval_ms),
            task: Mutex::new(None),
        })
    }

    /// Starts the sampling task. Sampling is skipped while the player
    /// reports paused; the task itself lives until `stop()` or drop.
    pub fn start(self: &Arc<Self>) {
        let sync = Arc::clone(self);
        let interval = self.sample_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                sync.sample();
            }
        });
        *self.task.lock() = Some(AbortOnDrop(handle));
        debug!("Playback synchronizer started");
    }

    /// Stops the sampling task.
    pub fn stop(&self) {
        self.task.lock().take();
    }

    /// One synchronization step: read the clock, resolve the covering
    /// segment, and reveal it if the selection moved. No covering segment
    /// (a gap between segments) leaves the selection unchanged.
    pub fn sample(&self) {
        if !self.clock.is_playing() {
            return;
        }
        let position = self.clock.position_seconds();
        let Some(index) = segment_at(&self.transcript.segments, position) else {
            return;
        };
        {
            let mut active = self.active.write();
            if *active == Some(index) {
                return;
            }
            *active = Some(index);
        }
        reveal(self.viewport.as_ref(), index);
    }

    /// Handles a segment click: select it, seek the player to its start and
    /// resume playback.
    pub fn activate_segment(&self, index: usize) {
        let Some(segment) = self.transcript.segments.get(index) else {
            return;
        };
        *self.active.write() = Some(index);
        self.clock.seek(segment.start);
        self.clock.resume();
    }

    /// The segment currently considered "playing", if any.
    pub fn active_index(&self) -> Option<usize> {
        *self.active.read()
    }
}
