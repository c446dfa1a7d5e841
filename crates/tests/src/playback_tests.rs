use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use vidscribe_core::{JobSession, JobStatus, PlaybackSynchronizer, ViewerError};

use crate::fixtures::playback::{FakeClock, FakeViewport};
use crate::fixtures::scripted_api::{ScriptedApi, status};
use crate::fixtures::fast_config;

async fn completed_session() -> Arc<JobSession> {
    let api = ScriptedApi::with_statuses(vec![status(JobStatus::Complete)]);
    let session = JobSession::open(api, "job-play", fast_config());
    tokio::time::sleep(Duration::from_secs(1)).await;
    session
}

fn synchronizer(
    session: &JobSession,
) -> (Arc<PlaybackSynchronizer>, Arc<FakeClock>, Arc<FakeViewport>) {
    let clock = Arc::new(FakeClock::new());
    let viewport = Arc::new(FakeViewport::new());
    let sync = session
        .synchronizer(clock.clone(), viewport.clone())
        .unwrap();
    (sync, clock, viewport)
}

#[tokio::test(start_paused = true)]
async fn synchronizer_requires_transcript() {
    let api = ScriptedApi::with_statuses(vec![status(JobStatus::Transcribing)]);
    let session = JobSession::open(api, "job-early", fast_config());

    let clock = Arc::new(FakeClock::new());
    let viewport = Arc::new(FakeViewport::new());
    let result = session.synchronizer(clock, viewport);
    assert!(matches!(result, Err(ViewerError::NotReady)));
}

#[tokio::test(start_paused = true)]
async fn sample_follows_playback_position() {
    let session = completed_session().await;
    let (sync, clock, viewport) = synchronizer(&session);

    clock.set_playing(true);
    clock.set_position(6.0);
    sync.sample();
    assert_eq!(sync.active_index(), Some(1));
    assert_eq!(*viewport.scrolls.lock(), vec![1]);

    // Same segment again: no state change, no extra scroll.
    clock.set_position(7.5);
    sync.sample();
    assert_eq!(sync.active_index(), Some(1));
    assert_eq!(viewport.scroll_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn sample_in_gap_keeps_last_active_segment() {
    let session = completed_session().await;
    let (sync, clock, viewport) = synchronizer(&session);

    clock.set_playing(true);
    clock.set_position(6.0);
    sync.sample();

    // 9..12 is between segments; the highlight must not flicker off.
    clock.set_position(10.0);
    sync.sample();
    assert_eq!(sync.active_index(), Some(1));
    assert_eq!(viewport.scroll_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn sample_is_inert_while_paused() {
    let session = completed_session().await;
    let (sync, clock, viewport) = synchronizer(&session);

    clock.set_position(6.0);
    sync.sample();
    assert_eq!(sync.active_index(), None);
    assert_eq!(viewport.scroll_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn visible_segment_updates_highlight_without_scrolling() {
    let session = completed_session().await;
    let (sync, clock, viewport) = synchronizer(&session);

    viewport.mark_visible(2);
    clock.set_playing(true);
    clock.set_position(13.0);
    sync.sample();
    assert_eq!(sync.active_index(), Some(2));
    assert_eq!(viewport.scroll_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn activate_segment_seeks_resumes_and_settles() {
    let session = completed_session().await;
    let (sync, clock, viewport) = synchronizer(&session);

    sync.activate_segment(2);
    assert_eq!(*clock.seeks.lock(), vec![12.0]);
    assert_eq!(clock.resumes.load(Ordering::SeqCst), 1);
    assert_eq!(sync.active_index(), Some(2));

    // The next periodic sample agrees with the click and stays quiet.
    sync.sample();
    assert_eq!(sync.active_index(), Some(2));
    assert_eq!(viewport.scroll_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn background_ticker_samples_on_its_own() {
    let session = completed_session().await;
    let (sync, clock, _viewport) = synchronizer(&session);

    clock.set_playing(true);
    clock.set_position(2.0);
    sync.start();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(sync.active_index(), Some(0));

    clock.set_position(16.0);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(sync.active_index(), Some(3));

    sync.stop();
    clock.set_position(6.0);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(sync.active_index(), Some(3));
}
