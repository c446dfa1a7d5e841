use std::sync::atomic::Ordering;
use std::time::Duration;

use vidscribe_core::{JobSession, JobStatus, SessionEvent};

use crate::fixtures::fast_config;
use crate::fixtures::scripted_api::{ScriptedApi, status};

#[tokio::test(start_paused = true)]
async fn tails_logs_while_transcribing_and_clears_after() {
    let api = ScriptedApi::with_statuses(vec![
        status(JobStatus::Downloading),
        status(JobStatus::Transcribing),
        status(JobStatus::Transcribing),
        status(JobStatus::Transcribing),
        status(JobStatus::Transcribing),
        status(JobStatus::GeneratingNotes),
        status(JobStatus::Complete),
    ]);
    api.set_logs_script(vec![
        vec!["Loading model...".to_string()],
        vec!["Loading model...".to_string(), "Transcribing chunk 1".to_string()],
    ]);
    let session = JobSession::open(api.clone(), "job-logs", fast_config());
    let mut rx = session.subscribe();

    tokio::time::sleep(Duration::from_secs(2)).await;

    let mut counts = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let SessionEvent::LogsUpdated(n) = event {
            counts.push(n);
        }
    }
    // Fetched at least twice, growing monotonically from the scripted feed.
    assert!(counts.len() >= 2, "expected several log polls, got {counts:?}");
    assert_eq!(counts[0], 1);
    assert_eq!(*counts.last().unwrap(), 2);
    for pair in counts.windows(2) {
        assert!(pair[0] <= pair[1], "log line count went backwards: {counts:?}");
    }

    // The live buffer is cleared once transcription finishes.
    assert!(session.snapshot().log_lines.is_empty());

    // No further fetches after leaving the transcribing phase.
    let fetches = api.logs_calls.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(api.logs_calls.load(Ordering::SeqCst), fetches);
}

#[tokio::test(start_paused = true)]
async fn does_not_tail_outside_transcribing_phase() {
    let api = ScriptedApi::with_statuses(vec![
        status(JobStatus::Loading),
        status(JobStatus::Downloading),
        status(JobStatus::GeneratingNotes),
        status(JobStatus::Complete),
    ]);
    let _session = JobSession::open(api.clone(), "job-quiet", fast_config());

    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(api.logs_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn log_buffer_is_replaced_wholesale() {
    // A shrinking feed models a backend that rotated its log file. The
    // view must mirror the feed, not accumulate.
    let api = ScriptedApi::with_statuses(vec![
        status(JobStatus::Transcribing),
        status(JobStatus::Transcribing),
        status(JobStatus::Transcribing),
        status(JobStatus::Complete),
    ]);
    api.set_logs_script(vec![
        vec!["a".to_string(), "b".to_string(), "c".to_string()],
        vec!["c".to_string()],
    ]);
    let session = JobSession::open(api.clone(), "job-rotate", fast_config());
    let mut rx = session.subscribe();

    tokio::time::sleep(Duration::from_millis(60)).await;
    let mut last = None;
    while let Ok(event) = rx.try_recv() {
        if let SessionEvent::LogsUpdated(n) = event {
            last = Some(n);
        }
    }
    assert_eq!(last, Some(1));
}
