use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::api::JobStatusResponse;
use crate::model::{JobStatus, StatusEntry};
use crate::session::{DataKind, SessionEvent, Shared};

/// Fallback shown when the server reports failure without a message.
const GENERIC_JOB_FAILURE: &str = "An error occurred while processing this video";

/// Lifecycle poll loop.
///
/// Fetches the job status on a fixed interval while the job is in a
/// non-terminal state. A failed fetch never changes state and never stops
/// the loop; it is retried on the next tick. On `Complete` the transcript
/// and notes are fetched exactly once and the loop exits; on `Error` the
/// failure message is recorded and the loop exits.
pub(crate) async fn run(shared: Arc<Shared>) {
    let mut interval = tokio::time::interval(Duration::from_millis(
        shared.config.status_poll_interval_ms,
    ));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    // None until the first successful poll, so the initial observation also
    // lands in the history.
    let mut previous: Option<JobStatus> = None;

    loop {
        interval.tick().await;

        let snapshot = match shared.api.job_status(&shared.job_id).await {
            Ok(s) => s,
            Err(e) => {
                warn!(job_id = %shared.job_id, error = %e, "Status poll failed, retrying on next tick");
                continue;
            }
        };

        let status = snapshot.status;
        apply_snapshot(&shared, snapshot, &mut previous);

        match status {
            JobStatus::Complete => {
                fetch_results(&shared).await;
                break;
            }
            JobStatus::Error => break,
            _ => {}
        }
    }

    debug!(job_id = %shared.job_id, "Lifecycle poller stopped");
}

/// Merges one status snapshot into the shared view, appending a history
/// entry and emitting events when the observed status changed.
fn apply_snapshot(shared: &Shared, snapshot: JobStatusResponse, previous: &mut Option<JobStatus>) {
    let status = snapshot.status;
    let changed = *previous != Some(status);

    {
        let mut state = shared.state.write();
        state.status = status;
        if snapshot.title.is_some() {
            state.title = snapshot.title;
        }
        if snapshot.channel.is_some() {
            state.channel = snapshot.channel;
        }
        if snapshot.url.is_some() {
            state.source_url = snapshot.url;
        }
        if status == JobStatus::Error {
            state.error_message = Some(
                snapshot
                    .error_message
                    .unwrap_or_else(|| GENERIC_JOB_FAILURE.to_string()),
            );
        }
        if changed {
            state.history.push(StatusEntry::observed(status, Utc::now()));
        }
    }

    if changed {
        *previous = Some(status);
        info!(job_id = %shared.job_id, %status, "Job status changed");
        // Wake the tail supervisor only on real transitions.
        shared.status_tx.send_if_modified(|s| {
            if *s != status {
                *s = status;
                true
            } else {
                false
            }
        });
        shared.emit(SessionEvent::StatusChanged(status));
        if status == JobStatus::Error {
            let message = shared
                .state
                .read()
                .error_message
                .clone()
                .unwrap_or_else(|| GENERIC_JOB_FAILURE.to_string());
            shared.emit(SessionEvent::Failed(message));
        }
    }
}

/// One-shot fetch of transcript and notes after completion.
///
/// Each half fails independently: a missing transcript still leaves the
/// notes usable and vice versa.
async fn fetch_results(shared: &Arc<Shared>) {
    match shared.api.transcript(&shared.job_id).await {
        Ok(transcript) => {
            info!(
                job_id = %shared.job_id,
                segments = transcript.segments.len(),
                "Transcript fetched"
            );
            shared.state.write().transcript = Some(Arc::new(transcript));
            shared.emit(SessionEvent::TranscriptReady);
        }
        Err(e) => {
            warn!(job_id = %shared.job_id, error = %e, "Transcript fetch failed");
            let message = e.to_string();
            shared.state.write().transcript_error = Some(message.clone());
            shared.emit(SessionEvent::DataUnavailable {
                kind: DataKind::Transcript,
                message,
            });
        }
    }

    match shared.api.notes(&shared.job_id).await {
        Ok(notes) => {
            shared.state.write().notes = Some(notes);
            shared.emit(SessionEvent::NotesReady);
        }
        Err(e) => {
            warn!(job_id = %shared.job_id, error = %e, "Notes fetch failed");
            let message = e.to_string();
            shared.state.write().notes_error = Some(message.clone());
            shared.emit(SessionEvent::DataUnavailable {
                kind: DataKind::Notes,
                message,
            });
        }
    }
}
