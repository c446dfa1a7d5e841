use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::ViewerConfig;
use crate::model::JobStatus;
use crate::session::{SessionEvent, Shared};

/// Interval until the next log poll, derived from how many lines have been
/// received so far: busier logs are polled less often, bounded both ways.
pub fn adaptive_interval(received_lines: usize, config: &ViewerConfig) -> Duration {
    let ms = (received_lines as u64)
        .saturating_mul(config.log_poll_per_line_ms)
        .clamp(config.log_poll_floor_ms, config.log_poll_ceiling_ms);
    Duration::from_millis(ms)
}

/// Log-tail supervisor.
///
/// The tail loop runs only while the job is in the `Transcribing` stage; in
/// every other state the buffer is cleared and no timer is pending. The
/// supervisor watches status transitions and exits for good once the job
/// reaches a terminal state.
pub(crate) async fn supervise(shared: Arc<Shared>, mut status_rx: watch::Receiver<JobStatus>) {
    loop {
        // Wait for the transcribing stage.
        loop {
            let status = *status_rx.borrow();
            if status == JobStatus::Transcribing {
                break;
            }
            if status.is_terminal() {
                debug!(job_id = %shared.job_id, "Log tailer done, job is terminal");
                return;
            }
            if status_rx.changed().await.is_err() {
                return;
            }
        }

        tail(&shared, &mut status_rx).await;

        // Inactive again: drop the buffered lines so no other stage (or a
        // later view of the same screen) renders stale log output.
        shared.state.write().log_lines.clear();

        if status_rx.borrow().is_terminal() {
            debug!(job_id = %shared.job_id, "Log tailer done, job is terminal");
            return;
        }
    }
}

/// Polls the log endpoint until the job leaves `Transcribing`.
///
/// Each response is authoritative full state: the held collection is
/// replaced wholesale, never appended to, so a server resending a superset
/// can not duplicate or reorder lines. The sleep races against status
/// changes, which bounds the shutdown latency to one cycle.
async fn tail(shared: &Shared, status_rx: &mut watch::Receiver<JobStatus>) {
    loop {
        match shared.api.logs(&shared.job_id).await {
            Ok(lines) => {
                let count = lines.len();
                shared.state.write().log_lines = lines;
                shared.emit(SessionEvent::LogsUpdated(count));
            }
            Err(e) => {
                warn!(job_id = %shared.job_id, error = %e, "Log poll failed, retrying on next cycle");
            }
        }

        let held = shared.state.read().log_lines.len();
        let delay = adaptive_interval(held, &shared.config);

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            changed = status_rx.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }

        if *status_rx.borrow() != JobStatus::Transcribing {
            return;
        }
    }
}
