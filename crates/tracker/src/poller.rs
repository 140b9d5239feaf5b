//! Periodic status reconciliation loop.
//!
//! One repeating timer drives the whole pending set: each tick snapshots
//! the pending jobs and spawns one detached poll task per job, so a hung
//! call delays only that job's reconciliation and never the next tick.
//! The loop runs until its [`CancellationToken`] is triggered (session
//! shutdown).

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::session::Session;

/// Run the polling loop until `cancel` is triggered.
///
/// Spawned by [`Session::start`]; callers embedding their own scheduler
/// can instead invoke [`Session::poll_pending_once`] directly.
pub async fn run(session: Arc<Session>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        session_id = %session.id(),
        interval_secs = interval.as_secs(),
        "Status poller started",
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(session_id = %session.id(), "Status poller stopping");
                break;
            }
            _ = ticker.tick() => {
                let pending = session.pending_snapshot().await;
                if pending.is_empty() {
                    // Nothing to do: no network I/O, no log noise.
                    continue;
                }
                tracing::debug!(
                    session_id = %session.id(),
                    count = pending.len(),
                    "Tick: polling pending jobs",
                );
                for job in pending {
                    let session = Arc::clone(&session);
                    // Detached per-job task: one slow poll must not block
                    // the rest of the tick or the tick after it.
                    tokio::spawn(async move {
                        session.poll_one(job.filename).await;
                    });
                }
            }
        }
    }
}
