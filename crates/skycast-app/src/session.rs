//! Periodic refresh scheduling.
//!
//! A background task emits ticks over a channel at a fixed cadence; the
//! control-flow loop that owns the dashboard reacts to them. The task is
//! cancelled on teardown so no recurring work outlives the session.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Handle to the periodic refresh task.
pub struct RefreshScheduler {
    cancel: CancellationToken,
    handle: tokio::task::JoinHandle<()>,
}

impl RefreshScheduler {
    /// Spawn a task that sends a tick every `period`, starting one period
    /// from now.
    pub fn spawn(period: Duration, tx: mpsc::Sender<()>) -> Self {
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = interval.tick() => {
                        if tx.send(()).await.is_err() {
                            break;
                        }
                    }
                }
            }

            tracing::debug!("Refresh scheduler stopped");
        });

        Self { cancel, handle }
    }

    /// Cancel the task and wait for it to wind down.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!("Refresh task join failed: {e}");
        }
    }
}
