//! Background refresh of the dashboard summary.

use std::sync::Arc;
use std::time::Duration;

use leximate_client::DocumentBackend;
use leximate_core::{DashboardSummary, summarize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to the polling task. Dropping it stops the task.
pub struct DashboardPoller {
    handle: JoinHandle<()>,
    rx: watch::Receiver<Option<DashboardSummary>>,
}

impl DashboardPoller {
    /// Fetch now, then every `period` (at least 1 ms). Must be called inside
    /// a tokio runtime.
    pub fn start<B>(backend: Arc<B>, period: Duration) -> Self
    where
        B: DocumentBackend + 'static,
    {
        let period = period.max(MIN_POLL_INTERVAL);
        let (tx, rx) = watch::channel(None);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                match backend.list_documents().await {
                    Ok(docs) => {
                        debug!(count = docs.len(), "dashboard refreshed");
                        if tx.send(Some(summarize(&docs))).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, "dashboard poll failed"),
                }
            }
        });
        Self { handle, rx }
    }

    /// The most recent successful snapshot, if any.
    pub fn latest(&self) -> Option<DashboardSummary> {
        self.rx.borrow().clone()
    }

    /// Wait for the next successful snapshot.
    pub async fn changed(&mut self) -> Option<DashboardSummary> {
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().clone()
    }

    pub fn stop(self) {}
}

impl Drop for DashboardPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
