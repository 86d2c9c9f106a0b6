//! The polling variant of the paginated elements service.

use crate::service::PaginatedElementsService;
use rangekit_core::{RangeError, RangeResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Re-issues the wrapped service's last fetch on a fixed-delay schedule.
///
/// The timer restarts after each response is fully processed, so slow
/// responses cannot cause request pile-up: at most one poll-originated
/// request is in flight at a time. Manual `get_all` calls on the inner
/// service remain possible and are not fenced against the poll.
///
/// A failing poll surfaces through the inner service's `has_error` flag
/// and never stops the loop.
pub struct PollingPaginatedService<T, P> {
    service: Arc<PaginatedElementsService<T, P>>,
    period: Duration,
    shutdown_tx: broadcast::Sender<()>,
    running: Arc<AtomicBool>,
}

impl<T, P> PollingPaginatedService<T, P>
where
    T: Clone + Send + Sync + 'static,
    P: Clone + Send + Sync + 'static,
{
    /// Creates a polling wrapper around a paginated service.
    #[must_use]
    pub fn new(service: Arc<PaginatedElementsService<T, P>>, period: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            service,
            period,
            shutdown_tx,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The wrapped service, for manual fetches and subscriptions.
    #[must_use]
    pub fn service(&self) -> &Arc<PaginatedElementsService<T, P>> {
        &self.service
    }

    /// Returns true while the polling task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Starts the polling task.
    ///
    /// The first poll fires one period after start; initial loading is
    /// expected to happen through a manual `get_all`. If the service has
    /// no recorded request yet, a tick is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if polling is already running.
    pub fn start(&self) -> RangeResult<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(RangeError::configuration("polling already running"));
        }

        let service = Arc::clone(&self.service);
        let period = self.period;
        let running = Arc::clone(&self.running);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            info!(period_ms = period.as_millis() as u64, "Polling started");

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    () = tokio::time::sleep(period) => {}
                }

                match service.refresh().await {
                    Ok(Some(_)) => {}
                    Ok(None) => debug!("Polling tick skipped: no request recorded yet"),
                    Err(err) => warn!(error = %err, "Polling fetch failed; continuing"),
                }
            }

            running.store(false, Ordering::SeqCst);
            info!("Polling stopped");
        });

        Ok(())
    }

    /// Signals the polling task to stop after its current iteration.
    pub fn stop(&self) {
        debug!("Stopping polling");
        let _ = self.shutdown_tx.send(());
    }
}

impl<T, P> std::fmt::Debug for PollingPaginatedService<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingPaginatedService")
            .field("period", &self.period)
            .field("running", &self.running.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
