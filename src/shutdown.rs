//! Shutdown signal handling shared by the blocking stages

use tokio::sync::watch;

/// Resolve once the shutdown channel carries `true`.
///
/// A sender dropped without ever signalling means shutdown can no longer
/// arrive; that is not a request to stop, so this future stays pending
/// instead of treating the closed channel as a signal.
pub(crate) async fn signalled(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
