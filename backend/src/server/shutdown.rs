//! Signal-driven graceful shutdown.
//!
//! On SIGINT or SIGTERM the readiness probe flips to 503 and the server stops
//! accepting connections, then waits for in-flight requests up to its
//! configured shutdown timeout.

use std::future::Future;

use actix_web::dev::ServerHandle;
use actix_web::web;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::inbound::http::health::HealthState;

/// Resolve once the process receives SIGINT, or SIGTERM on unix.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
                return;
            }
            Err(error) => warn!(%error, "SIGTERM handler unavailable; listening for SIGINT only"),
        }
    }
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "SIGINT handler unavailable");
        std::future::pending::<()>().await;
    }
}

/// Stop `server` gracefully once `signal` resolves.
///
/// The returned task ends after the server has drained.
pub fn drain_on_signal<F>(
    server: ServerHandle,
    health_state: web::Data<HealthState>,
    signal: F,
) -> JoinHandle<()>
where
    F: Future<Output = ()> + 'static,
{
    actix_web::rt::spawn(async move {
        signal.await;
        info!("shutdown requested; draining in-flight requests");
        health_state.mark_draining();
        server.stop(true).await;
    })
}
