//! Process telemetry initialisation.
//!
//! A configured collector must accept a TCP connection before the service
//! starts; spans are written to the structured log either way.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tracing::info;

use crate::domain::Telemetry;
use crate::outbound::LogSpanExporter;

/// Time allowed for the collector to accept a connection at startup.
pub const COLLECTOR_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// The configured trace collector is not usable.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryInitError {
    /// The collector refused or failed the connection.
    #[error("trace collector {endpoint} is unreachable: {source}")]
    Unreachable {
        /// Configured `host:port`.
        endpoint: String,
        /// Connection failure.
        source: io::Error,
    },
    /// The collector did not answer in time.
    #[error("trace collector {endpoint} did not accept a connection within {timeout:?}")]
    TimedOut {
        /// Configured `host:port`.
        endpoint: String,
        /// Elapsed budget.
        timeout: Duration,
    },
}

/// Create the process telemetry handle for `service`.
///
/// # Errors
///
/// Returns [`TelemetryInitError`] when `collector_endpoint` is set and cannot
/// be reached within [`COLLECTOR_CONNECT_TIMEOUT`].
pub async fn init_telemetry(
    service: &'static str,
    collector_endpoint: Option<&str>,
) -> Result<Arc<Telemetry>, TelemetryInitError> {
    match collector_endpoint {
        Some(endpoint) => {
            check_collector(endpoint, COLLECTOR_CONNECT_TIMEOUT).await?;
            info!(service, collector = endpoint, "trace collector reachable");
        }
        None => info!(service, "no trace collector configured"),
    }
    Ok(Arc::new(Telemetry::new(service, Arc::new(LogSpanExporter))))
}

async fn check_collector(endpoint: &str, timeout: Duration) -> Result<(), TelemetryInitError> {
    match tokio::time::timeout(timeout, TcpStream::connect(endpoint)).await {
        Ok(Ok(_stream)) => Ok(()),
        Ok(Err(source)) => Err(TelemetryInitError::Unreachable {
            endpoint: endpoint.to_owned(),
            source,
        }),
        Err(_) => Err(TelemetryInitError::TimedOut {
            endpoint: endpoint.to_owned(),
            timeout,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn starts_without_collector() {
        let telemetry = init_telemetry("input-service", None)
            .await
            .expect("telemetry starts");
        assert_eq!(telemetry.service(), "input-service");
    }

    #[tokio::test]
    async fn accepts_reachable_collector() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind collector");
        let endpoint = listener.local_addr().expect("collector address").to_string();

        init_telemetry("orchestrator-service", Some(&endpoint))
            .await
            .expect("collector reachable");
    }

    #[tokio::test]
    async fn unreachable_collector_is_fatal() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
        let endpoint = listener.local_addr().expect("probe address").to_string();
        drop(listener);

        let error = init_telemetry("orchestrator-service", Some(&endpoint))
            .await
            .expect_err("collector refused");
        assert!(
            matches!(error, TelemetryInitError::Unreachable { .. }),
            "{error}"
        );
    }
}
