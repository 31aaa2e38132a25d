//! Input pipeline: validate locally, then ask the Orchestrator Service.
//!
//! The orchestrator's classification crosses the network as a bare HTTP
//! status, so it is reconstructed here from the upstream error rather than
//! carried structurally.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{PostalCodeIntake, UpstreamClient, UpstreamError, fetch_json};
use crate::domain::{ClassifiedError, POSTAL_CODE_TAG, PostalCode, Telemetry, TemperatureResult};

/// Span covering the call to the Orchestrator Service.
pub const ORCHESTRATOR_SPAN: &str = "find-temperatures-by-postal-code";

const UPSTREAM_STATUS_TAG: &str = "upstream_status";
const POSTAL_CODE_NOT_FOUND: &str = "can not find postal code";
const ORCHESTRATOR_DECODE_FAILED: &str = "error decoding orchestrator response";
const ORCHESTRATOR_UNKNOWN: &str = "Unknown error getting temperatures";

/// Input service implementing [`PostalCodeIntake`].
pub struct PostalCodeIntakeService<C: ?Sized> {
    orchestrator: Arc<C>,
    telemetry: Arc<Telemetry>,
}

impl<C: ?Sized> PostalCodeIntakeService<C> {
    /// Create a service calling the orchestrator through `orchestrator`.
    pub fn new(orchestrator: Arc<C>, telemetry: Arc<Telemetry>) -> Self {
        Self {
            orchestrator,
            telemetry,
        }
    }
}

fn classify(code: &PostalCode, error: UpstreamError) -> ClassifiedError {
    let status = error.status_code();
    let classified = match &error {
        UpstreamError::NotFound { .. } => {
            ClassifiedError::not_found(POSTAL_CODE_NOT_FOUND, error.to_string())
        }
        UpstreamError::Decode { .. } => {
            ClassifiedError::unknown(ORCHESTRATOR_DECODE_FAILED, error.to_string())
        }
        UpstreamError::Transport { .. }
        | UpstreamError::Timeout { .. }
        | UpstreamError::Status { .. } => {
            ClassifiedError::unknown(ORCHESTRATOR_UNKNOWN, error.to_string())
        }
    }
    .with_tag(POSTAL_CODE_TAG, code.as_str());
    match status {
        Some(status) => classified.with_tag(UPSTREAM_STATUS_TAG, status.to_string()),
        None => classified,
    }
}

#[async_trait]
impl<C> PostalCodeIntake for PostalCodeIntakeService<C>
where
    C: UpstreamClient + ?Sized,
{
    async fn submit(&self, raw_postal_code: &str) -> Result<TemperatureResult, ClassifiedError> {
        let code = PostalCode::new(raw_postal_code)?;
        let endpoint = format!("/?postal_code={code}");

        let mut span = self.telemetry.start_span(ORCHESTRATOR_SPAN);
        let outcome = span
            .in_scope(fetch_json::<TemperatureResult, _>(
                self.orchestrator.as_ref(),
                &endpoint,
            ))
            .await
            .map_err(|error| classify(&code, error));
        match &outcome {
            Ok(result) => debug!(postal_code = %code, city = %result.city, "orchestrator answered"),
            Err(error) => {
                warn!(postal_code = %code, error = %error.cause(), "orchestrator call failed");
                span.fail(error.message(), error.cause());
            }
        }
        span.end();
        outcome
    }
}
