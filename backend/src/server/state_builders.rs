//! Builders wiring outbound adapters into the domain services.

use std::sync::Arc;

use crate::domain::ports::{ClimateLookup, PostalCodeIntake};
use crate::domain::{ClimateLookupService, PostalCodeIntakeService, Telemetry};
use crate::outbound::{ReqwestUpstreamClient, ViaCepLocationResolver, WeatherApiClimateResolver};

use super::{ServiceSettings, SettingsError};

/// Failure to assemble a service from its settings.
#[derive(Debug, thiserror::Error)]
pub enum StateBuildError {
    /// Settings are missing or malformed.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Build the Orchestrator Service lookup over the configured upstreams.
///
/// The location and climate lookups each get their own client and pool.
///
/// # Errors
///
/// Returns [`StateBuildError`] when a base URL or the API key is unusable.
pub fn build_climate_lookup(
    settings: &ServiceSettings,
    telemetry: Arc<Telemetry>,
) -> Result<Arc<dyn ClimateLookup>, StateBuildError> {
    let timeout = settings.http_client_timeout();
    let location_client = Arc::new(ReqwestUpstreamClient::new(
        settings.location_api_base_url()?,
        timeout,
    )?);
    let climate_client = Arc::new(ReqwestUpstreamClient::new(
        settings.weather_api_base_url()?,
        timeout,
    )?);
    let location = Arc::new(ViaCepLocationResolver::new(location_client));
    let climate = Arc::new(WeatherApiClimateResolver::new(
        climate_client,
        settings.weather_api_key()?,
    ));
    Ok(Arc::new(ClimateLookupService::new(
        location, climate, telemetry,
    )))
}

/// Build the Input Service intake calling the configured Orchestrator.
///
/// # Errors
///
/// Returns [`StateBuildError`] when the orchestrator URL is unusable.
pub fn build_postal_code_intake(
    settings: &ServiceSettings,
    telemetry: Arc<Telemetry>,
) -> Result<Arc<dyn PostalCodeIntake>, StateBuildError> {
    let orchestrator = Arc::new(ReqwestUpstreamClient::new(
        settings.orchestrator_base_url()?,
        settings.http_client_timeout(),
    )?);
    Ok(Arc::new(PostalCodeIntakeService::new(orchestrator, telemetry)))
}
