//! Orchestrator pipeline: postal code to location to climate to temperatures.
//!
//! Each resolver call runs inside its own child span, with the span's trace
//! context in scope so the upstream request carries it. Spans are closed on
//! every exit path and record the failure before closing.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{ClimateLookup, Resolver, UpstreamError};
use crate::domain::{
    ClassifiedError, ClimateReading, Location, POSTAL_CODE_TAG, PostalCodeQuery, Telemetry,
    TemperatureResult,
};

/// Span covering the postal code lookup.
pub const LOCATION_SPAN: &str = "find-location-by-postal-code";
/// Span covering the weather lookup.
pub const CLIMATE_SPAN: &str = "find-climate-by-city-name";

const CITY_TAG: &str = "city";
const POSTAL_CODE_NOT_FOUND: &str = "can not find postal code";
const LOCATION_UNKNOWN: &str = "Unknown error getting location";
const CLIMATE_UNKNOWN: &str = "Unknown error getting climate";

/// Orchestrator service implementing [`ClimateLookup`].
pub struct ClimateLookupService<L: ?Sized, C: ?Sized> {
    location: Arc<L>,
    climate: Arc<C>,
    telemetry: Arc<Telemetry>,
}

impl<L: ?Sized, C: ?Sized> ClimateLookupService<L, C> {
    /// Create a service over the given resolvers.
    pub fn new(location: Arc<L>, climate: Arc<C>, telemetry: Arc<Telemetry>) -> Self {
        Self {
            location,
            climate,
            telemetry,
        }
    }
}

impl<L, C> ClimateLookupService<L, C>
where
    L: Resolver<PostalCodeQuery, Location, Error = ClassifiedError> + ?Sized,
    C: Resolver<str, ClimateReading, Error = UpstreamError> + ?Sized,
{
    async fn find_location(&self, query: &PostalCodeQuery) -> Result<Location, ClassifiedError> {
        let mut span = self.telemetry.start_span(LOCATION_SPAN);
        let outcome = span.in_scope(self.location.resolve(query)).await;
        if let Err(error) = &outcome {
            span.fail(error.message(), error.cause());
        }
        span.end();
        outcome
    }

    async fn find_climate(&self, city: &str) -> Result<ClimateReading, UpstreamError> {
        let mut span = self.telemetry.start_span(CLIMATE_SPAN);
        let outcome = span.in_scope(self.climate.resolve(city)).await;
        if let Err(error) = &outcome {
            span.fail(CLIMATE_UNKNOWN, error.to_string());
        }
        span.end();
        outcome
    }
}

#[async_trait]
impl<L, C> ClimateLookup for ClimateLookupService<L, C>
where
    L: Resolver<PostalCodeQuery, Location, Error = ClassifiedError> + ?Sized,
    C: Resolver<str, ClimateReading, Error = UpstreamError> + ?Sized,
{
    async fn temperatures_for(
        &self,
        raw_postal_code: &str,
    ) -> Result<TemperatureResult, ClassifiedError> {
        let query = PostalCodeQuery::parse(raw_postal_code)?;

        // Only an empty city is a not-found outcome; resolver failures are
        // server faults.
        let location = self.find_location(&query).await.map_err(|error| {
            warn!(postal_code = %query, error = %error.cause(), "location lookup failed");
            error.into_unknown(LOCATION_UNKNOWN)
        })?;
        if !location.has_city() {
            info!(postal_code = %query, "postal code resolved to an empty city");
            return Err(ClassifiedError::not_found(
                POSTAL_CODE_NOT_FOUND,
                "location lookup returned an empty city",
            )
            .with_tag(POSTAL_CODE_TAG, query.as_str()));
        }

        let reading = self.find_climate(&location.city).await.map_err(|error| {
            warn!(city = %location.city, error = %error, "climate lookup failed");
            ClassifiedError::unknown(CLIMATE_UNKNOWN, error.to_string())
                .with_tag(POSTAL_CODE_TAG, query.as_str())
                .with_tag(CITY_TAG, location.city.as_str())
        })?;

        Ok(TemperatureResult::from_celsius(location.city, reading.celsius))
    }
}

#[cfg(test)]
#[path = "climate_lookup_service_tests.rs"]
mod tests;
