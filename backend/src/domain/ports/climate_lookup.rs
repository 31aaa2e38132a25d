//! Driving port for the Orchestrator Service lookup.
//!
//! The HTTP handler hands over the raw query value; validation, both upstream
//! calls and the conversion all sit behind this port.

use async_trait::async_trait;

use crate::domain::{ClassifiedError, TemperatureResult};

/// Domain use-case port resolving a postal code to current temperatures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClimateLookup: Send + Sync {
    /// Resolve `raw_postal_code` to temperatures for its city.
    async fn temperatures_for(
        &self,
        raw_postal_code: &str,
    ) -> Result<TemperatureResult, ClassifiedError>;
}

/// Fixture lookup answering every request with the same reading.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureClimateLookup;

#[async_trait]
impl ClimateLookup for FixtureClimateLookup {
    async fn temperatures_for(
        &self,
        _raw_postal_code: &str,
    ) -> Result<TemperatureResult, ClassifiedError> {
        Ok(TemperatureResult::from_celsius("Rio de Janeiro", 30.0))
    }
}
