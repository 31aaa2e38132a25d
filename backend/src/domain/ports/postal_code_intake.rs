//! Driving port for the Input Service entry point.

use async_trait::async_trait;

use crate::domain::{ClassifiedError, TemperatureResult};

/// Domain use-case port accepting a postal code from an external client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostalCodeIntake: Send + Sync {
    /// Validate `raw_postal_code` and fetch its temperatures downstream.
    async fn submit(&self, raw_postal_code: &str) -> Result<TemperatureResult, ClassifiedError>;
}
