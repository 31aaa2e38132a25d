//! Current weather lookup adapter.
//!
//! Implements the climate `Resolver` over any `UpstreamClient` pointed at a
//! WeatherAPI-compatible base URL. Failures are surfaced as raw
//! [`UpstreamError`]s; classifying them is the caller's job.

mod dto;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use url::form_urlencoded;

use self::dto::CurrentWeatherDto;
use crate::domain::ClimateReading;
use crate::domain::ports::{Resolver, UpstreamClient, UpstreamError, fetch_json};

const CURRENT_WEATHER_PATH: &str = "/v1/current.json";

/// Climate resolver backed by the current weather API.
pub struct WeatherApiClimateResolver<C: ?Sized> {
    client: Arc<C>,
    api_key: String,
}

impl<C: ?Sized> WeatherApiClimateResolver<C> {
    /// Create a resolver authenticating with `api_key`.
    pub fn new(client: Arc<C>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, city: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("key", &self.api_key)
            .append_pair("q", city)
            .append_pair("aqi", "no")
            .finish();
        format!("{CURRENT_WEATHER_PATH}?{query}")
    }
}

#[async_trait]
impl<C> Resolver<str, ClimateReading> for WeatherApiClimateResolver<C>
where
    C: UpstreamClient + ?Sized,
{
    type Error = UpstreamError;

    async fn resolve(&self, city: &str) -> Result<ClimateReading, Self::Error> {
        info!(city = %city, "resolving climate");
        let weather: CurrentWeatherDto =
            fetch_json(self.client.as_ref(), &self.endpoint(city)).await?;
        debug!(
            city = %city,
            celsius = weather.current.temp_c,
            fahrenheit = ?weather.current.temp_f,
            localtime = %weather.location.localtime,
            "climate resolved"
        );
        Ok(weather.into_domain())
    }
}
