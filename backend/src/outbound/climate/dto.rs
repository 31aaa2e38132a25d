//! DTOs for decoding current weather responses.

use serde::Deserialize;

use crate::domain::ClimateReading;

#[derive(Debug, Deserialize)]
pub(super) struct CurrentWeatherDto {
    #[serde(default)]
    pub(super) location: WeatherLocationDto,
    pub(super) current: CurrentReadingDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct WeatherLocationDto {
    pub(super) name: String,
    pub(super) region: String,
    pub(super) country: String,
    pub(super) localtime: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CurrentReadingDto {
    pub(super) temp_c: f64,
    #[serde(default)]
    pub(super) temp_f: Option<f64>,
    #[serde(default)]
    pub(super) last_updated: String,
}

impl CurrentWeatherDto {
    pub(super) fn into_domain(self) -> ClimateReading {
        ClimateReading {
            celsius: self.current.temp_c,
            source_location: self.location.name,
            source_region: self.location.region,
            source_country: self.location.country,
            last_updated: self.current.last_updated,
        }
    }
}
