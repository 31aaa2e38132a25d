//! Service settings loaded via OrthoConfig.
//!
//! Both binaries load the same struct; each reads only the fields it needs.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_INPUT_PORT: u16 = 8080;
const DEFAULT_ORCHESTRATOR_PORT: u16 = 8081;
const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_HTTP_CLIENT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_LOCATION_API_BASE_URL: &str = "https://viacep.com.br/ws";
const DEFAULT_WEATHER_API_BASE_URL: &str = "https://api.weatherapi.com";
const DEFAULT_ORCHESTRATOR_BASE_URL: &str = "http://localhost:8081";
const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 10;

/// Errors raised while turning raw settings into typed values.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The Orchestrator Service cannot start without a weather API key.
    #[error("weather_api_key is required")]
    MissingWeatherApiKey,
    /// A configured base URL does not parse.
    #[error("{field} is not a valid URL: {source}")]
    InvalidUrl {
        /// Setting name.
        field: &'static str,
        /// Parser failure.
        source: url::ParseError,
    },
    /// Host and port do not form a socket address.
    #[error("invalid bind address {address}: {source}")]
    InvalidBindAddress {
        /// Rendered `host:port`.
        address: String,
        /// Parser failure.
        source: std::net::AddrParseError,
    },
}

/// Configuration shared by the Input and Orchestrator services.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CLIMATE")]
pub struct ServiceSettings {
    /// Port the Input Service listens on.
    #[ortho_config(default = 8080)]
    pub input_port: u16,
    /// Port the Orchestrator Service listens on.
    #[ortho_config(default = 8081)]
    pub orchestrator_port: u16,
    /// Interface both services bind to.
    pub bind_host: Option<String>,
    /// Whole-request timeout applied to every upstream call.
    #[ortho_config(default = 5000)]
    pub http_client_timeout_ms: u64,
    /// Base URL of the location lookup.
    pub location_api_base_url: Option<String>,
    /// Base URL of the climate lookup.
    pub weather_api_base_url: Option<String>,
    /// Credential for the climate lookup.
    pub weather_api_key: Option<String>,
    /// Base URL the Input Service uses to reach the Orchestrator Service.
    pub orchestrator_base_url: Option<String>,
    /// `host:port` of the trace collector.
    pub collector_endpoint: Option<String>,
    /// Seconds allowed for in-flight requests to finish on shutdown.
    #[ortho_config(default = 10)]
    pub shutdown_grace_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            input_port: DEFAULT_INPUT_PORT,
            orchestrator_port: DEFAULT_ORCHESTRATOR_PORT,
            bind_host: None,
            http_client_timeout_ms: DEFAULT_HTTP_CLIENT_TIMEOUT_MS,
            location_api_base_url: None,
            weather_api_base_url: None,
            weather_api_key: None,
            orchestrator_base_url: None,
            collector_endpoint: None,
            shutdown_grace_secs: DEFAULT_SHUTDOWN_GRACE_SECS,
        }
    }
}

impl ServiceSettings {
    /// Socket address of the Input Service.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddress`] for an unusable host.
    pub fn input_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.socket_addr(self.input_port)
    }

    /// Socket address of the Orchestrator Service.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddress`] for an unusable host.
    pub fn orchestrator_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.socket_addr(self.orchestrator_port)
    }

    fn socket_addr(&self, port: u16) -> Result<SocketAddr, SettingsError> {
        let host = self.bind_host.as_deref().unwrap_or(DEFAULT_BIND_HOST);
        let address = format!("{host}:{port}");
        address
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddress { address, source })
    }

    /// Upstream call timeout.
    pub fn http_client_timeout(&self) -> Duration {
        Duration::from_millis(self.http_client_timeout_ms)
    }

    /// Grace period for draining in-flight requests.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    /// Parsed location lookup base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the value does not parse.
    pub fn location_api_base_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "location_api_base_url",
            self.location_api_base_url.as_deref(),
            DEFAULT_LOCATION_API_BASE_URL,
        )
    }

    /// Parsed climate lookup base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the value does not parse.
    pub fn weather_api_base_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "weather_api_base_url",
            self.weather_api_base_url.as_deref(),
            DEFAULT_WEATHER_API_BASE_URL,
        )
    }

    /// Parsed Orchestrator Service base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the value does not parse.
    pub fn orchestrator_base_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "orchestrator_base_url",
            self.orchestrator_base_url.as_deref(),
            DEFAULT_ORCHESTRATOR_BASE_URL,
        )
    }

    /// Climate lookup credential.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingWeatherApiKey`] when unset or blank.
    pub fn weather_api_key(&self) -> Result<&str, SettingsError> {
        self.weather_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(SettingsError::MissingWeatherApiKey)
    }

    /// Configured trace collector endpoint, if any.
    pub fn collector_endpoint(&self) -> Option<&str> {
        self.collector_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
    }
}

fn parse_url(field: &'static str, value: Option<&str>, default: &str) -> Result<Url, SettingsError> {
    Url::parse(value.unwrap_or(default)).map_err(|source| SettingsError::InvalidUrl { field, source })
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const ENV_KEYS: [&str; 10] = [
        "CLIMATE_INPUT_PORT",
        "CLIMATE_ORCHESTRATOR_PORT",
        "CLIMATE_BIND_HOST",
        "CLIMATE_HTTP_CLIENT_TIMEOUT_MS",
        "CLIMATE_LOCATION_API_BASE_URL",
        "CLIMATE_WEATHER_API_BASE_URL",
        "CLIMATE_WEATHER_API_KEY",
        "CLIMATE_ORCHESTRATOR_BASE_URL",
        "CLIMATE_COLLECTOR_ENDPOINT",
        "CLIMATE_SHUTDOWN_GRACE_SECS",
    ];

    fn load_from_empty_args() -> ServiceSettings {
        ServiceSettings::load_from_iter([OsString::from("postal-climate")])
            .expect("config should load")
    }

    fn cleared_with(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        ENV_KEYS
            .iter()
            .map(|key| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| (*value).to_owned());
                (*key, value)
            })
            .collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(cleared_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.input_addr().expect("input addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(
            settings.orchestrator_addr().expect("orchestrator addr"),
            "0.0.0.0:8081".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.http_client_timeout(), Duration::from_secs(5));
        assert_eq!(settings.shutdown_grace(), Duration::from_secs(10));
        assert_eq!(
            settings.location_api_base_url().expect("url").as_str(),
            "https://viacep.com.br/ws"
        );
        assert_eq!(
            settings.orchestrator_base_url().expect("url").as_str(),
            "http://localhost:8081/"
        );
        assert!(matches!(
            settings.weather_api_key(),
            Err(SettingsError::MissingWeatherApiKey)
        ));
        assert!(settings.collector_endpoint().is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_with(&[
            ("CLIMATE_INPUT_PORT", "9000"),
            ("CLIMATE_BIND_HOST", "127.0.0.1"),
            ("CLIMATE_HTTP_CLIENT_TIMEOUT_MS", "250"),
            ("CLIMATE_WEATHER_API_KEY", "secret"),
            ("CLIMATE_WEATHER_API_BASE_URL", "http://weather.test:9999"),
            ("CLIMATE_COLLECTOR_ENDPOINT", "otel-collector:4317"),
            ("CLIMATE_SHUTDOWN_GRACE_SECS", "3"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.input_addr().expect("input addr"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.http_client_timeout(), Duration::from_millis(250));
        assert_eq!(settings.weather_api_key().expect("key"), "secret");
        assert_eq!(
            settings.weather_api_base_url().expect("url").as_str(),
            "http://weather.test:9999/"
        );
        assert_eq!(settings.collector_endpoint(), Some("otel-collector:4317"));
        assert_eq!(settings.shutdown_grace(), Duration::from_secs(3));
    }

    #[rstest]
    #[case::blank_key(ServiceSettings { weather_api_key: Some("  ".into()), ..Default::default() })]
    #[case::absent_key(ServiceSettings::default())]
    fn weather_api_key_is_required(#[case] settings: ServiceSettings) {
        assert!(matches!(
            settings.weather_api_key(),
            Err(SettingsError::MissingWeatherApiKey)
        ));
    }

    #[rstest]
    fn malformed_urls_are_rejected() {
        let settings = ServiceSettings {
            orchestrator_base_url: Some("not a url".into()),
            ..Default::default()
        };

        let error = settings.orchestrator_base_url().expect_err("invalid URL");
        assert!(error.to_string().starts_with("orchestrator_base_url"), "{error}");
    }

    #[rstest]
    fn unusable_bind_host_is_rejected() {
        let settings = ServiceSettings {
            bind_host: Some("not a host".into()),
            ..Default::default()
        };

        assert!(matches!(
            settings.input_addr(),
            Err(SettingsError::InvalidBindAddress { .. })
        ));
    }
}
