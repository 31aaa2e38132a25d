//! Driven port for plain HTTP GET calls against one upstream base URL.
//!
//! The port deliberately stops at raw bytes so it stays object safe and easy
//! to mock; [`fetch_json`] layers strict JSON decoding on top.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::define_port_error;

/// Status code an upstream uses to confirm a resource does not exist.
pub const NOT_FOUND_STATUS: u16 = 404;

/// Successful upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// Observed HTTP status, always a success status.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    /// Decode the body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Decode`] carrying the observed status when the
    /// body is not valid JSON for `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, UpstreamError> {
        serde_json::from_slice(&self.body).map_err(|error| {
            UpstreamError::decode(self.status, format!("invalid JSON payload: {error}"))
        })
    }
}

define_port_error! {
    /// Errors surfaced while calling an upstream.
    pub enum UpstreamError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "upstream transport failed: {message}",
        /// The call exceeded the configured timeout.
        Timeout { message: String } =>
            "upstream timeout: {message}",
        /// The upstream answered 404.
        NotFound { message: String } =>
            "upstream resource not found: {message}",
        /// The upstream answered with another non-success status.
        Status { status: u16, message: String } =>
            "upstream answered status {status}: {message}",
        /// The response body could not be decoded.
        Decode { status: u16, message: String } =>
            "upstream response decode failed: {message}",
    }
}

impl UpstreamError {
    /// HTTP status observed for this failure, if a response arrived.
    ///
    /// # Examples
    /// ```
    /// use postal_climate::domain::ports::UpstreamError;
    ///
    /// assert_eq!(UpstreamError::not_found("status 404").status_code(), Some(404));
    /// assert_eq!(UpstreamError::transport("refused").status_code(), None);
    /// ```
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => None,
            Self::NotFound { .. } => Some(NOT_FOUND_STATUS),
            Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
        }
    }
}

/// Port for issuing GET requests relative to a configured base URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Issue a GET for `endpoint`, a path and query appended to the base URL.
    ///
    /// Each call is attempted exactly once. Dropping the returned future
    /// aborts the request.
    async fn get(&self, endpoint: &str) -> Result<UpstreamResponse, UpstreamError>;
}

/// GET `endpoint` and strictly decode the body into `T`.
///
/// # Errors
///
/// Propagates the client's [`UpstreamError`] or a decode failure.
pub async fn fetch_json<T, C>(client: &C, endpoint: &str) -> Result<T, UpstreamError>
where
    T: DeserializeOwned,
    C: UpstreamClient + ?Sized,
{
    client.get(endpoint).await?.decode()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Reading {
        temp_c: f64,
    }

    #[rstest]
    #[case::transport(UpstreamError::transport("refused"), None)]
    #[case::timeout(UpstreamError::timeout("elapsed"), None)]
    #[case::not_found(UpstreamError::not_found("status 404"), Some(404))]
    #[case::status(UpstreamError::status(502_u16, "bad gateway"), Some(502))]
    #[case::decode(UpstreamError::decode(200_u16, "eof"), Some(200))]
    fn status_code_reflects_observed_status(
        #[case] error: UpstreamError,
        #[case] expected: Option<u16>,
    ) {
        assert_eq!(error.status_code(), expected);
        assert_eq!(error.is_not_found(), expected == Some(NOT_FOUND_STATUS));
    }

    #[tokio::test]
    async fn fetch_json_decodes_success_body() {
        let mut client = MockUpstreamClient::new();
        client
            .expect_get()
            .withf(|endpoint| endpoint == "/reading")
            .times(1)
            .return_once(|_| {
                Ok(UpstreamResponse {
                    status: 200,
                    body: br#"{"temp_c": 21.5}"#.to_vec(),
                })
            });

        let reading: Reading = fetch_json(&client, "/reading").await.expect("decoded");
        assert_eq!(reading, Reading { temp_c: 21.5 });
    }

    #[tokio::test]
    async fn fetch_json_rejects_malformed_body() {
        let mut client = MockUpstreamClient::new();
        client.expect_get().return_once(|_| {
            Ok(UpstreamResponse {
                status: 200,
                body: br#"{"temp_c": "#.to_vec(),
            })
        });

        let error = fetch_json::<Reading, _>(&client, "/reading")
            .await
            .expect_err("decode must fail");
        assert!(matches!(error, UpstreamError::Decode { status: 200, .. }));
    }

    #[tokio::test]
    async fn fetch_json_propagates_client_errors() {
        let mut client = MockUpstreamClient::new();
        client
            .expect_get()
            .return_once(|_| Err(UpstreamError::not_found("status 404")));

        let error = fetch_json::<Reading, _>(&client, "/reading")
            .await
            .expect_err("must fail");
        assert!(error.is_not_found());
    }
}
