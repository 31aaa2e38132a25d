//! Reqwest-backed `UpstreamClient` adapter.
//!
//! This adapter owns transport details only: URL assembly, trace context
//! injection, the configured timeout, and HTTP status mapping. Decoding is
//! left to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::ports::{UpstreamClient, UpstreamError, UpstreamResponse};
use crate::domain::{TRACEPARENT_HEADER, TraceContext};

/// Upstream client issuing GET requests relative to one base URL.
///
/// The underlying reqwest client keeps a keep-alive pool per target host.
pub struct ReqwestUpstreamClient {
    client: Client,
    base_url: Url,
}

impl ReqwestUpstreamClient {
    /// Build a client with an explicit whole-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, UpstreamError> {
        let joined = format!("{}{endpoint}", self.base_url.as_str().trim_end_matches('/'));
        Url::parse(&joined).map_err(|error| {
            UpstreamError::transport(format!("invalid upstream URL {joined}: {error}"))
        })
    }
}

#[async_trait]
impl UpstreamClient for ReqwestUpstreamClient {
    async fn get(&self, endpoint: &str) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.endpoint_url(endpoint)?;
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(context) = TraceContext::current() {
            request = request.header(TRACEPARENT_HEADER, context.to_string());
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        Ok(UpstreamResponse {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> UpstreamError {
    // Query strings may carry credentials.
    let error = error.without_url();
    if error.is_timeout() {
        UpstreamError::timeout(error.to_string())
    } else {
        UpstreamError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> UpstreamError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::NOT_FOUND => UpstreamError::not_found(message),
        _ => UpstreamError::status(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
