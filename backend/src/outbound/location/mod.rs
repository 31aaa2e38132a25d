//! Postal code lookup adapter.
//!
//! Implements the location `Resolver` over any `UpstreamClient` pointed at a
//! ViaCEP-compatible base URL (`GET /<digits>/json/`).

mod dto;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use self::dto::AddressDto;
use crate::domain::ports::{Resolver, UpstreamClient, UpstreamError, fetch_json};
use crate::domain::{ClassifiedError, Location, POSTAL_CODE_TAG, PostalCodeQuery};

const POSTAL_CODE_NOT_FOUND: &str = "can not find postal code";
const LOCATION_UNKNOWN: &str = "Unknown error getting location";

/// Location resolver backed by the postal code lookup API.
pub struct ViaCepLocationResolver<C: ?Sized> {
    client: Arc<C>,
}

impl<C: ?Sized> ViaCepLocationResolver<C> {
    /// Create a resolver issuing calls through `client`.
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

fn classify(query: &PostalCodeQuery, error: UpstreamError) -> ClassifiedError {
    let classified = if error.is_not_found() {
        ClassifiedError::not_found(POSTAL_CODE_NOT_FOUND, error.to_string())
    } else {
        ClassifiedError::unknown(LOCATION_UNKNOWN, error.to_string())
    };
    classified.with_tag(POSTAL_CODE_TAG, query.as_str())
}

#[async_trait]
impl<C> Resolver<PostalCodeQuery, Location> for ViaCepLocationResolver<C>
where
    C: UpstreamClient + ?Sized,
{
    type Error = ClassifiedError;

    async fn resolve(&self, query: &PostalCodeQuery) -> Result<Location, Self::Error> {
        let endpoint = format!("/{}/json/", query.digits());
        info!(postal_code = %query, "resolving location");
        let address: AddressDto = fetch_json(self.client.as_ref(), &endpoint)
            .await
            .map_err(|error| classify(query, error))?;
        let location = address.into_domain();
        debug!(
            postal_code = %query,
            city = %location.city,
            state = %location.state,
            "location resolved"
        );
        Ok(location)
    }
}
