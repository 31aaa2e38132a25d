//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`UpstreamClient`, `Resolver`, `SpanExporter`) describe what
//! the domain needs from the outside world. Driving ports (`ClimateLookup`,
//! `PostalCodeIntake`) are what the inbound HTTP adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod climate_lookup;
mod postal_code_intake;
mod resolver;
mod span_exporter;
mod upstream_client;

#[cfg(test)]
pub use climate_lookup::MockClimateLookup;
pub use climate_lookup::{ClimateLookup, FixtureClimateLookup};
#[cfg(test)]
pub use postal_code_intake::MockPostalCodeIntake;
pub use postal_code_intake::PostalCodeIntake;
pub use resolver::Resolver;
#[cfg(test)]
pub use span_exporter::MockSpanExporter;
pub use span_exporter::SpanExporter;
#[cfg(test)]
pub use upstream_client::MockUpstreamClient;
pub use upstream_client::{
    NOT_FOUND_STATUS, UpstreamClient, UpstreamError, UpstreamResponse, fetch_json,
};
