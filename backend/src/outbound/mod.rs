//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http_upstream**: reqwest-backed `UpstreamClient`
//! - **location**: postal code lookup `Resolver`
//! - **climate**: current weather `Resolver`
//! - **span_log**: `SpanExporter` writing to the structured log
//!
//! Adapters are thin translators that convert between domain types and
//! transport representations. They contain no business logic.

pub mod climate;
pub mod http_upstream;
pub mod location;
pub mod span_log;

pub use climate::WeatherApiClimateResolver;
pub use http_upstream::ReqwestUpstreamClient;
pub use location::ViaCepLocationResolver;
pub use span_log::{LogSpanExporter, SPAN_EXPORT_TARGET};
