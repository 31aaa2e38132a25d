//! Postal code to current temperature, split across an Input Service and an
//! Orchestrator Service.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use middleware::Trace;
