//! Domain primitives, pipelines, and the ports they depend on.
//!
//! Purpose: Define the transport-agnostic core shared by the Input and
//! Orchestrator services. Nothing in here knows about actix or reqwest.
//!
//! Public surface:
//! - ClassifiedError: closed failure taxonomy mapped to HTTP statuses at the
//!   inbound edge.
//! - PostalCode / PostalCodeQuery: validated inputs of the two services.
//! - TemperatureResult: terminal payload in three scales.
//! - TraceContext / Telemetry: W3C trace context and the span handle.
//! - ClimateLookupService / PostalCodeIntakeService: the two pipelines.

pub mod climate_lookup_service;
pub mod error;
pub mod location;
pub mod ports;
pub mod postal_code;
pub mod postal_code_intake_service;
pub mod telemetry;
pub mod temperature;
pub mod trace_context;

pub use self::climate_lookup_service::ClimateLookupService;
pub use self::error::{ClassifiedError, ErrorKind, ErrorTags};
pub use self::location::{ClimateReading, Location, RegionCodes};
pub use self::postal_code::{
    INVALID_POSTAL_CODE, POSTAL_CODE_LEN, POSTAL_CODE_TAG, PostalCode, PostalCodeQuery,
};
pub use self::postal_code_intake_service::PostalCodeIntakeService;
pub use self::telemetry::{FinishedSpan, OperationSpan, SpanStatus, Telemetry};
pub use self::temperature::TemperatureResult;
pub use self::trace_context::{
    SpanId, TRACE_ID_HEADER, TRACEPARENT_HEADER, TraceContext, TraceContextError, TraceId,
};
