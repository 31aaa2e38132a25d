//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! trace context extraction.

pub mod trace;

pub use trace::Trace;
