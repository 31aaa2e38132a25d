//! HTTP inbound adapter exposing both services' REST endpoints.

pub mod climate;
pub mod error;
pub mod health;
pub mod input;
pub mod state;

pub use error::ApiResult;
