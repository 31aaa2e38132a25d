//! Shared HTTP adapter state.
//!
//! HTTP handlers accept these states via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ClimateLookup, PostalCodeIntake};

/// Dependency bundle for the Orchestrator Service handlers.
#[derive(Clone)]
pub struct OrchestratorState {
    /// Postal code to temperatures use-case.
    pub lookup: Arc<dyn ClimateLookup>,
}

impl OrchestratorState {
    /// Bundle the climate lookup port.
    pub fn new(lookup: Arc<dyn ClimateLookup>) -> Self {
        Self { lookup }
    }
}

/// Dependency bundle for the Input Service handlers.
#[derive(Clone)]
pub struct InputState {
    /// Postal code submission use-case.
    pub intake: Arc<dyn PostalCodeIntake>,
}

impl InputState {
    /// Bundle the postal code intake port.
    pub fn new(intake: Arc<dyn PostalCodeIntake>) -> Self {
        Self { intake }
    }
}
