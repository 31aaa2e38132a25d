//! Health endpoints: liveness & readiness probes for orchestration and load balancers.
//!
//! Both services walk the same lifecycle: starting, serving, draining, stopped.
//! Phases only move forward, so a late `mark_ready` cannot revive a service
//! that has begun draining.
use actix_web::{HttpResponse, get, http::header, web};
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle phase reported by the probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Phase {
    /// Listener not attached yet.
    Starting = 0,
    /// Accepting traffic.
    Serving = 1,
    /// Finishing in-flight requests after a shutdown signal.
    Draining = 2,
    /// Server stopped.
    Stopped = 3,
}

impl Phase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Starting,
            1 => Self::Serving,
            2 => Self::Draining,
            _ => Self::Stopped,
        }
    }
}

/// Shared health state for readiness and liveness checks.
#[derive(Debug)]
pub struct HealthState {
    phase: AtomicU8,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            phase: AtomicU8::new(Phase::Starting as u8),
        }
    }
}

impl HealthState {
    /// Create a new health state in [`Phase::Starting`].
    pub fn new() -> Self {
        Self::default()
    }

    fn advance(&self, phase: Phase) {
        self.phase.fetch_max(phase as u8, Ordering::AcqRel);
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.advance(Phase::Serving);
    }

    /// Stop advertising readiness while in-flight requests drain.
    pub fn mark_draining(&self) {
        self.advance(Phase::Draining);
    }

    /// Flag the service as stopped so liveness checks fail.
    pub fn mark_unhealthy(&self) {
        self.advance(Phase::Stopped);
    }

    /// Whether the service accepts new traffic.
    pub fn is_ready(&self) -> bool {
        self.phase() == Phase::Serving
    }

    /// Whether the process should be kept running. Draining still counts.
    pub fn is_alive(&self) -> bool {
        self.phase() != Phase::Stopped
    }
}

fn probe_response(probe_ok: bool) -> HttpResponse {
    let mut response = if probe_ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Readiness probe: 200 while serving, 503 while starting, draining or
/// stopped.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Service accepts traffic"),
        (status = 503, description = "Service is starting, draining or stopped")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe_response(state.is_ready())
}

/// Liveness probe: 200 until the server has stopped.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Process is alive"),
        (status = 503, description = "Server has stopped")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe_response(state.is_alive())
}
