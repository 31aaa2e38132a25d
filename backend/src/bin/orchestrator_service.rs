//! Orchestrator Service entry point: resolves a postal code to its city and current temperature.

use std::ffi::OsString;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use postal_climate::inbound::http::health::HealthState;
use postal_climate::server::{
    OrchestratorDependencies, ServerConfig, ServiceSettings, build_climate_lookup,
    create_orchestrator_server, drain_on_signal, init_telemetry, shutdown_signal,
};

const SERVICE_NAME: &str = "orchestrator-service";

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let telemetry = init_telemetry(SERVICE_NAME, settings.collector_endpoint())
        .await
        .map_err(std::io::Error::other)?;
    let lookup = build_climate_lookup(&settings, telemetry.clone()).map_err(std::io::Error::other)?;

    let addr = settings.orchestrator_addr().map_err(std::io::Error::other)?;
    let config = ServerConfig::bind(addr, settings.shutdown_grace())?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_orchestrator_server(
        OrchestratorDependencies::new(health_state.clone(), lookup, telemetry.clone()),
        config,
    )?;
    info!(service = SERVICE_NAME, %addr, "listening");

    let drain = drain_on_signal(server.handle(), health_state.clone(), shutdown_signal());
    let outcome = server.await;
    drain.abort();

    health_state.mark_unhealthy();
    telemetry.shutdown();
    info!(service = SERVICE_NAME, "stopped");
    outcome
}
