//! Input Service entry point: accepts a postal code and forwards it to the
//! Orchestrator Service.

use std::ffi::OsString;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use postal_climate::inbound::http::health::HealthState;
use postal_climate::server::{
    InputDependencies, ServerConfig, ServiceSettings, build_postal_code_intake,
    create_input_server, drain_on_signal, init_telemetry, shutdown_signal,
};

const SERVICE_NAME: &str = "input-service";

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
    let intake = build_postal_code_intake(&settings, telemetry.clone()).map_err(std::io::Error::other)?;

    let addr = settings.input_addr().map_err(std::io::Error::other)?;
    let config = ServerConfig::bind(addr, settings.shutdown_grace())?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_input_server(
        InputDependencies::new(health_state.clone(), intake, telemetry.clone()),
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
