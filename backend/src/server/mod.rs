//! Server construction and middleware wiring for both services.

mod settings;
mod shutdown;
mod state_builders;
mod telemetry;

pub use settings::{ServiceSettings, SettingsError};
pub use shutdown::{drain_on_signal, shutdown_signal};
pub use state_builders::{StateBuildError, build_climate_lookup, build_postal_code_intake};
pub use telemetry::{COLLECTOR_CONNECT_TIMEOUT, TelemetryInitError, init_telemetry};

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::{InputApiDoc, OrchestratorApiDoc};
use crate::domain::Telemetry;
use crate::domain::ports::{ClimateLookup, PostalCodeIntake};
use crate::inbound::http::climate::{get_temperatures, query_config};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::input::{json_config, submit_postal_code};
use crate::inbound::http::state::{InputState, OrchestratorState};

/// Listener and drain settings for one HTTP server.
pub struct ServerConfig {
    listener: TcpListener,
    shutdown_grace: Duration,
}

impl ServerConfig {
    /// Bind `addr` for a server draining within `shutdown_grace`.
    ///
    /// # Errors
    ///
    /// Propagates [`std::io::Error`] when the socket cannot be bound.
    pub fn bind(addr: SocketAddr, shutdown_grace: Duration) -> std::io::Result<Self> {
        Ok(Self::from_listener(TcpListener::bind(addr)?, shutdown_grace))
    }

    /// Use an already bound listener.
    #[must_use]
    pub fn from_listener(listener: TcpListener, shutdown_grace: Duration) -> Self {
        Self {
            listener,
            shutdown_grace,
        }
    }

    /// Return the socket address the server will accept on.
    ///
    /// # Errors
    ///
    /// Propagates [`std::io::Error`] from the listener.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

/// Dependencies shared by every worker of the Orchestrator Service.
#[derive(Clone)]
pub struct OrchestratorDependencies {
    /// Probe state, shared with the shutdown task.
    pub health_state: web::Data<HealthState>,
    pub state: web::Data<OrchestratorState>,
    pub telemetry: Arc<Telemetry>,
}

impl OrchestratorDependencies {
    /// Bundle the lookup port with its health state and telemetry.
    pub fn new(
        health_state: web::Data<HealthState>,
        lookup: Arc<dyn ClimateLookup>,
        telemetry: Arc<Telemetry>,
    ) -> Self {
        Self {
            health_state,
            state: web::Data::new(OrchestratorState::new(lookup)),
            telemetry,
        }
    }
}

/// Dependencies shared by every worker of the Input Service.
#[derive(Clone)]
pub struct InputDependencies {
    /// Probe state, shared with the shutdown task.
    pub health_state: web::Data<HealthState>,
    pub state: web::Data<InputState>,
    pub telemetry: Arc<Telemetry>,
}

impl InputDependencies {
    /// Bundle the intake port with its health state and telemetry.
    pub fn new(
        health_state: web::Data<HealthState>,
        intake: Arc<dyn PostalCodeIntake>,
        telemetry: Arc<Telemetry>,
    ) -> Self {
        Self {
            health_state,
            state: web::Data::new(InputState::new(intake)),
            telemetry,
        }
    }
}

/// Build the Orchestrator Service application.
pub fn build_orchestrator_app(
    deps: OrchestratorDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let OrchestratorDependencies {
        health_state,
        state,
        telemetry,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(state)
        .app_data(query_config())
        .wrap(Trace::new(telemetry))
        .service(get_temperatures)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs").url("/api-docs/openapi.json", OrchestratorApiDoc::openapi()),
    );

    app
}

/// Build the Input Service application.
pub fn build_input_app(
    deps: InputDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let InputDependencies {
        health_state,
        state,
        telemetry,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(state)
        .app_data(json_config())
        .wrap(Trace::new(telemetry))
        .service(submit_postal_code)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app
        .service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", InputApiDoc::openapi()));

    app
}

/// Construct the Orchestrator Service HTTP server.
///
/// Signal handling is left to the caller (see [`drain_on_signal`]). Readiness
/// is marked once the listener is attached.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when attaching the listener fails.
pub fn create_orchestrator_server(
    deps: OrchestratorDependencies,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let health_state = deps.health_state.clone();
    let ServerConfig {
        listener,
        shutdown_grace,
    } = config;

    let server = HttpServer::new(move || build_orchestrator_app(deps.clone()))
        .disable_signals()
        .shutdown_timeout(shutdown_grace.as_secs())
        .listen(listener)?
        .run();

    health_state.mark_ready();
    Ok(server)
}

/// Construct the Input Service HTTP server.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when attaching the listener fails.
pub fn create_input_server(deps: InputDependencies, config: ServerConfig) -> std::io::Result<Server> {
    let health_state = deps.health_state.clone();
    let ServerConfig {
        listener,
        shutdown_grace,
    } = config;

    let server = HttpServer::new(move || build_input_app(deps.clone()))
        .disable_signals()
        .shutdown_timeout(shutdown_grace.as_secs())
        .listen(listener)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
