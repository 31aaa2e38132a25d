//! Tracing middleware continuing or starting a W3C trace per request.
//!
//! The inbound `traceparent` header is parsed when present; otherwise a new
//! root trace starts. A server span is opened for the request, its context is
//! placed in task-local storage for the handler and every outbound call, and
//! the trace identifier is echoed on the `trace-id` response header.
//!
//! Tokio task-local variables are not inherited across spawned tasks. Use
//! [`TraceContext::scope`] when spawning new tasks or moving work onto
//! blocking threads to ensure the active context propagates correctly.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, debug, error, info_span};

use crate::domain::{TRACE_ID_HEADER, TRACEPARENT_HEADER, Telemetry, TraceContext};

/// Tracing middleware wrapping every route of a service.
///
/// Handlers can read the active context via [`TraceContext::current`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::App;
/// use postal_climate::Trace;
/// use postal_climate::domain::Telemetry;
/// use postal_climate::outbound::LogSpanExporter;
///
/// let telemetry = Arc::new(Telemetry::new("input-service", Arc::new(LogSpanExporter)));
/// let app = App::new().wrap(Trace::new(telemetry));
/// ```
#[derive(Clone)]
pub struct Trace {
    telemetry: Arc<Telemetry>,
}

impl Trace {
    /// Create the middleware reporting server spans through `telemetry`.
    pub fn new(telemetry: Arc<Telemetry>) -> Self {
        Self { telemetry }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware {
            service,
            telemetry: Arc::clone(&self.telemetry),
        }))
    }
}

/// Service wrapper produced by [`Trace`].
///
/// Applications should not use this type directly.
pub struct TraceMiddleware<S> {
    service: S,
    telemetry: Arc<Telemetry>,
}

fn remote_context(req: &ServiceRequest) -> Option<TraceContext> {
    let raw = req.headers().get(TRACEPARENT_HEADER)?.to_str().ok()?;
    match raw.parse() {
        Ok(context) => Some(context),
        Err(error) => {
            debug!(%error, "ignoring invalid traceparent header");
            None
        }
    }
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let remote = remote_context(&req);
        let mut span = self
            .telemetry
            .start_server_span(format!("{} {}", req.method(), req.path()), remote);
        let context = span.context();
        let trace_id = context.trace_id();
        let request_span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path()
        );
        let header_value = trace_id.to_string();
        let fut = self.service.call(req);
        Box::pin(TraceContext::scope(
            context,
            async move {
                let outcome = fut.await;
                match &outcome {
                    Ok(res) if res.status().is_server_error() => {
                        span.fail("server error", res.status().to_string());
                    }
                    Ok(_) => {}
                    Err(err) => span.fail("request failed", err.to_string()),
                }
                span.end();

                let mut res = outcome?;
                match HeaderValue::from_str(&header_value) {
                    Ok(value) => {
                        res.response_mut()
                            .headers_mut()
                            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                    }
                    Err(error) => {
                        error!(
                            %error,
                            trace_id = %trace_id,
                            "failed to encode trace identifier header"
                        );
                    }
                }
                Ok(res)
            }
            .instrument(request_span),
        ))
    }
}
