//! Process-scoped span handle and the spans it produces.
//!
//! A [`Telemetry`] is constructed once per process and passed by `Arc` to the
//! services and the inbound trace middleware. Every span it opens is tied to
//! the task-local [`TraceContext`], so spans nest under the inbound request
//! and outbound calls made inside [`OperationSpan::in_scope`] carry the
//! span's context.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant, SystemTime};

use super::ports::SpanExporter;
use super::trace_context::{SpanId, TraceContext, TraceId};

/// Outcome recorded on a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanStatus {
    /// The operation completed.
    Ok,
    /// The operation failed.
    Error {
        /// Short failure description.
        description: String,
        /// Rendered underlying cause.
        cause: String,
    },
}

/// A closed span handed to the exporter.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedSpan {
    /// Name of the emitting service.
    pub service: Arc<str>,
    /// Operation name.
    pub name: String,
    /// Trace this span belongs to.
    pub trace_id: TraceId,
    /// Identifier of this span.
    pub span_id: SpanId,
    /// Identifier of the parent span, absent for roots.
    pub parent_span_id: Option<SpanId>,
    /// Wall-clock start time.
    pub started_at: SystemTime,
    /// Elapsed time between open and close.
    pub duration: Duration,
    /// Recorded outcome.
    pub status: SpanStatus,
}

impl FinishedSpan {
    /// Whether the span recorded a failure.
    pub fn is_error(&self) -> bool {
        matches!(self.status, SpanStatus::Error { .. })
    }
}

/// Explicitly constructed tracer handle.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use postal_climate::domain::Telemetry;
/// use postal_climate::outbound::LogSpanExporter;
///
/// let telemetry = Telemetry::new("orchestrator-service", Arc::new(LogSpanExporter));
/// let span = telemetry.start_span("find-location-by-postal-code");
/// span.end();
/// telemetry.shutdown();
/// ```
pub struct Telemetry {
    service: Arc<str>,
    exporter: Arc<dyn SpanExporter>,
    shut_down: Arc<AtomicBool>,
}

impl fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Telemetry")
            .field("service", &self.service)
            .field("shut_down", &self.shut_down.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl Telemetry {
    /// Create a handle exporting spans for `service`.
    pub fn new(service: impl Into<Arc<str>>, exporter: Arc<dyn SpanExporter>) -> Self {
        Self {
            service: service.into(),
            exporter,
            shut_down: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Name of the service this handle reports for.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Open a child span of the context currently in scope.
    ///
    /// Starts a new root trace when no context is in scope.
    pub fn start_span(&self, name: impl Into<String>) -> OperationSpan {
        match TraceContext::current() {
            Some(parent) => self.open(name.into(), parent.child(), Some(parent.span_id())),
            None => self.open(name.into(), TraceContext::new_root(), None),
        }
    }

    /// Open the server span for an inbound request.
    ///
    /// `remote_parent` is the context extracted from the caller, if any.
    pub fn start_server_span(
        &self,
        name: impl Into<String>,
        remote_parent: Option<TraceContext>,
    ) -> OperationSpan {
        match remote_parent {
            Some(parent) => self.open(name.into(), parent.child(), Some(parent.span_id())),
            None => self.open(name.into(), TraceContext::new_root(), None),
        }
    }

    /// Flush the exporter. Spans closed afterwards are discarded.
    pub fn shutdown(&self) {
        if !self.shut_down.swap(true, Ordering::SeqCst) {
            self.exporter.shutdown();
        }
    }

    fn open(&self, name: String, context: TraceContext, parent: Option<SpanId>) -> OperationSpan {
        OperationSpan {
            service: Arc::clone(&self.service),
            exporter: Arc::clone(&self.exporter),
            shut_down: Arc::clone(&self.shut_down),
            name,
            context,
            parent,
            started_at: SystemTime::now(),
            started: Instant::now(),
            status: SpanStatus::Ok,
            closed: false,
        }
    }
}

/// An open span for one logical operation.
///
/// Closed exactly once, either through [`OperationSpan::end`] or on drop.
#[must_use = "a span closes as soon as it is dropped"]
pub struct OperationSpan {
    service: Arc<str>,
    exporter: Arc<dyn SpanExporter>,
    shut_down: Arc<AtomicBool>,
    name: String,
    context: TraceContext,
    parent: Option<SpanId>,
    started_at: SystemTime,
    started: Instant,
    status: SpanStatus,
    closed: bool,
}

impl OperationSpan {
    /// Trace context identifying this span.
    pub fn context(&self) -> TraceContext {
        self.context
    }

    /// Run `fut` with this span as the active trace context.
    pub async fn in_scope<Fut>(&self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TraceContext::scope(self.context, fut).await
    }

    /// Mark the span as failed and record the cause.
    pub fn fail(&mut self, description: impl Into<String>, cause: impl Into<String>) {
        self.status = SpanStatus::Error {
            description: description.into(),
            cause: cause.into(),
        };
    }

    /// Close the span.
    pub fn end(mut self) {
        self.close();
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if self.shut_down.load(Ordering::SeqCst) {
            return;
        }
        self.exporter.export(FinishedSpan {
            service: Arc::clone(&self.service),
            name: std::mem::take(&mut self.name),
            trace_id: self.context.trace_id(),
            span_id: self.context.span_id(),
            parent_span_id: self.parent,
            started_at: self.started_at,
            duration: self.started.elapsed(),
            status: std::mem::replace(&mut self.status, SpanStatus::Ok),
        });
    }
}

impl Drop for OperationSpan {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use crate::domain::ports::MockSpanExporter;
    use rstest::{fixture, rstest};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Captured(Mutex<Vec<FinishedSpan>>);

    impl SpanExporter for Captured {
        fn export(&self, span: FinishedSpan) {
            self.0.lock().expect("capture lock").push(span);
        }
    }

    impl Captured {
        fn spans(&self) -> Vec<FinishedSpan> {
            self.0.lock().expect("capture lock").clone()
        }
    }

    #[fixture]
    fn captured() -> Arc<Captured> {
        Arc::new(Captured::default())
    }

    #[rstest]
    fn end_exports_exactly_once(captured: Arc<Captured>) {
        let telemetry = Telemetry::new("svc", captured.clone());
        telemetry.start_span("op").end();

        let spans = captured.spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, "op");
        assert_eq!(spans[0].status, SpanStatus::Ok);
        assert!(spans[0].parent_span_id.is_none());
    }

    #[rstest]
    fn dropping_an_open_span_closes_it(captured: Arc<Captured>) {
        let telemetry = Telemetry::new("svc", captured.clone());
        {
            let mut span = telemetry.start_span("op");
            span.fail("lookup failed", "connection refused");
        }

        let spans = captured.spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(
            spans[0].status,
            SpanStatus::Error {
                description: "lookup failed".to_owned(),
                cause: "connection refused".to_owned(),
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn child_spans_nest_under_the_context_in_scope(captured: Arc<Captured>) {
        let telemetry = Telemetry::new("svc", captured.clone());
        let server = telemetry.start_server_span("request", None);
        let server_context = server.context();

        server
            .in_scope(async {
                let child = telemetry.start_span("child");
                assert_eq!(TraceContext::current(), Some(server_context));
                child.end();
            })
            .await;
        server.end();

        let spans = captured.spans();
        assert_eq!(spans.len(), 2);
        let child = &spans[0];
        assert_eq!(child.trace_id, server_context.trace_id());
        assert_eq!(child.parent_span_id, Some(server_context.span_id()));
    }

    #[test]
    fn server_span_continues_remote_trace() {
        let mut exporter = MockSpanExporter::new();
        exporter.expect_export().times(1).return_const(());
        let telemetry = Telemetry::new("svc", Arc::new(exporter));
        let remote: TraceContext = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"
            .parse()
            .expect("valid traceparent");

        let span = telemetry.start_server_span("request", Some(remote));
        assert_eq!(span.context().trace_id(), remote.trace_id());
        assert_ne!(span.context().span_id(), remote.span_id());
        span.end();
    }

    #[test]
    fn shutdown_flushes_once_and_discards_later_spans() {
        let mut exporter = MockSpanExporter::new();
        exporter.expect_shutdown().times(1).return_const(());
        exporter.expect_export().never();
        let telemetry = Telemetry::new("svc", Arc::new(exporter));

        let span = telemetry.start_span("late");
        telemetry.shutdown();
        telemetry.shutdown();
        span.end();
    }
}
