//! Span exporter writing finished spans to the structured log.

use tracing::{info, warn};

use crate::domain::ports::SpanExporter;
use crate::domain::{FinishedSpan, SpanStatus};

/// Log target carrying exported spans.
pub const SPAN_EXPORT_TARGET: &str = "span_export";

/// Exporter emitting each finished span as one `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSpanExporter;

impl SpanExporter for LogSpanExporter {
    fn export(&self, span: FinishedSpan) {
        let parent_span_id = span.parent_span_id.map(|id| id.to_string());
        let duration_us = u64::try_from(span.duration.as_micros()).unwrap_or(u64::MAX);
        match &span.status {
            SpanStatus::Ok => info!(
                target: SPAN_EXPORT_TARGET,
                service = %span.service,
                span = %span.name,
                trace_id = %span.trace_id,
                span_id = %span.span_id,
                parent_span_id = ?parent_span_id,
                duration_us,
                status = "ok"
            ),
            SpanStatus::Error { description, cause } => warn!(
                target: SPAN_EXPORT_TARGET,
                service = %span.service,
                span = %span.name,
                trace_id = %span.trace_id,
                span_id = %span.span_id,
                parent_span_id = ?parent_span_id,
                duration_us,
                status = "error",
                description = %description,
                cause = %cause
            ),
        }
    }

    fn shutdown(&self) {
        info!(target: SPAN_EXPORT_TARGET, "span exporter shut down");
    }
}
