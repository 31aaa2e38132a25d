//! Driven port receiving finished trace spans.

use crate::domain::FinishedSpan;

/// Sink for finished spans.
///
/// Export failures are the exporter's own concern and never reach the
/// request that produced the span.
#[cfg_attr(test, mockall::automock)]
pub trait SpanExporter: Send + Sync {
    /// Hand over one finished span.
    fn export(&self, span: FinishedSpan);

    /// Flush and release the exporter. Called once at process shutdown.
    fn shutdown(&self) {}
}
