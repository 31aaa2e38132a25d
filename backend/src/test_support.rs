//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled when running tests or
//! with the `test-support` feature.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{Resolver, SpanExporter};
use crate::domain::{FinishedSpan, SpanStatus};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Resolver returning the same canned outcome on every call.
///
/// # Examples
/// ```
/// use postal_climate::domain::ClimateReading;
/// use postal_climate::domain::ports::{Resolver, UpstreamError};
/// use postal_climate::test_support::StubResolver;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let stub = StubResolver::<ClimateReading, UpstreamError>::answering(Ok(ClimateReading {
///     celsius: 30.0,
///     ..ClimateReading::default()
/// }));
/// let reading = Resolver::<str, ClimateReading>::resolve(&stub, "Rio de Janeiro")
///     .await
///     .expect("canned reading");
/// assert_eq!(reading.celsius, 30.0);
/// assert_eq!(stub.inputs(), vec!["Rio de Janeiro".to_owned()]);
/// # });
/// ```
pub struct StubResolver<O, E> {
    outcome: Result<O, E>,
    calls: AtomicUsize,
    inputs: Mutex<Vec<String>>,
}

impl<O, E> StubResolver<O, E> {
    /// Build a stub that always answers `outcome`.
    pub fn answering(outcome: Result<O, E>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Number of times the stub was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Rendered inputs in call order.
    pub fn inputs(&self) -> Vec<String> {
        lock(&self.inputs).clone()
    }
}

#[async_trait]
impl<I, O, E> Resolver<I, O> for StubResolver<O, E>
where
    I: ?Sized + Sync + fmt::Display,
    O: Clone + Send + Sync,
    E: Clone + Send + Sync,
{
    type Error = E;

    async fn resolve(&self, input: &I) -> Result<O, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.inputs).push(input.to_string());
        self.outcome.clone()
    }
}

/// Span exporter keeping every finished span in memory.
#[derive(Default)]
pub struct RecordingSpanExporter {
    spans: Mutex<Vec<FinishedSpan>>,
    shutdowns: AtomicUsize,
}

impl RecordingSpanExporter {
    /// Snapshot of every exported span in close order.
    pub fn spans(&self) -> Vec<FinishedSpan> {
        lock(&self.spans).clone()
    }

    /// Exported spans named `name`.
    pub fn named(&self, name: &str) -> Vec<FinishedSpan> {
        lock(&self.spans)
            .iter()
            .filter(|span| span.name == name)
            .cloned()
            .collect()
    }

    /// Recorded cause of the first failed span named `name`.
    pub fn failure_cause(&self, name: &str) -> Option<String> {
        self.named(name).into_iter().find_map(|span| match span.status {
            SpanStatus::Error { cause, .. } => Some(cause),
            SpanStatus::Ok => None,
        })
    }

    /// Number of times the exporter was shut down.
    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

impl SpanExporter for RecordingSpanExporter {
    fn export(&self, span: FinishedSpan) {
        lock(&self.spans).push(span);
    }

    fn shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}
