//! W3C trace context carried across every hop of a request.
//!
//! `TraceContext` is a domain primitive identifying the current position in a
//! distributed trace: the trace it belongs to, the span that is currently
//! active, and whether the trace is sampled. It uses task-local storage so
//! outbound adapters can inject the active context without explicit parameter
//! threading.
//!
//! Tokio task-local variables are not inherited across spawned tasks. Use
//! [`TraceContext::scope`] when spawning new tasks or moving work onto blocking
//! threads to ensure the active context propagates correctly.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use rand::Rng;
use tokio::task_local;
use uuid::Uuid;

task_local! {
    /// Task-local storage for the active trace context.
    pub(crate) static TRACE_CONTEXT: TraceContext;
}

/// Header carrying the W3C trace context between services.
pub const TRACEPARENT_HEADER: &str = "traceparent";
/// Response header exposing the trace identifier to callers.
pub const TRACE_ID_HEADER: &str = "trace-id";

const SUPPORTED_VERSION: &str = "00";
const SAMPLED_FLAG: u8 = 0x01;

/// Errors raised while parsing a `traceparent` header.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraceContextError {
    /// The header does not have the `version-trace-span-flags` layout.
    #[error("traceparent is malformed: {0}")]
    Malformed(&'static str),
    /// The version is reserved or unsupported.
    #[error("traceparent version {0} is not supported")]
    UnsupportedVersion(String),
    /// The trace or span identifier is all zeroes.
    #[error("traceparent identifiers must not be zero")]
    ZeroIdentifier,
}

/// 128-bit trace identifier shared by every span of one request tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(u128);

impl TraceId {
    /// Generate a new random trace identifier.
    #[must_use]
    #[rustfmt::skip]
    pub fn generate() -> Self { Self(Uuid::new_v4().as_u128()) }

    /// Raw identifier value.
    pub fn as_u128(&self) -> u128 {
        self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// 64-bit span identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanId(u64);

impl SpanId {
    /// Generate a new random non-zero span identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(rand::thread_rng().gen_range(1..=u64::MAX))
    }

    /// Raw identifier value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Active position inside a distributed trace.
///
/// # Examples
/// ```
/// use postal_climate::domain::TraceContext;
///
/// let header = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";
/// let context: TraceContext = header.parse().expect("valid traceparent");
/// assert_eq!(context.to_string(), header);
/// assert!(context.is_sampled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceContext {
    trace_id: TraceId,
    span_id: SpanId,
    sampled: bool,
}

impl TraceContext {
    /// Start a new sampled root trace.
    #[must_use]
    pub fn new_root() -> Self {
        Self {
            trace_id: TraceId::generate(),
            span_id: SpanId::generate(),
            sampled: true,
        }
    }

    /// Derive a child context in the same trace with a fresh span identifier.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            trace_id: self.trace_id,
            span_id: SpanId::generate(),
            sampled: self.sampled,
        }
    }

    /// Trace this context belongs to.
    pub fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    /// Span that is currently active.
    pub fn span_id(&self) -> SpanId {
        self.span_id
    }

    /// Whether the trace is sampled.
    pub fn is_sampled(&self) -> bool {
        self.sampled
    }

    /// Returns the active context if one is in scope.
    #[must_use]
    #[rustfmt::skip]
    pub fn current() -> Option<Self> { TRACE_CONTEXT.try_with(|context| *context).ok() }

    /// Execute the provided future with `context` in scope.
    ///
    /// # Examples
    /// ```
    /// use postal_climate::domain::TraceContext;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let context = TraceContext::new_root();
    /// let observed = TraceContext::scope(context, async { TraceContext::current() }).await;
    /// assert_eq!(observed, Some(context));
    /// # });
    /// ```
    pub async fn scope<Fut>(context: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_CONTEXT.scope(context, fut).await
    }
}

impl fmt::Display for TraceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = if self.sampled { SAMPLED_FLAG } else { 0 };
        write!(
            f,
            "{SUPPORTED_VERSION}-{}-{}-{flags:02x}",
            self.trace_id, self.span_id
        )
    }
}

impl FromStr for TraceContext {
    type Err = TraceContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('-');
        let (Some(version), Some(trace_id), Some(span_id), Some(flags)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TraceContextError::Malformed("expected four fields"));
        };

        let version = parse_hex_field(version, 2, "version must be two hex digits")?;
        if version == "ff" {
            return Err(TraceContextError::UnsupportedVersion(version.to_owned()));
        }
        if version == SUPPORTED_VERSION && parts.next().is_some() {
            return Err(TraceContextError::Malformed("unexpected trailing fields"));
        }

        let trace_id = parse_hex_field(trace_id, 32, "trace id must be 32 hex digits")?;
        let span_id = parse_hex_field(span_id, 16, "span id must be 16 hex digits")?;
        let flags = parse_hex_field(flags, 2, "flags must be two hex digits")?;

        let trace_id = u128::from_str_radix(trace_id, 16)
            .map_err(|_| TraceContextError::Malformed("trace id is not hex"))?;
        let span_id = u64::from_str_radix(span_id, 16)
            .map_err(|_| TraceContextError::Malformed("span id is not hex"))?;
        let flags = u8::from_str_radix(flags, 16)
            .map_err(|_| TraceContextError::Malformed("flags are not hex"))?;
        if trace_id == 0 || span_id == 0 {
            return Err(TraceContextError::ZeroIdentifier);
        }

        Ok(Self {
            trace_id: TraceId(trace_id),
            span_id: SpanId(span_id),
            sampled: flags & SAMPLED_FLAG == SAMPLED_FLAG,
        })
    }
}

fn parse_hex_field<'a>(
    field: &'a str,
    len: usize,
    reason: &'static str,
) -> Result<&'a str, TraceContextError> {
    let lower_hex = field
        .bytes()
        .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte));
    if field.len() != len || !lower_hex {
        return Err(TraceContextError::Malformed(reason));
    }
    Ok(field)
}
