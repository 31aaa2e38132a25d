//! Classified error taxonomy shared by both services.
//!
//! These errors are transport agnostic. Inbound adapters map each variant to
//! a fixed HTTP status; the underlying cause never reaches a response body and
//! is only attached to trace spans and log lines.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

/// Free-form observability tags attached to a classified error.
pub type ErrorTags = BTreeMap<String, String>;

/// Stable machine-readable error kind describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The input is malformed and never reached the network.
    Validation,
    /// An upstream confirmed the resource does not exist.
    NotFound,
    /// Any other upstream, transport, or decode failure.
    Unknown,
}

/// Closed tagged union over every failure a pipeline can produce.
///
/// ## Invariants
/// - Every failure path produces exactly one variant.
/// - `message` is the user-facing text; `cause` is the rendered underlying
///   error and is never exposed to callers.
///
/// # Examples
/// ```
/// use postal_climate::domain::{ClassifiedError, ErrorKind};
///
/// let err = ClassifiedError::not_found("can not find postal code", "status 404")
///     .with_tag("postal_code", "22021001");
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert_eq!(err.to_string(), "can not find postal code");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifiedError {
    /// Malformed input rejected before any network call.
    #[error("{message}")]
    Validation {
        /// User-facing message.
        message: String,
        /// Rendered underlying cause.
        cause: String,
        /// Why validation failed.
        reasons: Vec<String>,
        /// Observability tags.
        tags: ErrorTags,
    },
    /// The upstream resource does not exist.
    #[error("{message}")]
    NotFound {
        /// User-facing message.
        message: String,
        /// Rendered underlying cause.
        cause: String,
        /// Observability tags.
        tags: ErrorTags,
    },
    /// Any other failure.
    #[error("{message}")]
    Unknown {
        /// User-facing message.
        message: String,
        /// Rendered underlying cause.
        cause: String,
        /// Observability tags.
        tags: ErrorTags,
    },
}

impl ClassifiedError {
    /// Construct a [`ClassifiedError::Validation`] with a single reason.
    pub fn validation(
        message: impl Into<String>,
        cause: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            cause: cause.into(),
            reasons: vec![reason.into()],
            tags: ErrorTags::new(),
        }
    }

    /// Construct a [`ClassifiedError::NotFound`].
    pub fn not_found(message: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            cause: cause.into(),
            tags: ErrorTags::new(),
        }
    }

    /// Construct a [`ClassifiedError::Unknown`].
    pub fn unknown(message: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
            cause: cause.into(),
            tags: ErrorTags::new(),
        }
    }

    /// Attach an observability tag.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags_mut().insert(key.into(), value.into());
        self
    }

    /// Reclassify as [`ClassifiedError::Unknown`], keeping cause and tags.
    #[must_use]
    pub fn into_unknown(self, message: impl Into<String>) -> Self {
        match self {
            Self::Validation { cause, tags, .. }
            | Self::NotFound { cause, tags, .. }
            | Self::Unknown { cause, tags, .. } => Self::Unknown {
                message: message.into(),
                cause,
                tags,
            },
        }
    }

    /// Failure category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// User-facing message.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::NotFound { message, .. }
            | Self::Unknown { message, .. } => message,
        }
    }

    /// Rendered underlying cause, for spans and logs only.
    pub fn cause(&self) -> &str {
        match self {
            Self::Validation { cause, .. }
            | Self::NotFound { cause, .. }
            | Self::Unknown { cause, .. } => cause,
        }
    }

    /// Observability tags.
    pub fn tags(&self) -> &ErrorTags {
        match self {
            Self::Validation { tags, .. }
            | Self::NotFound { tags, .. }
            | Self::Unknown { tags, .. } => tags,
        }
    }

    fn tags_mut(&mut self) -> &mut ErrorTags {
        match self {
            Self::Validation { tags, .. }
            | Self::NotFound { tags, .. }
            | Self::Unknown { tags, .. } => tags,
        }
    }
}

#[cfg(test)]
mod tests;
