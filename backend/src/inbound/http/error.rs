//! HTTP adapter mapping for classified errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn pipeline failures into consistent JSON responses and status
//! codes. Only the user-facing message reaches the body; the cause goes to the
//! log line.

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::domain::{
    ClassifiedError, ErrorKind, INVALID_POSTAL_CODE, TRACE_ID_HEADER, TraceContext,
};

/// Message returned when a request body is not valid JSON.
pub const INVALID_REQUEST_BODY: &str = "invalid request body";

/// Error payload returned by both services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// User-facing explanation.
    #[schema(example = "can not find postal code")]
    pub message: String,
}

impl ErrorBody {
    /// Build a body carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ClassifiedError>;

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for ClassifiedError {
    fn status_code(&self) -> StatusCode {
        status_for(self.kind())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(
                kind = ?self.kind(),
                message = %self.message(),
                cause = %self.cause(),
                tags = ?self.tags(),
                "request failed"
            );
        } else {
            info!(
                kind = ?self.kind(),
                message = %self.message(),
                cause = %self.cause(),
                tags = ?self.tags(),
                "request rejected"
            );
        }

        let mut builder = HttpResponse::build(status);
        if let Some(context) = TraceContext::current() {
            builder.insert_header((TRACE_ID_HEADER, context.trace_id().to_string()));
        }
        builder.json(ErrorBody::new(self.message()))
    }
}

/// `JsonConfig` error handler answering `400 {"message": "invalid request body"}`.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    info!(error = %err, "rejecting malformed request body");
    let response = HttpResponse::BadRequest().json(ErrorBody::new(INVALID_REQUEST_BODY));
    InternalError::from_response(err, response).into()
}

/// `QueryConfig` error handler treating an undecodable query string as an
/// invalid postal code (`422`).
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ClassifiedError::validation(
        INVALID_POSTAL_CODE,
        err.to_string(),
        "query string must carry a single postal_code",
    )
    .into()
}
