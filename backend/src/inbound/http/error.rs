//! HTTP mapping for domain errors.
//!
//! Status policy:
//! - `invalid_request`, `state_conflict`, `unknown_state` → 400
//! - `not_found` → 404
//! - `access_denied` → 404 with a `not_found` body, so an ownership breach
//!   never confirms that the resource exists
//! - `service_unavailable` → 503
//! - `internal_error` → 500 with the message and details redacted

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::StateConflict | ErrorCode::UnknownState => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::NotFound | ErrorCode::AccessDenied => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn keep_trace(source: &Error, target: Error) -> Error {
    match source.trace_id() {
        Some(id) => target.with_trace_id(id.to_owned()),
        None => target,
    }
}

/// Body actually sent to the client.
fn public_body(error: &Error) -> Error {
    match error.code() {
        ErrorCode::InternalError => keep_trace(error, Error::internal("Internal server error")),
        ErrorCode::AccessDenied => {
            debug!(message = error.message(), "access denial reported as not found");
            keep_trace(error, Error::not_found("resource not found"))
        }
        _ => error.clone(),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(public_body(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}
