use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

/// Failure kinds surfaced by the job store and service.
///
/// The store produces `NotFound` and `BadRequest`, the service adds `Conflict`
/// for status-gated operations. Each kind maps onto one HTTP status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl JobError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        JobError::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        JobError::BadRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        JobError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        JobError::Internal(msg.into())
    }

    pub fn message(&self) -> &str {
        match self {
            JobError::NotFound(msg)
            | JobError::BadRequest(msg)
            | JobError::Conflict(msg)
            | JobError::Internal(msg) => msg,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            JobError::NotFound(_) => "not_found",
            JobError::BadRequest(_) => "bad_request",
            JobError::Conflict(_) => "conflict",
            JobError::Internal(_) => "internal_server_error",
        }
    }
}

/// JSON payload returned to HTTP clients for any `JobError`.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    status: u16,
    error: &'a str,
}

impl ResponseError for JobError {
    fn status_code(&self) -> StatusCode {
        match self {
            JobError::NotFound(_) => StatusCode::NOT_FOUND,
            JobError::BadRequest(_) => StatusCode::BAD_REQUEST,
            JobError::Conflict(_) => StatusCode::CONFLICT,
            JobError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorBody {
            message: self.message(),
            status: status.as_u16(),
            error: self.kind(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        let err = JobError::conflict("Cannot delete job in status running");
        assert_eq!(err.to_string(), "Cannot delete job in status running");
    }

    #[test]
    fn kinds_map_to_status_codes() {
        assert_eq!(JobError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(JobError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(JobError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            JobError::internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
