use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse};
use thiserror::Error;

use crate::core::{BindError, ValidationFailure, WorkflowError};
use crate::models::ApiResponse;
use crate::services::StoreError;

/// Message sent for every 404
pub const NOT_FOUND: &str = "NOT_FOUND";

const INTERNAL: &str = "internal server error";

/// Errors surfaced by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Bind(#[from] BindError),

    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    #[error("{0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    /// Detail is logged, never sent to the client
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal(err: impl std::fmt::Display) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            other => ApiError::internal(other),
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Validation(failure) => ApiError::Validation(failure),
            // An absent recruiter is logged with its id and answered as a server error
            other => ApiError::internal(other),
        }
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Bind(_) | ApiError::Validation(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::NotFound => NOT_FOUND.to_string(),
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                INTERNAL.to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ApiResponse::error(message))
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::BadRequest("failed to decode json".to_string()).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    ApiError::BadRequest(format!("Invalid query: {}", err)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_store_errors_map_to_status() {
        let not_found: ApiError = StoreError::NotFound("x".to_string()).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let conflict: ApiError = StoreError::Conflict("dup".to_string()).into();
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);

        let internal: ApiError = StoreError::Poisoned.into();
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_absent_recruiter_on_submit_is_internal() {
        let id = uuid::Uuid::new_v4();
        let err: ApiError = WorkflowError::RecruiterNotFound(id).into();

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn test_bind_error_is_bad_request() {
        let err: ApiError = BindError::MissingParameter("search".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing query param: search");
    }
}
