//! Error types for cardweb-api
//!
//! All failing endpoints answer with `{"error": message}` JSON and an
//! appropriate status code; callers surface the message as a toast or
//! inline modal text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cardweb_core::{CoreError, ErrorCode};
use cardweb_services::ServiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("{message}")]
    Upstream { message: String },

    #[error("Internal server error")]
    InternalError,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error.code() {
            ErrorCode::EntryNotFound | ErrorCode::FieldNotFound => ApiError::NotFound {
                resource: error.to_string(),
            },
            ErrorCode::DuplicateEntry | ErrorCode::ValidationError => ApiError::BadRequest {
                message: error.to_string(),
            },
            _ => ApiError::Upstream {
                message: error.to_string(),
            },
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        ApiError::Upstream {
            message: error.to_string(),
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let api: ApiError = CoreError::DuplicateEntry {
            entry: "Show A".to_string(),
        }
        .into();
        assert!(matches!(api, ApiError::BadRequest { .. }));

        let api: ApiError = CoreError::EntryNotFound {
            name: "x".to_string(),
        }
        .into();
        assert!(matches!(api, ApiError::NotFound { .. }));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest {
                message: "x".to_string()
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::InternalError.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
