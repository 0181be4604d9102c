// src/application/error_handling.rs
//
// Error Handling for HTTP handlers
//
// ARCHITECTURE:
// - Maps AppError -> status code + JSON body
// - Client errors are logged at warn, everything else at error

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

pub fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Validation(_) | AppError::Domain(_) => StatusCode::BAD_REQUEST,
        AppError::Database(_)
        | AppError::Pool(_)
        | AppError::ReferentialIntegrity { .. }
        | AppError::Serialization(_)
        | AppError::Io(_)
        | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self);

        if self.is_client_error() {
            log::warn!("Request rejected ({}): {}", status, self);
        } else {
            log::error!("Request failed ({}): {}", status, self);
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&AppError::not_found("Student", "S1")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&AppError::Validation("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AppError::Domain(DomainError::InvariantViolation("x".into()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AppError::ReferentialIntegrity {
                student_id: "S1".into(),
                course_id: "C1".into(),
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_serialization() {
        let body = ErrorResponse::new("Resource not found: Student S1");
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"error":"Resource not found: Student S1"}"#);
    }
}
