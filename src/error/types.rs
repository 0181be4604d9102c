// src/error/types.rs
use crate::domain::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    /// An enrollment row points at a student or course that no longer exists.
    #[error("Enrollment references missing student or course: {student_id}+{course_id}")]
    ReferentialIntegrity {
        student_id: String,
        course_id: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::NotFound(format!("{} {}", resource, id))
    }

    /// True for failures caused by the caller's input rather than the backing store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Domain(_) | AppError::Validation(_) | AppError::NotFound(_)
        )
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Validation(format!("Date parse error: {}", err))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
