// src/application/commands/mod.rs
//
// HTTP handlers
//
// RULES:
// - Accept DTOs
// - Call services on the blocking pool
// - Return DTOs
// - Never contain business logic

pub mod course_commands;
pub mod enrollment_commands;
pub mod health_commands;
pub mod student_commands;

use crate::error::{AppError, AppResult};

/// Run a blocking service call off the async runtime
pub(crate) async fn run_blocking<T, F>(job: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| AppError::Other(format!("Blocking task failed: {}", e)))?
}
