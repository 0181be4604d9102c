// src/application/commands/health_commands.rs
//
// Liveness, record counts and repository timings

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::run_blocking;
use crate::application::dto::{HealthDto, MetricsDto};
use crate::application::error_handling::ErrorResponse;
use crate::application::state::AppState;
use crate::db::{get_connection, get_database_stats};
use crate::error::AppResult;

pub async fn health() -> Json<HealthDto> {
    Json(HealthDto { status: "ok" })
}

pub async fn metrics(State(state): State<AppState>) -> AppResult<Json<MetricsDto>> {
    let listeners = state.notifications.listener_counts();
    let operations = state.metrics.snapshot();
    let pool = state.pool.clone();

    let database = run_blocking(move || {
        let conn = get_connection(&pool)?;
        get_database_stats(&conn)
    })
    .await?;

    Ok(Json(MetricsDto {
        database,
        listeners,
        operations,
    }))
}

/// Any path or verb the router does not serve
pub async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method not allowed")),
    )
}
