// src/application/commands/course_commands.rs
//
// Course Command Handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::run_blocking;
use crate::application::dto::{CourseDto, CoursePayload, SearchQuery};
use crate::application::state::AppState;
use crate::domain::Course;
use crate::error::AppResult;

pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<CourseDto>>> {
    let courses =
        run_blocking(move || state.course_service.search_courses(query.q.as_deref())).await?;

    Ok(Json(courses.into_iter().map(CourseDto::from).collect()))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CourseDto>> {
    let course = run_blocking(move || state.course_service.get_course(&id)).await?;
    Ok(Json(CourseDto::from(course)))
}

pub async fn create_course(
    State(state): State<AppState>,
    payload: Result<Json<CoursePayload>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CourseDto>)> {
    let Json(payload) = payload?;
    let course = Course::new(
        payload.id.unwrap_or_default(),
        payload.name.unwrap_or_default(),
        payload.credits.unwrap_or(0),
    );

    let stored = run_blocking(move || state.course_service.save_course(course)).await?;

    Ok((StatusCode::CREATED, Json(CourseDto::from(stored))))
}

pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CoursePayload>, JsonRejection>,
) -> AppResult<Json<CourseDto>> {
    let Json(payload) = payload?;
    let course = Course::new(
        id.clone(),
        payload.name.unwrap_or_default(),
        payload.credits.unwrap_or(0),
    );

    let stored = run_blocking(move || state.course_service.update_course(&id, course)).await?;

    Ok(Json(CourseDto::from(stored)))
}

pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    run_blocking(move || state.course_service.delete_course(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
