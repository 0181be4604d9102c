// src/application/commands/enrollment_commands.rs
//
// Enrollment Command Handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;

use super::run_blocking;
use crate::application::dto::{
    CreateEnrollmentDto, EnrollmentDto, EnrollmentQuery, GradeUpdateDto,
};
use crate::application::state::AppState;
use crate::error::{AppError, AppResult};
use crate::services::EnrollRequest;

/// `?studentId=` takes precedence over `?courseId=`
pub async fn list_enrollments(
    State(state): State<AppState>,
    Query(query): Query<EnrollmentQuery>,
) -> AppResult<Json<Vec<EnrollmentDto>>> {
    let enrollments = run_blocking(move || {
        state
            .grading_service
            .list_enrollments(query.student_id.as_deref(), query.course_id.as_deref())
    })
    .await?;

    Ok(Json(enrollments.into_iter().map(EnrollmentDto::from).collect()))
}

pub async fn get_enrollment(
    State(state): State<AppState>,
    Path((student_id, course_id)): Path<(String, String)>,
) -> AppResult<Json<EnrollmentDto>> {
    let enrollment = run_blocking(move || {
        state.grading_service.get_enrollment(&student_id, &course_id)
    })
    .await?;

    Ok(Json(EnrollmentDto::from(enrollment)))
}

pub async fn create_enrollment(
    State(state): State<AppState>,
    payload: Result<Json<CreateEnrollmentDto>, JsonRejection>,
) -> AppResult<(StatusCode, Json<EnrollmentDto>)> {
    let Json(payload) = payload?;

    let (Some(student_id), Some(course_id)) = (payload.student_id, payload.course_id) else {
        return Err(AppError::Validation(
            "studentId and courseId required".to_string(),
        ));
    };

    let enrolled_on = payload
        .enrolled_on
        .as_deref()
        .map(|raw| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|e| AppError::Validation(format!("Invalid enrolledOn '{}': {}", raw, e)))
        })
        .transpose()?;

    let request = EnrollRequest {
        student_id,
        course_id,
        enrolled_on,
    };

    let enrollment = run_blocking(move || state.grading_service.enroll_by_ids(request)).await?;

    Ok((StatusCode::CREATED, Json(EnrollmentDto::from(enrollment))))
}

/// Set the grade; attached listeners are notified before it is stored
pub async fn update_grade(
    State(state): State<AppState>,
    Path((student_id, course_id)): Path<(String, String)>,
    payload: Result<Json<GradeUpdateDto>, JsonRejection>,
) -> AppResult<Json<EnrollmentDto>> {
    let Json(payload) = payload?;
    let grade = payload
        .grade
        .ok_or_else(|| AppError::Validation("grade is required".to_string()))?;

    let enrollment = run_blocking(move || {
        state
            .grading_service
            .assign_grade(&student_id, &course_id, grade)
    })
    .await?;

    Ok(Json(EnrollmentDto::from(enrollment)))
}

pub async fn delete_enrollment(
    State(state): State<AppState>,
    Path((student_id, course_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    run_blocking(move || {
        state
            .grading_service
            .remove_enrollment(&student_id, &course_id)
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
