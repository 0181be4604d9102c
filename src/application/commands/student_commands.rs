// src/application/commands/student_commands.rs
//
// Student Command Handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Local, NaiveDate};

use super::run_blocking;
use crate::application::dto::{SearchQuery, StudentDto, StudentPayload};
use crate::application::state::AppState;
use crate::domain::Student;
use crate::error::{AppError, AppResult};

/// List students, filtered by `?q=` when present
pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<StudentDto>>> {
    let students = run_blocking(move || {
        state.student_service.search_students(query.q.as_deref())
    })
    .await?;

    Ok(Json(students.into_iter().map(StudentDto::from).collect()))
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StudentDto>> {
    let student = run_blocking(move || state.student_service.get_student(&id)).await?;
    Ok(Json(StudentDto::from(student)))
}

pub async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<StudentPayload>, JsonRejection>,
) -> AppResult<(StatusCode, Json<StudentDto>)> {
    let Json(payload) = payload?;
    let student = student_from_payload(payload, None)?;

    let stored = run_blocking(move || state.student_service.save_student(student)).await?;

    Ok((StatusCode::CREATED, Json(StudentDto::from(stored))))
}

/// Replace a student; the id in the path wins over any id in the body
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StudentPayload>, JsonRejection>,
) -> AppResult<Json<StudentDto>> {
    let Json(payload) = payload?;
    let student = student_from_payload(payload, Some(&id))?;

    let stored =
        run_blocking(move || state.student_service.update_student(&id, student)).await?;

    Ok(Json(StudentDto::from(stored)))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    run_blocking(move || state.student_service.delete_student(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn student_from_payload(payload: StudentPayload, path_id: Option<&str>) -> AppResult<Student> {
    let date_of_birth = match payload.date_of_birth.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|e| AppError::Validation(format!("Invalid dateOfBirth '{}': {}", raw, e)))?,
        _ => Local::now().date_naive(),
    };

    let id = match path_id {
        Some(id) => id.to_string(),
        None => payload.id.unwrap_or_default(),
    };

    Ok(Student::create(
        id,
        payload.name.unwrap_or_default(),
        payload.email.unwrap_or_default(),
        date_of_birth,
        payload.thesis_title,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_date_defaults_to_today() {
        let student = student_from_payload(
            StudentPayload {
                id: Some("S1".into()),
                ..Default::default()
            },
            None,
        )
        .unwrap();
        assert_eq!(student.date_of_birth, Local::now().date_naive());
        assert!(!student.is_graduate());
    }

    #[test]
    fn test_bad_date_is_validation_error() {
        let result = student_from_payload(
            StudentPayload {
                date_of_birth: Some("2000-13-40".into()),
                ..Default::default()
            },
            None,
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_path_id_overrides_body() {
        let student = student_from_payload(
            StudentPayload {
                id: Some("OTHER".into()),
                thesis_title: Some("Proofs".into()),
                ..Default::default()
            },
            Some("S1"),
        )
        .unwrap();
        assert_eq!(student.id, "S1");
        assert_eq!(student.thesis_title(), Some("Proofs"));
    }
}
