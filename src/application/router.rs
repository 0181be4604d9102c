// src/application/router.rs
//
// Route table for the HTTP API

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use super::commands::{course_commands, enrollment_commands, health_commands, student_commands};
use super::state::AppState;

/// Build the complete router.
///
/// - `GET /health`, `GET /metrics`
/// - `/students`, `/students/{id}`
/// - `/courses`, `/courses/{id}`
/// - `/enrollments`, `/enrollments/{student_id}/{course_id}`
///
/// Unknown paths answer 405, as do unsupported verbs on known paths.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_commands::health))
        .route("/metrics", get(health_commands::metrics))
        .route(
            "/students",
            get(student_commands::list_students).post(student_commands::create_student),
        )
        .route(
            "/students/{id}",
            get(student_commands::get_student)
                .put(student_commands::update_student)
                .delete(student_commands::delete_student),
        )
        .route(
            "/courses",
            get(course_commands::list_courses).post(course_commands::create_course),
        )
        .route(
            "/courses/{id}",
            get(course_commands::get_course)
                .put(course_commands::update_course)
                .delete(course_commands::delete_course),
        )
        .route(
            "/enrollments",
            get(enrollment_commands::list_enrollments)
                .post(enrollment_commands::create_enrollment),
        )
        .route(
            "/enrollments/{student_id}/{course_id}",
            get(enrollment_commands::get_enrollment)
                .put(enrollment_commands::update_grade)
                .delete(enrollment_commands::delete_enrollment),
        )
        .fallback(health_commands::method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
