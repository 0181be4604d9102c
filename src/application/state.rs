// src/application/state.rs

use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::error::AppResult;
use crate::metrics::OperationMetrics;
use crate::repositories::{
    CourseRepository, EnrollmentRepository, SqliteCourseRepository, SqliteEnrollmentRepository,
    SqliteStudentRepository, StudentRepository,
};
use crate::services::{CourseService, GradeNotificationService, GradingService, StudentService};

/// Shared state handed to every request handler.
/// All fields are Arc-wrapped; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<ConnectionPool>,
    pub metrics: Arc<OperationMetrics>,
    pub notifications: Arc<GradeNotificationService>,
    pub student_service: Arc<StudentService>,
    pub course_service: Arc<CourseService>,
    pub grading_service: Arc<GradingService>,
}

impl AppState {
    /// Wire repositories and services over `pool` and create the schema.
    pub fn initialize(
        pool: Arc<ConnectionPool>,
        notifications: Arc<GradeNotificationService>,
    ) -> AppResult<Self> {
        let metrics = Arc::new(OperationMetrics::new());

        let student_repo: Arc<dyn StudentRepository> = Arc::new(
            SqliteStudentRepository::new(pool.clone()).with_metrics(metrics.clone()),
        );
        let course_repo: Arc<dyn CourseRepository> = Arc::new(
            SqliteCourseRepository::new(pool.clone()).with_metrics(metrics.clone()),
        );
        let enrollment_repo: Arc<dyn EnrollmentRepository> = Arc::new(
            SqliteEnrollmentRepository::new(pool.clone(), student_repo.clone(), course_repo.clone())
                .with_metrics(metrics.clone()),
        );

        enrollment_repo.init()?;

        Ok(Self {
            student_service: Arc::new(StudentService::new(student_repo.clone())),
            course_service: Arc::new(CourseService::new(course_repo.clone())),
            grading_service: Arc::new(GradingService::new(
                student_repo,
                course_repo,
                enrollment_repo,
                notifications.clone(),
            )),
            notifications,
            metrics,
            pool,
        })
    }
}
