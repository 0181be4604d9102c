// src/lib.rs
// StudentHub - student, course and enrollment records
//
// Architecture:
// - Domain-centric: entities and invariants live in `domain`
// - Repositories are dumb SQLite mappers behind traits
// - Services orchestrate; grade notifications are synchronous observers
// - Application layer: HTTP boundary (axum)

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod repositories;
pub mod services;
pub mod telemetry;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod cli;
pub mod server;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use domain::{
    validate_course,
    validate_grade,
    validate_student,
    Course,
    Enrollment,
    GradeListener,
    ListenerHandle,
    Student,
    StudentKind,
};

pub use error::{AppError, AppResult};

pub use config::{AppConfig, DatabaseConfig, DatabaseLocation};

pub use db::{create_connection_pool, create_memory_pool, ConnectionPool};

pub use metrics::{OperationMetrics, OperationSnapshot};

pub use repositories::{
    CourseRepository,
    EnrollmentRepository,
    SqliteCourseRepository,
    SqliteEnrollmentRepository,
    SqliteStudentRepository,
    StudentRepository,
};

pub use services::{
    CourseService,
    EnrollRequest,
    EnrollmentService,
    GradeNotificationService,
    GradingService,
    LoggingGradeListener,
    SharedEnrollment,
    StudentService,
};

pub use application::{build_router, AppState};
