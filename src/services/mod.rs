// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod course_service;
pub mod enrollment_service;
pub mod grade_notification_service;
pub mod grading_service;
pub mod student_service;


pub use course_service::CourseService;

pub use enrollment_service::{EnrollmentService, SharedEnrollment};

pub use grade_notification_service::{
    GradeNotificationService,
    ListenerCounts,
    LoggingGradeListener,
};

pub use grading_service::{EnrollRequest, GradingService};

pub use student_service::StudentService;
