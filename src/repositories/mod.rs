// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO event emission
// - Explicit SQL only
//
// The enrollment repository is the one exception to "no cross-repository
// calls": it resolves the student and course of each row it reads.

pub mod course_repository;
pub mod enrollment_repository;
mod search;
pub mod student_repository;

pub use course_repository::{CourseRepository, SqliteCourseRepository};
pub use enrollment_repository::{EnrollmentRepository, SqliteEnrollmentRepository};
pub use student_repository::{SqliteStudentRepository, StudentRepository};

#[cfg(test)]
pub use enrollment_repository::MockEnrollmentRepository;
