// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file declares all domain modules and re-exports their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod course;
pub mod enrollment;
pub mod student;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Student Domain
pub use student::{is_valid_email, validate_student, Student, StudentKind};

// Course Domain
pub use course::{validate_course, Course};

// Enrollment Domain
pub use enrollment::{
    same_listener, validate_grade, Enrollment, GradeListener, ListenerHandle,
};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
