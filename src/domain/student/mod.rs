pub mod entity;
pub mod invariants;

pub use entity::{Student, StudentKind};
pub use invariants::{is_valid_email, validate_student};
