pub mod entity;
pub mod invariants;
pub mod listener;

pub use entity::Enrollment;
pub use invariants::validate_grade;
pub use listener::{same_listener, GradeListener, ListenerHandle};
