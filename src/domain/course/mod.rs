pub mod entity;
pub mod invariants;

pub use entity::Course;
pub use invariants::validate_course;
