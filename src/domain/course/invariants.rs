use super::entity::Course;
use crate::domain::student::invariants::require_text;
use crate::domain::DomainResult;

/// Validates all Course invariants. Credits are unsigned, so only text
/// fields need checking.
pub fn validate_course(course: &Course) -> DomainResult<()> {
    require_text("Course id", &course.id)?;
    require_text("Course name", &course.name)?;
    Ok(())
}
