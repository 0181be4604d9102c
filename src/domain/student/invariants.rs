use super::entity::Student;
use crate::domain::{DomainError, DomainResult};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

/// Validates the rules a Student must satisfy before it is written
pub fn validate_student(student: &Student) -> DomainResult<()> {
    require_text("Student id", &student.id)?;
    require_text("Student name", &student.name)?;
    if !is_valid_email(&student.email) {
        return Err(DomainError::InvariantViolation(format!(
            "Invalid email address '{}'",
            student.email
        )));
    }
    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub(crate) fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::InvariantViolation(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn student(id: &str, name: &str, email: &str) -> Student {
        Student::undergraduate(id, name, email, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
    }

    #[test]
    fn accepts_well_formed_student() {
        assert!(validate_student(&student("S001", "Alice", "alice@example.com")).is_ok());
    }

    #[test]
    fn rejects_blank_id_and_name() {
        assert!(validate_student(&student("  ", "Alice", "alice@example.com")).is_err());
        assert!(validate_student(&student("S001", "", "alice@example.com")).is_err());
    }

    #[test]
    fn email_format() {
        assert!(is_valid_email("a.b@uni.edu"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@localhost"));
        assert!(!is_valid_email("al ice@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
    }
}
