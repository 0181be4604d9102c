use crate::domain::{DomainError, DomainResult};

/// A grade must be a finite number
pub fn validate_grade(grade: f64) -> DomainResult<()> {
    if !grade.is_finite() {
        return Err(DomainError::InvariantViolation(format!(
            "Grade must be a finite number, got {}",
            grade
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_nan_and_infinity() {
        assert!(validate_grade(88.5).is_ok());
        assert!(validate_grade(0.0).is_ok());
        assert!(validate_grade(f64::NAN).is_err());
        assert!(validate_grade(f64::INFINITY).is_err());
    }
}
