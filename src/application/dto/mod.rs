// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are the JSON shape of the API (camelCase field names)
// - Response DTOs convert FROM domain entities only
// - Request payloads keep every field optional; handlers decide defaults
//   and domain validation decides what is acceptable

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::db::DatabaseStats;
use crate::domain::{Course, Enrollment, Student};
use crate::metrics::OperationSnapshot;
use crate::services::ListenerCounts;

// ============================================================================
// STUDENT DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub date_of_birth: String,
    /// "undergraduate" or "graduate"
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thesis_title: Option<String>,
    pub grades: BTreeMap<String, f64>,
}

impl From<Student> for StudentDto {
    fn from(student: Student) -> Self {
        Self {
            level: if student.is_graduate() {
                "graduate".to_string()
            } else {
                "undergraduate".to_string()
            },
            thesis_title: student.thesis_title().map(str::to_string),
            grades: student.grades().clone(),
            date_of_birth: student.date_of_birth.to_string(),
            id: student.id,
            name: student.name,
            email: student.email,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    /// YYYY-MM-DD, defaults to today
    pub date_of_birth: Option<String>,
    #[serde(alias = "thesis_title")]
    pub thesis_title: Option<String>,
}

// ============================================================================
// COURSE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    pub id: String,
    pub name: String,
    pub credits: u32,
}

impl From<Course> for CourseDto {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            name: course.name,
            credits: course.credits,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePayload {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Defaults to 0
    pub credits: Option<u32>,
}

// ============================================================================
// ENROLLMENT DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDto {
    pub student: StudentDto,
    pub course: CourseDto,
    pub enrolled_on: String,
    pub grade: Option<f64>,
}

impl From<Enrollment> for EnrollmentDto {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            enrolled_on: enrollment.enrolled_on().to_string(),
            grade: enrollment.grade(),
            student: StudentDto::from(enrollment.student().clone()),
            course: CourseDto::from(enrollment.course().clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollmentDto {
    pub student_id: Option<String>,
    pub course_id: Option<String>,
    pub enrolled_on: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradeUpdateDto {
    pub grade: Option<f64>,
}

// ============================================================================
// QUERY PARAMETERS
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentQuery {
    pub student_id: Option<String>,
    pub course_id: Option<String>,
}

// ============================================================================
// SERVICE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDto {
    pub database: DatabaseStats,
    pub listeners: ListenerCounts,
    /// Call count and latency per repository operation, keyed `table.operation`
    pub operations: BTreeMap<String, OperationSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_student_dto_shape() {
        let dob = NaiveDate::from_ymd_opt(1998, 3, 4).unwrap();
        let mut student = Student::graduate("G1", "Grace", "g@x.org", dob, "Types");
        student.set_grade("C101", 90.0);

        let json = serde_json::to_value(StudentDto::from(student)).unwrap();
        assert_eq!(json["dateOfBirth"], "1998-03-04");
        assert_eq!(json["level"], "graduate");
        assert_eq!(json["thesisTitle"], "Types");
        assert_eq!(json["grades"]["C101"], 90.0);
    }

    #[test]
    fn test_student_payload_accepts_both_thesis_spellings() {
        let camel: StudentPayload =
            serde_json::from_str(r#"{"id":"G1","thesisTitle":"A"}"#).unwrap();
        let snake: StudentPayload =
            serde_json::from_str(r#"{"id":"G1","thesis_title":"B"}"#).unwrap();

        assert_eq!(camel.thesis_title.as_deref(), Some("A"));
        assert_eq!(snake.thesis_title.as_deref(), Some("B"));
    }

    #[test]
    fn test_course_payload_rejects_negative_credits() {
        let result: Result<CoursePayload, _> = serde_json::from_str(r#"{"credits":-1}"#);
        assert!(result.is_err());
    }
}
