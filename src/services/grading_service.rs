// src/services/grading_service.rs
//
// Grading Service - enrollment workflow over stored records
//
// RULES:
// - Both referenced records must exist before an enrollment is written
// - A grade update notifies listeners before the new grade is persisted

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use super::GradeNotificationService;
use crate::domain::{validate_grade, Course, Enrollment, Student};
use crate::error::{AppError, AppResult};
use crate::repositories::{CourseRepository, EnrollmentRepository, StudentRepository};

#[derive(Debug, Clone)]
pub struct EnrollRequest {
    pub student_id: String,
    pub course_id: String,
    /// Defaults to today
    pub enrolled_on: Option<NaiveDate>,
}

pub struct GradingService {
    student_repo: Arc<dyn StudentRepository>,
    course_repo: Arc<dyn CourseRepository>,
    enrollment_repo: Arc<dyn EnrollmentRepository>,
    notifications: Arc<GradeNotificationService>,
}

impl GradingService {
    pub fn new(
        student_repo: Arc<dyn StudentRepository>,
        course_repo: Arc<dyn CourseRepository>,
        enrollment_repo: Arc<dyn EnrollmentRepository>,
        notifications: Arc<GradeNotificationService>,
    ) -> Self {
        Self {
            student_repo,
            course_repo,
            enrollment_repo,
            notifications,
        }
    }

    /// Enroll a stored student in a stored course.
    ///
    /// Nothing is written unless both exist. Re-enrolling replaces the
    /// existing enrollment, grade included.
    pub fn enroll_by_ids(&self, request: EnrollRequest) -> AppResult<Enrollment> {
        if request.student_id.trim().is_empty() || request.course_id.trim().is_empty() {
            return Err(AppError::Validation(
                "studentId and courseId required".to_string(),
            ));
        }

        let (student, course) = self.resolve(&request.student_id, &request.course_id)?;
        let enrolled_on = request
            .enrolled_on
            .unwrap_or_else(|| Local::now().date_naive());

        let enrollment = self
            .enrollment_repo
            .add(&Enrollment::new(student, course, enrolled_on))?;

        log::info!(
            "Enrolled student {} in course {} on {}",
            enrollment.student_id(),
            enrollment.course_id(),
            enrollment.enrolled_on()
        );

        Ok(enrollment)
    }

    /// Set the grade of a stored enrollment.
    ///
    /// Listeners matching the enrollment are attached and notified, then the
    /// enrollment is written back.
    pub fn assign_grade(
        &self,
        student_id: &str,
        course_id: &str,
        grade: f64,
    ) -> AppResult<Enrollment> {
        validate_grade(grade).map_err(AppError::Domain)?;
        self.resolve(student_id, course_id)?;

        let mut enrollment = self.get_enrollment(student_id, course_id)?;

        self.notifications.attach_to_enrollment(&mut enrollment);
        enrollment.set_grade(grade);

        self.enrollment_repo.add(&enrollment)
    }

    pub fn get_enrollment(&self, student_id: &str, course_id: &str) -> AppResult<Enrollment> {
        self.enrollment_repo
            .find(student_id, course_id)?
            .ok_or_else(|| enrollment_not_found(student_id, course_id))
    }

    /// Filtered listing; a student filter takes precedence over a course filter.
    pub fn list_enrollments(
        &self,
        student_id: Option<&str>,
        course_id: Option<&str>,
    ) -> AppResult<Vec<Enrollment>> {
        match (student_id, course_id) {
            (Some(sid), _) => self.enrollment_repo.find_by_student_id(sid),
            (None, Some(cid)) => self.enrollment_repo.find_by_course_id(cid),
            (None, None) => self.enrollment_repo.find_all(),
        }
    }

    pub fn remove_enrollment(&self, student_id: &str, course_id: &str) -> AppResult<()> {
        if !self.enrollment_repo.remove(student_id, course_id)? {
            return Err(enrollment_not_found(student_id, course_id));
        }
        Ok(())
    }

    fn resolve(&self, student_id: &str, course_id: &str) -> AppResult<(Student, Course)> {
        let student = self
            .student_repo
            .find_by_id(student_id)?
            .ok_or_else(|| AppError::not_found("Student", student_id))?;
        let course = self
            .course_repo
            .find_by_id(course_id)?
            .ok_or_else(|| AppError::not_found("Course", course_id))?;
        Ok((student, course))
    }
}

fn enrollment_not_found(student_id: &str, course_id: &str) -> AppError {
    AppError::not_found("Enrollment", &format!("{}+{}", student_id, course_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::repositories::{
        MockEnrollmentRepository, SqliteCourseRepository, SqliteStudentRepository,
    };

    fn stores() -> (Arc<SqliteStudentRepository>, Arc<SqliteCourseRepository>) {
        let pool = Arc::new(create_memory_pool().unwrap());
        let students = Arc::new(SqliteStudentRepository::new(pool.clone()));
        let courses = Arc::new(SqliteCourseRepository::new(pool));
        students.init().unwrap();
        courses.init().unwrap();
        (students, courses)
    }

    fn service(
        students: Arc<SqliteStudentRepository>,
        courses: Arc<SqliteCourseRepository>,
        enrollments: MockEnrollmentRepository,
    ) -> GradingService {
        GradingService::new(
            students,
            courses,
            Arc::new(enrollments),
            Arc::new(GradeNotificationService::new()),
        )
    }

    #[test]
    fn test_missing_student_writes_nothing() {
        let (students, courses) = stores();
        courses.upsert(&Course::new("C101", "Intro", 4)).unwrap();

        let mut enrollments = MockEnrollmentRepository::new();
        enrollments.expect_add().never();

        let result = service(students, courses, enrollments).enroll_by_ids(EnrollRequest {
            student_id: "S404".to_string(),
            course_id: "C101".to_string(),
            enrolled_on: None,
        });

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_blank_ids_are_rejected() {
        let (students, courses) = stores();
        let mut enrollments = MockEnrollmentRepository::new();
        enrollments.expect_add().never();

        let result = service(students, courses, enrollments).enroll_by_ids(EnrollRequest {
            student_id: " ".to_string(),
            course_id: "C101".to_string(),
            enrolled_on: None,
        });

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_non_finite_grade_is_rejected_before_lookup() {
        let (students, courses) = stores();
        let mut enrollments = MockEnrollmentRepository::new();
        enrollments.expect_find().never();
        enrollments.expect_add().never();

        let result = service(students, courses, enrollments).assign_grade("S1", "C1", f64::NAN);

        assert!(matches!(result, Err(AppError::Domain(_))));
    }

    #[test]
    fn test_assign_grade_persists_updated_enrollment() {
        let (students, courses) = stores();
        let dob = NaiveDate::from_ymd_opt(2000, 1, 15).unwrap();
        let student = Student::undergraduate("S001", "Alice", "alice@uni.edu", dob);
        let course = Course::new("C101", "Intro", 4);
        students.upsert(&student).unwrap();
        courses.upsert(&course).unwrap();

        let stored = Enrollment::new(student, course, dob);
        let mut enrollments = MockEnrollmentRepository::new();
        enrollments
            .expect_find()
            .times(1)
            .returning(move |_, _| Ok(Some(stored.clone())));
        enrollments
            .expect_add()
            .times(1)
            .withf(|e: &Enrollment| e.grade() == Some(88.5))
            .returning(|e| Ok(e.clone()));

        let updated = service(students, courses, enrollments)
            .assign_grade("S001", "C101", 88.5)
            .unwrap();

        assert_eq!(updated.student().grade("C101"), Some(88.5));
    }
}
