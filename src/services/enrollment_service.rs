// src/services/enrollment_service.rs
//
// Enrollment Service - in-memory enrollment record
//
// Holds every enrollment created through it, shared with the caller so a
// grade set on the returned handle is visible in the record.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Local;

use super::GradeNotificationService;
use crate::domain::{Course, Enrollment, Student};

/// An enrollment shared between the record and its callers
pub type SharedEnrollment = Arc<Mutex<Enrollment>>;

#[derive(Default)]
pub struct EnrollmentService {
    enrollments: Mutex<Vec<SharedEnrollment>>,
    notifications: Option<Arc<GradeNotificationService>>,
}

impl EnrollmentService {
    /// A record with no notification wiring; grades still mirror into the student.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notifications(notifications: Arc<GradeNotificationService>) -> Self {
        Self {
            enrollments: Mutex::new(Vec::new()),
            notifications: Some(notifications),
        }
    }

    /// Enroll `student` in `course`, dated today.
    ///
    /// Listeners registered at this moment are attached before the handle is
    /// returned.
    pub fn enroll(&self, student: Student, course: Course) -> SharedEnrollment {
        let mut enrollment = Enrollment::new(student, course, Local::now().date_naive());

        if let Some(notifications) = &self.notifications {
            notifications.attach_to_enrollment(&mut enrollment);
        }

        log::info!(
            "Enrolled student {} in course {}",
            enrollment.student_id(),
            enrollment.course_id()
        );

        let shared = Arc::new(Mutex::new(enrollment));
        self.records().push(Arc::clone(&shared));
        shared
    }

    pub fn find_by_student_id(&self, student_id: &str) -> Vec<SharedEnrollment> {
        self.matching(|e| e.student_id() == student_id)
    }

    pub fn find_by_course_id(&self, course_id: &str) -> Vec<SharedEnrollment> {
        self.matching(|e| e.course_id() == course_id)
    }

    pub fn find(&self, student_id: &str, course_id: &str) -> Option<SharedEnrollment> {
        self.matching(|e| e.student_id() == student_id && e.course_id() == course_id)
            .into_iter()
            .next()
    }

    /// Every enrollment, in creation order
    pub fn all(&self) -> Vec<SharedEnrollment> {
        self.records().clone()
    }

    fn records(&self) -> std::sync::MutexGuard<'_, Vec<SharedEnrollment>> {
        self.enrollments.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn matching<P>(&self, predicate: P) -> Vec<SharedEnrollment>
    where
        P: Fn(&Enrollment) -> bool,
    {
        // Snapshot first so no enrollment lock is taken under the record lock.
        let snapshot = self.all();

        snapshot
            .into_iter()
            .filter(|shared| predicate(&*lock(shared)))
            .collect()
    }
}

/// Lock an enrollment, recovering it if a previous holder panicked
pub fn lock(shared: &SharedEnrollment) -> std::sync::MutexGuard<'_, Enrollment> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn student(id: &str) -> Student {
        Student::undergraduate(id, "Name", "n@x.org", NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
    }

    #[test]
    fn test_enroll_dates_today_and_records() {
        let service = EnrollmentService::new();
        let handle = service.enroll(student("S1"), Course::new("C1", "Intro", 3));

        assert_eq!(lock(&handle).enrolled_on(), Local::now().date_naive());
        assert_eq!(service.all().len(), 1);
    }

    #[test]
    fn test_grade_on_handle_is_visible_through_record() {
        let service = EnrollmentService::new();
        let handle = service.enroll(student("S1"), Course::new("C1", "Intro", 3));

        lock(&handle).set_grade(77.0);

        let found = service.find("S1", "C1").unwrap();
        assert_eq!(lock(&found).grade(), Some(77.0));
        assert_eq!(lock(&found).student().grade("C1"), Some(77.0));
    }

    #[test]
    fn test_lookups_filter_by_id() {
        let service = EnrollmentService::new();
        service.enroll(student("S1"), Course::new("C1", "A", 3));
        service.enroll(student("S1"), Course::new("C2", "B", 3));
        service.enroll(student("S2"), Course::new("C1", "A", 3));

        assert_eq!(service.find_by_student_id("S1").len(), 2);
        assert_eq!(service.find_by_course_id("C1").len(), 2);
        assert!(service.find("S2", "C2").is_none());
    }
}
