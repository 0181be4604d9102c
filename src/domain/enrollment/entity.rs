use chrono::NaiveDate;
use std::panic::{self, AssertUnwindSafe};

use super::listener::{same_listener, ListenerHandle};
use crate::domain::{Course, Student};

/// The association of one student with one course.
///
/// Identity is the `(student_id, course_id)` pair. The enrollment owns full
/// copies of its student and course; setting a grade mirrors it into the
/// student's grade map.
#[derive(Clone)]
pub struct Enrollment {
    student: Student,
    course: Course,
    enrolled_on: NaiveDate,
    grade: Option<f64>,
    listeners: Vec<ListenerHandle>,
}

impl Enrollment {
    pub fn new(student: Student, course: Course, enrolled_on: NaiveDate) -> Self {
        Self {
            student,
            course,
            enrolled_on,
            grade: None,
            listeners: Vec::new(),
        }
    }

    /// Rebuild an enrollment read back from storage.
    ///
    /// The stored grade is mirrored into the student's grade map. No listener
    /// is attached yet, so nothing is notified.
    pub fn restore(
        student: Student,
        course: Course,
        enrolled_on: NaiveDate,
        grade: Option<f64>,
    ) -> Self {
        let mut enrollment = Self::new(student, course, enrolled_on);
        if let Some(value) = grade {
            enrollment.set_grade(value);
        }
        enrollment
    }

    pub fn student(&self) -> &Student {
        &self.student
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn student_id(&self) -> &str {
        &self.student.id
    }

    pub fn course_id(&self) -> &str {
        &self.course.id
    }

    pub fn enrolled_on(&self) -> NaiveDate {
        self.enrolled_on
    }

    pub fn grade(&self) -> Option<f64> {
        self.grade
    }

    pub fn add_listener(&mut self, listener: ListenerHandle) {
        self.listeners.push(listener);
    }

    /// Detach the first occurrence of `listener`. Returns false if it was not attached.
    pub fn remove_listener(&mut self, listener: &ListenerHandle) -> bool {
        match self.listeners.iter().position(|l| same_listener(l, listener)) {
            Some(idx) => {
                self.listeners.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Assign (or reassign) the grade.
    ///
    /// Every attached listener is called in attachment order, then the grade
    /// is written into the student's grade map. A panicking listener is logged
    /// and skipped; the remaining listeners and the grade map update still run.
    pub fn set_grade(&mut self, grade: f64) {
        self.grade = Some(grade);

        for (idx, listener) in self.listeners.iter().enumerate() {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                listener.on_grade_assigned(self, grade);
            }));

            if let Err(payload) = result {
                log::error!(
                    "grade listener {} panicked for enrollment {}+{}: {}",
                    idx,
                    self.student.id,
                    self.course.id,
                    panic_message(payload.as_ref())
                );
            }
        }

        self.student.set_grade(self.course.id.clone(), grade);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

impl PartialEq for Enrollment {
    fn eq(&self, other: &Self) -> bool {
        self.student == other.student && self.course == other.course
    }
}

impl Eq for Enrollment {}

impl std::fmt::Debug for Enrollment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enrollment")
            .field("student_id", &self.student.id)
            .field("course_id", &self.course.id)
            .field("enrolled_on", &self.enrolled_on)
            .field("grade", &self.grade)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl std::fmt::Display for Enrollment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Enrollment[student={},course={},enrolledOn={},grade={}]",
            self.student.id,
            self.course.id,
            self.enrolled_on,
            self.grade.map_or_else(|| "null".to_string(), |g| g.to_string())
        )
    }
}
