// src/services/grade_notification_service.rs
//
// Grade Notification Service - listener registry for grade assignments
//
// DESIGN:
// - Three scopes: global, per student, per course
// - Registration order is delivery order; duplicates allowed
// - Lists are copy-on-write: writers swap in a new Arc'd Vec, readers clone
//   the current Arc and iterate without holding any lock
// - Attaching is a one-time snapshot; later registrations do not reach
//   enrollments that were already attached

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use crate::domain::{same_listener, Enrollment, GradeListener, ListenerHandle};

type ListenerList = Arc<Vec<ListenerHandle>>;

#[derive(Default)]
pub struct GradeNotificationService {
    global: RwLock<ListenerList>,
    by_student: RwLock<HashMap<String, ListenerList>>,
    by_course: RwLock<HashMap<String, ListenerList>>,
}

/// Registered listener totals per scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerCounts {
    pub global: usize,
    pub student_scoped: usize,
    pub course_scoped: usize,
}

impl GradeNotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_global(&self, listener: ListenerHandle) {
        let mut global = self.global.write().unwrap_or_else(PoisonError::into_inner);
        *global = appended(&global, listener);
    }

    pub fn unregister_global(&self, listener: &ListenerHandle) {
        let mut global = self.global.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(next) = without(&global, listener) {
            *global = next;
        }
    }

    pub fn register_for_student(&self, student_id: &str, listener: ListenerHandle) {
        register_scoped(&self.by_student, student_id, listener);
    }

    pub fn unregister_for_student(&self, student_id: &str, listener: &ListenerHandle) {
        unregister_scoped(&self.by_student, student_id, listener);
    }

    pub fn register_for_course(&self, course_id: &str, listener: ListenerHandle) {
        register_scoped(&self.by_course, course_id, listener);
    }

    pub fn unregister_for_course(&self, course_id: &str, listener: &ListenerHandle) {
        unregister_scoped(&self.by_course, course_id, listener);
    }

    /// Attach every matching listener to `enrollment`: global first, then the
    /// student's, then the course's, each in registration order.
    pub fn attach_to_enrollment(&self, enrollment: &mut Enrollment) {
        let global = Arc::clone(&self.global.read().unwrap_or_else(PoisonError::into_inner));
        let student = snapshot_scoped(&self.by_student, enrollment.student_id());
        let course = snapshot_scoped(&self.by_course, enrollment.course_id());

        let attached = global.len() + student.len() + course.len();

        for listener in global.iter().chain(student.iter()).chain(course.iter()) {
            enrollment.add_listener(Arc::clone(listener));
        }

        log::debug!(
            "Attached {} grade listener(s) to enrollment {}+{}",
            attached,
            enrollment.student_id(),
            enrollment.course_id()
        );
    }

    pub fn listener_counts(&self) -> ListenerCounts {
        let count_scoped = |scope: &RwLock<HashMap<String, ListenerList>>| -> usize {
            scope
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .values()
                .map(|list| list.len())
                .sum()
        };

        ListenerCounts {
            global: self.global.read().unwrap_or_else(PoisonError::into_inner).len(),
            student_scoped: count_scoped(&self.by_student),
            course_scoped: count_scoped(&self.by_course),
        }
    }
}

fn appended(current: &ListenerList, listener: ListenerHandle) -> ListenerList {
    let mut next = Vec::with_capacity(current.len() + 1);
    next.extend(current.iter().cloned());
    next.push(listener);
    Arc::new(next)
}

/// Copy of `current` minus the first occurrence of `listener`, or `None`
/// when it is not registered.
fn without(current: &ListenerList, listener: &ListenerHandle) -> Option<ListenerList> {
    let position = current.iter().position(|l| same_listener(l, listener))?;
    let mut next: Vec<ListenerHandle> = current.iter().cloned().collect();
    next.remove(position);
    Some(Arc::new(next))
}

fn register_scoped(
    scope: &RwLock<HashMap<String, ListenerList>>,
    key: &str,
    listener: ListenerHandle,
) {
    let mut map = scope.write().unwrap_or_else(PoisonError::into_inner);
    let next = match map.get(key) {
        Some(current) => appended(current, listener),
        None => Arc::new(vec![listener]),
    };
    map.insert(key.to_string(), next);
}

fn unregister_scoped(
    scope: &RwLock<HashMap<String, ListenerList>>,
    key: &str,
    listener: &ListenerHandle,
) {
    let mut map = scope.write().unwrap_or_else(PoisonError::into_inner);
    let Some(next) = map.get(key).and_then(|current| without(current, listener)) else {
        return;
    };

    if next.is_empty() {
        map.remove(key);
    } else {
        map.insert(key.to_string(), next);
    }
}

fn snapshot_scoped(scope: &RwLock<HashMap<String, ListenerList>>, key: &str) -> ListenerList {
    scope
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(key)
        .cloned()
        .unwrap_or_default()
}

/// Listener that writes every grade assignment to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingGradeListener;

impl GradeListener for LoggingGradeListener {
    fn on_grade_assigned(&self, enrollment: &Enrollment, grade: f64) {
        log::info!(
            "Grade assigned: student {} ({}) in course {} ({}) -> {}",
            enrollment.student().name,
            enrollment.student_id(),
            enrollment.course().name,
            enrollment.course_id(),
            grade
        );
    }
}
