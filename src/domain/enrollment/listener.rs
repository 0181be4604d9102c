use std::sync::Arc;

use super::entity::Enrollment;

/// Receives grade-assigned notifications for the enrollments it is attached to.
///
/// Delivery is synchronous on the thread calling [`Enrollment::set_grade`].
pub trait GradeListener: Send + Sync {
    fn on_grade_assigned(&self, enrollment: &Enrollment, grade: f64);
}

impl<F> GradeListener for F
where
    F: Fn(&Enrollment, f64) + Send + Sync,
{
    fn on_grade_assigned(&self, enrollment: &Enrollment, grade: f64) {
        self(enrollment, grade)
    }
}

/// Shared listener handle. Identity (for unregistering) is the allocation.
pub type ListenerHandle = Arc<dyn GradeListener>;

pub fn same_listener(a: &ListenerHandle, b: &ListenerHandle) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
