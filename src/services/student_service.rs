// src/services/student_service.rs
use std::sync::Arc;

use crate::domain::{validate_student, Student};
use crate::error::{AppError, AppResult};
use crate::repositories::StudentRepository;

pub struct StudentService {
    student_repo: Arc<dyn StudentRepository>,
}

impl StudentService {
    pub fn new(student_repo: Arc<dyn StudentRepository>) -> Self {
        Self { student_repo }
    }

    /// Validate and store. An existing student with the same id is replaced.
    pub fn save_student(&self, student: Student) -> AppResult<Student> {
        validate_student(&student).map_err(AppError::Domain)?;
        let stored = self.student_repo.upsert(&student)?;
        log::info!("Saved student {}", stored.id);
        Ok(stored)
    }

    /// Replace the student stored under `id` and return it as now stored.
    pub fn update_student(&self, id: &str, updated: Student) -> AppResult<Student> {
        validate_student(&updated).map_err(AppError::Domain)?;

        if !self.student_repo.update(id, &updated)? {
            return Err(AppError::not_found("Student", id));
        }

        self.get_student(id)
    }

    pub fn get_student(&self, id: &str) -> AppResult<Student> {
        self.student_repo
            .find_by_id(id)?
            .ok_or_else(|| AppError::not_found("Student", id))
    }

    pub fn search_students(&self, query: Option<&str>) -> AppResult<Vec<Student>> {
        self.student_repo.search(query)
    }

    /// Enrollments referencing the student are left in place.
    pub fn delete_student(&self, id: &str) -> AppResult<()> {
        if !self.student_repo.remove(id)? {
            return Err(AppError::not_found("Student", id));
        }
        log::info!("Deleted student {}", id);
        Ok(())
    }
}
