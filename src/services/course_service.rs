// src/services/course_service.rs
use std::sync::Arc;

use crate::domain::{validate_course, Course};
use crate::error::{AppError, AppResult};
use crate::repositories::CourseRepository;

pub struct CourseService {
    course_repo: Arc<dyn CourseRepository>,
}

impl CourseService {
    pub fn new(course_repo: Arc<dyn CourseRepository>) -> Self {
        Self { course_repo }
    }

    pub fn save_course(&self, course: Course) -> AppResult<Course> {
        validate_course(&course).map_err(AppError::Domain)?;
        let stored = self.course_repo.upsert(&course)?;
        log::info!("Saved course {}", stored.id);
        Ok(stored)
    }

    pub fn update_course(&self, id: &str, updated: Course) -> AppResult<Course> {
        validate_course(&updated).map_err(AppError::Domain)?;

        if !self.course_repo.update(id, &updated)? {
            return Err(AppError::not_found("Course", id));
        }

        self.get_course(id)
    }

    pub fn get_course(&self, id: &str) -> AppResult<Course> {
        self.course_repo
            .find_by_id(id)?
            .ok_or_else(|| AppError::not_found("Course", id))
    }

    pub fn search_courses(&self, query: Option<&str>) -> AppResult<Vec<Course>> {
        self.course_repo.search(query)
    }

    pub fn delete_course(&self, id: &str) -> AppResult<()> {
        if !self.course_repo.remove(id)? {
            return Err(AppError::not_found("Course", id));
        }
        log::info!("Deleted course {}", id);
        Ok(())
    }
}
