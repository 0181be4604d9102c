// src/repositories/course_repository.rs
//
// Course persistence

use std::sync::Arc;

use rusqlite::{params, Row};

use super::search::{like_pattern, normalize_query};
use crate::db::ConnectionPool;
use crate::domain::Course;
use crate::error::{AppError, AppResult};
use crate::metrics::OperationMetrics;

pub trait CourseRepository: Send + Sync {
    fn init(&self) -> AppResult<()>;
    fn upsert(&self, course: &Course) -> AppResult<Course>;
    fn find_by_id(&self, id: &str) -> AppResult<Option<Course>>;
    fn find_all(&self) -> AppResult<Vec<Course>>;
    /// Case-insensitive substring match on id and name.
    fn search(&self, query: Option<&str>) -> AppResult<Vec<Course>>;
    fn remove(&self, id: &str) -> AppResult<bool>;
    fn update(&self, id: &str, updated: &Course) -> AppResult<bool>;
}

pub struct SqliteCourseRepository {
    pool: Arc<ConnectionPool>,
    metrics: Arc<OperationMetrics>,
}

impl SqliteCourseRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self {
            pool,
            metrics: Arc::new(OperationMetrics::new()),
        }
    }

    /// Record operation timings into a shared collector instead of a private one.
    pub fn with_metrics(mut self, metrics: Arc<OperationMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    fn row_to_course(row: &Row) -> Result<Course, rusqlite::Error> {
        let id: String = row.get("id")?;
        let name: String = row.get("name")?;
        let credits: i64 = row.get("credits")?;
        let credits = u32::try_from(credits).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Integer, Box::new(e))
        })?;

        Ok(Course::new(id, name, credits))
    }
}

impl CourseRepository for SqliteCourseRepository {
    fn init(&self) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS courses (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                credits INTEGER NOT NULL
            );",
        )?;

        Ok(())
    }

    fn upsert(&self, course: &Course) -> AppResult<Course> {
        let _timer = self.metrics.start("courses.upsert");
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO courses (id, name, credits) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                credits = excluded.credits",
            params![course.id, course.name, course.credits],
        )
        .map_err(|e| {
            log::error!("course repository upsert of {} failed: {}", course.id, e);
            AppError::Database(e)
        })?;

        Ok(course.clone())
    }

    fn find_by_id(&self, id: &str) -> AppResult<Option<Course>> {
        let _timer = self.metrics.start("courses.find_by_id");
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name, credits FROM courses WHERE id = ?1")?;

        match stmt.query_row(params![id], Self::row_to_course) {
            Ok(course) => Ok(Some(course)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => {
                log::error!("course repository lookup of {} failed: {}", id, e);
                Err(AppError::Database(e))
            }
        }
    }

    fn find_all(&self) -> AppResult<Vec<Course>> {
        let _timer = self.metrics.start("courses.find_all");
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name, credits FROM courses ORDER BY id")?;

        let courses: Vec<Course> = stmt
            .query_map([], Self::row_to_course)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(courses)
    }

    fn search(&self, query: Option<&str>) -> AppResult<Vec<Course>> {
        let _timer = self.metrics.start("courses.search");
        let Some(needle) = normalize_query(query) else {
            return self.find_all();
        };

        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, name, credits FROM courses
             WHERE fold_case(id) LIKE ?1 ESCAPE '\\'
                OR fold_case(name) LIKE ?1 ESCAPE '\\'
             ORDER BY id",
        )?;

        let courses: Vec<Course> = stmt
            .query_map(params![like_pattern(&needle)], Self::row_to_course)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(courses)
    }

    fn remove(&self, id: &str) -> AppResult<bool> {
        let _timer = self.metrics.start("courses.remove");
        let conn = self.pool.get()?;

        let affected = conn.execute("DELETE FROM courses WHERE id = ?1", params![id])?;

        Ok(affected > 0)
    }

    fn update(&self, id: &str, updated: &Course) -> AppResult<bool> {
        let _timer = self.metrics.start("courses.update");
        let conn = self.pool.get()?;

        let affected = conn.execute(
            "UPDATE courses SET name = ?2, credits = ?3 WHERE id = ?1",
            params![id, updated.name, updated.credits],
        )?;

        Ok(affected > 0)
    }
}
