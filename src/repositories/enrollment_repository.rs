// src/repositories/enrollment_repository.rs
//
// Enrollment persistence
//
// Enrollment rows only store the two ids. Student and course are resolved
// through their own repositories when a row is read, after the row's
// connection has been returned to the pool.

use std::sync::Arc;

use chrono::NaiveDate;
use rusqlite::{params, Row};

use super::search::{format_date, parse_date};
use super::{CourseRepository, StudentRepository};
use crate::db::ConnectionPool;
use crate::domain::Enrollment;
use crate::error::{AppError, AppResult};
use crate::metrics::OperationMetrics;

#[cfg_attr(test, mockall::automock)]
pub trait EnrollmentRepository: Send + Sync {
    /// Create the student, course and enrollment tables, in that order.
    fn init(&self) -> AppResult<()>;

    /// Upsert the embedded student, then the course, then the enrollment row.
    fn add(&self, enrollment: &Enrollment) -> AppResult<Enrollment>;

    fn find(&self, student_id: &str, course_id: &str) -> AppResult<Option<Enrollment>>;

    /// Enrollments of one student, ordered by course id.
    fn find_by_student_id(&self, student_id: &str) -> AppResult<Vec<Enrollment>>;

    /// Enrollments in one course, ordered by student id.
    fn find_by_course_id(&self, course_id: &str) -> AppResult<Vec<Enrollment>>;

    fn find_all(&self) -> AppResult<Vec<Enrollment>>;

    fn remove(&self, student_id: &str, course_id: &str) -> AppResult<bool>;
}

/// An enrollment row before its references are resolved
struct EnrollmentRow {
    student_id: String,
    course_id: String,
    enrolled_on: NaiveDate,
    grade: Option<f64>,
}

const SELECT_COLUMNS: &str = "SELECT student_id, course_id, enrolled_on, grade FROM enrollments";

pub struct SqliteEnrollmentRepository {
    pool: Arc<ConnectionPool>,
    metrics: Arc<OperationMetrics>,
    students: Arc<dyn StudentRepository>,
    courses: Arc<dyn CourseRepository>,
}

impl SqliteEnrollmentRepository {
    pub fn new(
        pool: Arc<ConnectionPool>,
        students: Arc<dyn StudentRepository>,
        courses: Arc<dyn CourseRepository>,
    ) -> Self {
        Self {
            pool,
            metrics: Arc::new(OperationMetrics::new()),
            students,
            courses,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<OperationMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    fn row_to_raw(row: &Row) -> Result<EnrollmentRow, rusqlite::Error> {
        let enrolled_on_str: String = row.get("enrolled_on")?;

        Ok(EnrollmentRow {
            student_id: row.get("student_id")?,
            course_id: row.get("course_id")?,
            enrolled_on: parse_date(2, &enrolled_on_str)?,
            grade: row.get("grade")?,
        })
    }

    /// Run a query and collect raw rows. The pooled connection is released
    /// before this returns.
    fn query_rows(
        &self,
        sql: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> AppResult<Vec<EnrollmentRow>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(sql)?;

        let rows = stmt
            .query_map(args, Self::row_to_raw)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn hydrate(&self, row: EnrollmentRow) -> AppResult<Enrollment> {
        let student = self.students.find_by_id(&row.student_id)?;
        let course = self.courses.find_by_id(&row.course_id)?;

        match (student, course) {
            (Some(student), Some(course)) => Ok(Enrollment::restore(
                student,
                course,
                row.enrolled_on,
                row.grade,
            )),
            _ => {
                log::error!(
                    "Enrollment {}+{} references a missing student or course",
                    row.student_id,
                    row.course_id
                );
                Err(AppError::ReferentialIntegrity {
                    student_id: row.student_id,
                    course_id: row.course_id,
                })
            }
        }
    }

    fn hydrate_all(&self, rows: Vec<EnrollmentRow>) -> AppResult<Vec<Enrollment>> {
        rows.into_iter().map(|row| self.hydrate(row)).collect()
    }
}

impl EnrollmentRepository for SqliteEnrollmentRepository {
    fn init(&self) -> AppResult<()> {
        self.students.init()?;
        self.courses.init()?;

        let conn = self.pool.get()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS enrollments (
                student_id TEXT NOT NULL,
                course_id TEXT NOT NULL,
                enrolled_on TEXT NOT NULL,
                grade REAL NULL,
                PRIMARY KEY (student_id, course_id)
            );",
        )?;

        Ok(())
    }

    fn add(&self, enrollment: &Enrollment) -> AppResult<Enrollment> {
        let _timer = self.metrics.start("enrollments.add");
        self.students.upsert(enrollment.student())?;
        self.courses.upsert(enrollment.course())?;

        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO enrollments (student_id, course_id, enrolled_on, grade)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(student_id, course_id) DO UPDATE SET
                enrolled_on = excluded.enrolled_on,
                grade = excluded.grade",
            params![
                enrollment.student_id(),
                enrollment.course_id(),
                format_date(enrollment.enrolled_on()),
                enrollment.grade(),
            ],
        )
        .map_err(|e| {
            log::error!(
                "Failed to store enrollment {}+{}: {}",
                enrollment.student_id(),
                enrollment.course_id(),
                e
            );
            AppError::Database(e)
        })?;

        Ok(enrollment.clone())
    }

    fn find(&self, student_id: &str, course_id: &str) -> AppResult<Option<Enrollment>> {
        let _timer = self.metrics.start("enrollments.find");
        let mut rows = self.query_rows(
            &format!("{} WHERE student_id = ?1 AND course_id = ?2", SELECT_COLUMNS),
            params![student_id, course_id],
        )?;

        match rows.pop() {
            Some(row) => self.hydrate(row).map(Some),
            None => Ok(None),
        }
    }

    fn find_by_student_id(&self, student_id: &str) -> AppResult<Vec<Enrollment>> {
        let _timer = self.metrics.start("enrollments.find_by_student_id");
        let rows = self.query_rows(
            &format!("{} WHERE student_id = ?1 ORDER BY course_id", SELECT_COLUMNS),
            params![student_id],
        )?;

        self.hydrate_all(rows)
    }

    fn find_by_course_id(&self, course_id: &str) -> AppResult<Vec<Enrollment>> {
        let _timer = self.metrics.start("enrollments.find_by_course_id");
        let rows = self.query_rows(
            &format!("{} WHERE course_id = ?1 ORDER BY student_id", SELECT_COLUMNS),
            params![course_id],
        )?;

        self.hydrate_all(rows)
    }

    fn find_all(&self) -> AppResult<Vec<Enrollment>> {
        let _timer = self.metrics.start("enrollments.find_all");
        let rows = self.query_rows(
            &format!("{} ORDER BY student_id, course_id", SELECT_COLUMNS),
            params![],
        )?;

        self.hydrate_all(rows)
    }

    fn remove(&self, student_id: &str, course_id: &str) -> AppResult<bool> {
        let _timer = self.metrics.start("enrollments.remove");
        let conn = self.pool.get()?;

        let affected = conn.execute(
            "DELETE FROM enrollments WHERE student_id = ?1 AND course_id = ?2",
            params![student_id, course_id],
        )?;

        Ok(affected > 0)
    }
}
