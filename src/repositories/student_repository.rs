// src/repositories/student_repository.rs
//
// Student persistence

use std::sync::Arc;

use rusqlite::{params, Row};

use super::search::{format_date, like_pattern, normalize_query, parse_date};
use crate::db::ConnectionPool;
use crate::domain::Student;
use crate::error::{AppError, AppResult};
use crate::metrics::OperationMetrics;

pub trait StudentRepository: Send + Sync {
    /// Create the backing table if missing. Idempotent.
    fn init(&self) -> AppResult<()>;

    /// Insert, or replace every mutable field of an existing row with the same id.
    fn upsert(&self, student: &Student) -> AppResult<Student>;

    fn find_by_id(&self, id: &str) -> AppResult<Option<Student>>;

    /// All students ordered by id.
    fn find_all(&self) -> AppResult<Vec<Student>>;

    /// Case-insensitive substring match on id, name and email.
    fn search(&self, query: Option<&str>) -> AppResult<Vec<Student>>;

    fn remove(&self, id: &str) -> AppResult<bool>;

    /// Overwrite the row addressed by `id`; `updated.id` is ignored.
    fn update(&self, id: &str, updated: &Student) -> AppResult<bool>;
}

pub struct SqliteStudentRepository {
    pool: Arc<ConnectionPool>,
    metrics: Arc<OperationMetrics>,
}

const SELECT_COLUMNS: &str = "SELECT id, name, email, dob, thesis_title FROM students";

impl SqliteStudentRepository {
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

    fn row_to_student(row: &Row) -> Result<Student, rusqlite::Error> {
        let id: String = row.get("id")?;
        let name: String = row.get("name")?;
        let email: String = row.get("email")?;
        let dob_str: String = row.get("dob")?;
        let date_of_birth = parse_date(3, &dob_str)?;
        let thesis_title: Option<String> = row.get("thesis_title")?;

        Ok(Student::create(id, name, email, date_of_birth, thesis_title))
    }

    fn log_failure(operation: &str, err: &AppError) {
        log::error!("student repository {} failed: {}", operation, err);
    }
}

impl StudentRepository for SqliteStudentRepository {
    fn init(&self) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS students (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                dob TEXT NOT NULL,
                thesis_title TEXT NULL
            );",
        )?;

        Ok(())
    }

    fn upsert(&self, student: &Student) -> AppResult<Student> {
        let _timer = self.metrics.start("students.upsert");
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO students (id, name, email, dob, thesis_title)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                dob = excluded.dob,
                thesis_title = excluded.thesis_title",
            params![
                student.id,
                student.name,
                student.email,
                format_date(student.date_of_birth),
                student.thesis_title(),
            ],
        )
        .map_err(|e| {
            let err = AppError::Database(e);
            Self::log_failure("upsert", &err);
            err
        })?;

        Ok(student.clone())
    }

    fn find_by_id(&self, id: &str) -> AppResult<Option<Student>> {
        let _timer = self.metrics.start("students.find_by_id");
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;

        match stmt.query_row(params![id], Self::row_to_student) {
            Ok(student) => Ok(Some(student)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => {
                let err = AppError::Database(e);
                Self::log_failure("find_by_id", &err);
                Err(err)
            }
        }
    }

    fn find_all(&self) -> AppResult<Vec<Student>> {
        let _timer = self.metrics.start("students.find_all");
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;

        let students: Vec<Student> = stmt
            .query_map([], Self::row_to_student)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(students)
    }

    fn search(&self, query: Option<&str>) -> AppResult<Vec<Student>> {
        let _timer = self.metrics.start("students.search");
        let Some(needle) = normalize_query(query) else {
            return self.find_all();
        };

        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "{} WHERE fold_case(id) LIKE ?1 ESCAPE '\\'
                OR fold_case(name) LIKE ?1 ESCAPE '\\'
                OR fold_case(email) LIKE ?1 ESCAPE '\\'
             ORDER BY id",
            SELECT_COLUMNS
        ))?;

        let students: Vec<Student> = stmt
            .query_map(params![like_pattern(&needle)], Self::row_to_student)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(students)
    }

    fn remove(&self, id: &str) -> AppResult<bool> {
        let _timer = self.metrics.start("students.remove");
        let conn = self.pool.get()?;

        let affected = conn.execute("DELETE FROM students WHERE id = ?1", params![id])?;

        Ok(affected > 0)
    }

    fn update(&self, id: &str, updated: &Student) -> AppResult<bool> {
        let _timer = self.metrics.start("students.update");
        let conn = self.pool.get()?;

        let affected = conn
            .execute(
                "UPDATE students
                 SET name = ?2, email = ?3, dob = ?4, thesis_title = ?5
                 WHERE id = ?1",
                params![
                    id,
                    updated.name,
                    updated.email,
                    format_date(updated.date_of_birth),
                    updated.thesis_title(),
                ],
            )
            .map_err(|e| {
                let err = AppError::Database(e);
                Self::log_failure("update", &err);
                err
            })?;

        Ok(affected > 0)
    }
}
