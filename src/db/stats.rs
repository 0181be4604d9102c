// src/db/stats.rs
//
// Database health and statistics

use rusqlite::Connection;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Run SQLite's integrity check
pub fn verify_database_integrity(conn: &Connection) -> AppResult<()> {
    let result: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

    if result != "ok" {
        return Err(AppError::Other(format!(
            "Database integrity check failed: {}",
            result
        )));
    }

    Ok(())
}

/// Row counts and on-disk size
///
/// A table that has not been created yet counts as empty.
pub fn get_database_stats(conn: &Connection) -> AppResult<DatabaseStats> {
    let page_count: i64 = conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
    let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;

    Ok(DatabaseStats {
        size_bytes: page_count * page_size,
        student_count: count_rows(conn, "students")?,
        course_count: count_rows(conn, "courses")?,
        enrollment_count: count_rows(conn, "enrollments")?,
    })
}

fn count_rows(conn: &Connection, table: &str) -> AppResult<i64> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [table],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    // Table names come from the fixed set above, never from input.
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    Ok(count)
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStats {
    pub size_bytes: i64,
    pub student_count: i64,
    pub course_count: i64,
    pub enrollment_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_on_empty_database() {
        let conn = Connection::open_in_memory().unwrap();

        let stats = get_database_stats(&conn).unwrap();
        assert_eq!(stats.student_count, 0);
        assert_eq!(stats.course_count, 0);
        assert_eq!(stats.enrollment_count, 0);
    }

    #[test]
    fn test_stats_count_rows() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE students (id TEXT PRIMARY KEY);
             INSERT INTO students VALUES ('S001'), ('S002');",
        )
        .unwrap();

        let stats = get_database_stats(&conn).unwrap();
        assert_eq!(stats.student_count, 2);
        assert!(stats.size_bytes > 0);
    }

    #[test]
    fn test_integrity_check() {
        let conn = Connection::open_in_memory().unwrap();
        verify_database_integrity(&conn).unwrap();
    }

    #[test]
    fn test_integrity_check_rejects_non_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.db");
        std::fs::write(&path, vec![0x5a; 4096]).unwrap();

        let conn = Connection::open(&path).unwrap();
        assert!(verify_database_integrity(&conn).is_err());
    }
}
