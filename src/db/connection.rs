// src/db/connection.rs
//
// Database connection management
//
// PRINCIPLES:
// - Explicit connection pooling
// - No hidden connection creation
// - Clear error propagation

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

use crate::config::{DatabaseConfig, DatabaseLocation};
use crate::error::{AppError, AppResult};

/// Type alias for connection pool
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled connection
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Create a connection pool for the configured location
///
/// File databases run in WAL mode with a busy timeout so concurrent
/// request tasks wait on each other instead of failing immediately.
/// Foreign keys stay off: enrollment rows may reference records that
/// no longer exist, and that is reported when they are read.
pub fn create_connection_pool(config: &DatabaseConfig) -> AppResult<ConnectionPool> {
    let path = match &config.location {
        DatabaseLocation::Memory => return create_memory_pool(),
        DatabaseLocation::File(path) => path,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let manager = SqliteConnectionManager::file(path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        register_functions(conn)
    });

    let pool = Pool::builder()
        .max_size(config.pool_size)
        .build(manager)
        .map_err(|e| AppError::Pool(format!("Failed to create connection pool: {}", e)))?;

    log::info!(
        "Opened database at {} (pool size {})",
        path.display(),
        config.pool_size
    );

    Ok(pool)
}

/// Create a pool over a private in-memory database
///
/// Every SQLite in-memory connection is its own database, so the pool holds
/// exactly one connection and never retires it.
pub fn create_memory_pool() -> AppResult<ConnectionPool> {
    let manager = SqliteConnectionManager::memory().with_init(|conn| register_functions(conn));

    Pool::builder()
        .max_size(1)
        .min_idle(Some(1))
        .idle_timeout(None)
        .max_lifetime(None)
        .build(manager)
        .map_err(|e| AppError::Pool(format!("Failed to create in-memory pool: {}", e)))
}

/// Install the scalar functions queries rely on
///
/// `fold_case(text)` lowercases with full Unicode case mapping, matching how
/// search queries are folded before they reach SQL. SQLite's own `lower()`
/// only folds ASCII.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|v| v.to_lowercase()))
        },
    )
}

/// Get a connection from the pool
pub fn get_connection(pool: &ConnectionPool) -> AppResult<PooledConn> {
    pool.get().map_err(|e| {
        log::error!("Failed to get database connection: {}", e);
        AppError::Pool(format!("Failed to get database connection: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_pool_keeps_state_across_checkouts() {
        let pool = create_memory_pool().unwrap();

        {
            let conn = get_connection(&pool).unwrap();
            conn.execute_batch("CREATE TABLE counter (n INTEGER); INSERT INTO counter VALUES (7);")
                .unwrap();
        }

        let conn = get_connection(&pool).unwrap();
        let n: i64 = conn
            .query_row("SELECT n FROM counter", [], |row| row.get(0))
            .unwrap();
        assert_eq!(n, 7);
    }

    #[test]
    fn test_file_pool_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("records.db");
        let config = DatabaseConfig {
            location: DatabaseLocation::File(path.clone()),
            pool_size: 2,
        };

        let pool = create_connection_pool(&config).unwrap();
        let conn = get_connection(&pool).unwrap();

        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
        assert!(path.exists());
    }

    #[test]
    fn test_fold_case_lowers_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let file_config = DatabaseConfig {
            location: DatabaseLocation::File(dir.path().join("fold.db")),
            pool_size: 1,
        };

        for pool in [
            create_memory_pool().unwrap(),
            create_connection_pool(&file_config).unwrap(),
        ] {
            let conn = get_connection(&pool).unwrap();
            let (folded, ascii): (String, String) = conn
                .query_row("SELECT fold_case('ÖZGÜR Émile'), lower('ÖZGÜR')", [], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })
                .unwrap();
            assert_eq!(folded, "özgür émile");
            assert_ne!(ascii, "özgür");

            let null: Option<String> = conn
                .query_row("SELECT fold_case(NULL)", [], |row| row.get(0))
                .unwrap();
            assert!(null.is_none());
        }
    }
}
