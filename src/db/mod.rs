// src/db/mod.rs
//
// Database module
//
// Provides:
// - Connection pooling
// - Health and statistics queries

pub mod connection;
pub mod stats;

pub use connection::{
    create_connection_pool, create_memory_pool, get_connection, ConnectionPool, PooledConn,
};

pub use stats::{get_database_stats, verify_database_integrity, DatabaseStats};
