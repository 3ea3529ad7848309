//! # Connection Factory
//!
//! Opens the SQLite pool a repository runs on.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Repository Connection                              │
//! │                                                                         │
//! │  DbConfig ← connection string, pool bounds                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  connect(&config).await                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────┐                                       │
//! │  │         SqlitePool          │                                       │
//! │  │  ┌─────┐                    │   max_connections = 1 (default)       │
//! │  │  │Conn1│  ← recycled after  │                                       │
//! │  │  └─────┘    max_lifetime    │                                       │
//! │  └─────────────────────────────┘                                       │
//! │       │                                                                 │
//! │  Caller A ──► Conn1                                                    │
//! │  Caller B ──► waits (up to acquire_timeout) until Conn1 is released    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::DbConfig;
use crate::error::{DbError, DbResult};

/// Opens a connection pool from configuration.
///
/// ## What This Does
/// 1. Parses the connection string
/// 2. Enables foreign keys and creates the file if missing; file databases
///    switch to WAL mode, in-memory ones keep their connection forever
/// 3. Builds the pool with the configured bounds and opens a connection to
///    prove the database is reachable
///
/// ## Returns
/// * `Ok(SqlitePool)` - Ready-to-use pool
/// * `Err(DbError::ConnectionFailed)` - The database could not be opened
/// * `Err(DbError::Config)` - The pool bounds are invalid
pub async fn connect(config: &DbConfig) -> DbResult<SqlitePool> {
    config.validate()?;

    info!(
        max_connections = config.max_connections,
        in_memory = config.is_in_memory(),
        "Connecting to the database"
    );

    let mut connect_options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(DbError::ConnectionFailed)?
        .foreign_keys(true)
        .create_if_missing(true);

    let mut min_connections = config.min_connections;
    let mut max_lifetime = config.max_lifetime;
    let mut idle_timeout = config.idle_timeout;

    if config.is_in_memory() {
        // Closing the last connection drops an in-memory database
        min_connections = min_connections.max(1);
        max_lifetime = None;
        idle_timeout = None;
    } else {
        connect_options = connect_options.journal_mode(SqliteJournalMode::Wal);
    }

    debug!(?max_lifetime, ?idle_timeout, "Connection options configured");

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(min_connections)
        .max_lifetime(max_lifetime)
        .idle_timeout(idle_timeout)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(connect_options)
        .await
        .map_err(DbError::ConnectionFailed)?;

    info!(max_connections = config.max_connections, "Database pool created");

    Ok(pool)
}
