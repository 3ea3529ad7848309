//! # Database Error Types
//!
//! Error types for repository operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error                    QueryError (tabula-core)               │
//! │       │                              │                                  │
//! │       ▼                              ▼                                  │
//! │  DbError (this module) ← classified by the operation that failed       │
//! │       │                                                                 │
//! │       ├── create: unique violation  → EntityAlreadyExists              │
//! │       ├── update: 0 rows affected   → UnexpectedUpdateCount            │
//! │       ├── get:    no rows           → NotFound                         │
//! │       └── anything else             → Database (unchanged)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tabula_core::QueryError;
use thiserror::Error;

use crate::config::ConfigError;

/// Repository operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// The pool could not be opened.
    ///
    /// ## When This Occurs
    /// - Database file can't be created or opened
    /// - Malformed connection string
    #[error("failed connecting to the database: {0}")]
    ConnectionFailed(#[source] sqlx::Error),

    /// Configuration is missing or invalid.
    #[error("invalid database configuration: {0}")]
    Config(#[from] ConfigError),

    /// Insert hit a uniqueness constraint.
    ///
    /// ## When This Occurs
    /// - Creating an entity with an id that is already stored
    /// - Any other UNIQUE index on the table rejects the row
    #[error("entity already exists: {source}")]
    EntityAlreadyExists { source: sqlx::Error },

    /// Update matched no row: the entity does not exist.
    #[error("unexpected update count: {0}")]
    UnexpectedUpdateCount(u64),

    /// A single-row query matched nothing.
    #[error("no rows in result set")]
    NotFound,

    /// The entity type was never registered.
    #[error("unknown table for type: {0}")]
    UnknownTable(String),

    /// The query could not be rendered to SQL.
    #[error("failed to build query: {0}")]
    Query(#[from] QueryError),

    /// The transaction was already committed or rolled back.
    #[error("transaction has already been committed or rolled back")]
    TransactionClosed,

    /// Any other driver error, unchanged.
    #[error(transparent)]
    Database(sqlx::Error),
}

impl DbError {
    /// Returns true when a get matched no row.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound)
    }

    /// Returns true when a create collided with an existing row.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, DbError::EntityAlreadyExists { .. })
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// Other                       → DbError::Database
/// ```
///
/// Uniqueness violations are only reclassified by create, which knows the
/// failure came from an insert.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            other => DbError::Database(other),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
