//! # Error Types
//!
//! Errors raised while rendering SQL from builders and entity mappings.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tabula-core errors (this file)                                        │
//! │  └── QueryError   - A builder or mapping could not be rendered         │
//! │                                                                         │
//! │  tabula-db errors (separate crate)                                     │
//! │  └── DbError      - Database operation failures (wraps QueryError)     │
//! │                                                                         │
//! │  Flow: QueryError → DbError::Query → caller                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Errors produced when SQL text cannot be rendered.
///
/// These never reach the database: they signal malformed builder usage or
/// an entity whose fields do not fit its table mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A SELECT was rendered without any result column.
    #[error("select statements must have at least one result column")]
    NoColumns,

    /// A predicate's `?` placeholders do not match its argument count.
    #[error("predicate '{predicate}' has {placeholders} placeholders but {args} arguments")]
    ArgumentCount {
        predicate: String,
        placeholders: usize,
        args: usize,
    },

    /// The entity's fields do not include the table's key column.
    #[error("entity mapped to '{table}' has no '{column}' field")]
    MissingKey { table: String, column: String },

    /// An UPDATE would set nothing: the entity only maps its key column.
    #[error("entity mapped to '{table}' has no columns to update")]
    NoUpdatableColumns { table: String },

    /// An INSERT was rendered from an entity without any field.
    #[error("entity mapped to '{table}' has no columns to insert")]
    NoInsertableColumns { table: String },
}

/// Convenience type alias for Results with QueryError.
pub type QueryResult<T> = Result<T, QueryError>;
