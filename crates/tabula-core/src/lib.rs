//! # tabula-core: Pure Mapping Layer
//!
//! This crate holds everything needed to turn entity values into table rows
//! and SQL text, with zero I/O dependencies. The database crate (`tabula-db`)
//! executes what this crate renders.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        tabula Data Flow                                 │
//! │                                                                         │
//! │  repo.create(&mut entity)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ tabula-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  entity   │  │ registry  │  │   query   │  │ statement │  │   │
//! │  │   │  Entity   │  │ Registry  │  │  Select   │  │  INSERT   │  │   │
//! │  │   │  Value    │  │ TableMap  │  │  Builder  │  │  UPDATE   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │  Statement { sql, args }                                       │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  tabula-db (Database Layer)                     │   │
//! │  │            sqlx pool, executor, Repo / Tx façades               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`entity`] - The `Entity` contract and bindable [`Value`]s
//! - [`naming`] - Type/field name to table/column name conversion
//! - [`registry`] - Entity type to table mappings
//! - [`query`] - Fluent SELECT builder with placeholder rendering
//! - [`statement`] - INSERT/UPDATE rendering for mapped entities
//! - [`error`] - Query rendering errors
//!
//! ## Example Usage
//!
//! ```rust
//! use tabula_core::query::{select, PlaceholderFormat};
//!
//! let (sql, args) = select(["*"])
//!     .from("entity_sample")
//!     .where_eq("enabled", true)
//!     .placeholder_format(PlaceholderFormat::Dollar)
//!     .to_sql()
//!     .unwrap();
//!
//! assert_eq!(sql, "SELECT * FROM entity_sample WHERE enabled = $1");
//! assert_eq!(args.len(), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod entity;
pub mod error;
pub mod naming;
pub mod query;
pub mod registry;
pub mod statement;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use entity::{Entity, Field, Value};
pub use error::{QueryError, QueryResult};
pub use query::{select, PlaceholderFormat, SelectBuilder};
pub use registry::{Registry, TableMap};
pub use statement::Statement;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Field name of the primary key of every registered entity.
///
/// The registry's name mapper turns it into the key column.
pub const KEY_COLUMN: &str = "id";
