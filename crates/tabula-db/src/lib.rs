//! # tabula-db: Repository Layer
//!
//! Create, update, get-by-id and query operations for any registered entity
//! type, on a plain connection or inside a transaction. SQL rendering lives in
//! `tabula-core`; this crate executes it through sqlx on SQLite.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        tabula Data Flow                                 │
//! │                                                                         │
//! │  Application code                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tabula-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  Repo / Tx    │    │    crud       │    │   executor   │  │   │
//! │  │   │  (façades)    │───►│  create       │───►│ SqlExecutor  │  │   │
//! │  │   │               │    │  update, get  │    │ pool | tx    │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐                      │   │
//! │  │   │   DbConfig    │───►│ pool::connect │                      │   │
//! │  │   └───────────────┘    └───────────────┘                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (file or in-memory)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Connection settings
//! - [`pool`] - Connection factory
//! - [`executor`] - The pool/transaction execution trait
//! - [`repo`] - Non-transactional façade
//! - [`tx`] - Transactional façade
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tabula_db::{select, DbConfig, Registry, Repo};
//!
//! let registry = Registry::new().register::<EntitySample>();
//! let repo = Repo::new(DbConfig::from_env()?, registry).await?;
//!
//! let mut entity = EntitySample::default();
//! repo.create(&mut entity).await?;
//! let stored: EntitySample = repo.get_by_id(entity.id()).await?;
//!
//! let mut tx = repo.begin().await?;
//! entity.enabled = true;
//! tx.update(&mut entity).await?;
//! tx.commit().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
mod crud;
pub mod error;
pub mod executor;
pub mod pool;
pub mod repo;
pub mod tx;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, DbConfig};
pub use error::{DbError, DbResult};
pub use executor::{FromSqlRow, SqlExecutor};
pub use repo::Repo;
pub use tx::Tx;

// The mapping layer, so callers only need this crate
pub use tabula_core::{select, Entity, Field, Registry, SelectBuilder, Value};
