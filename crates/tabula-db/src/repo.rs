//! # Repository
//!
//! The non-transactional façade.
//!
//! ## Usage
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  let repo = Repo::new(config, registry).await?;                        │
//! │       │                                                                 │
//! │       ├── repo.create(&mut entity)         INSERT, id generated        │
//! │       ├── repo.update(&mut entity)         UPDATE … WHERE id = $n      │
//! │       ├── repo.get::<O>(query)             exactly one row             │
//! │       ├── repo.get_by_id::<T>(id)          SELECT * … WHERE id = $1    │
//! │       ├── repo.find::<O>(query)            zero or more rows           │
//! │       └── repo.begin()                     → Tx (same operations)      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use sqlx::SqlitePool;
use tabula_core::{Entity, Registry, SelectBuilder};
use tracing::{debug, info};

use crate::config::DbConfig;
use crate::crud;
use crate::error::DbResult;
use crate::executor::FromSqlRow;
use crate::pool;
use crate::tx::Tx;

/// Repository over every entity type in its registry.
///
/// Cloning is cheap: clones share the pool and the registry.
#[derive(Debug, Clone)]
pub struct Repo {
    pool: SqlitePool,
    registry: Arc<Registry>,
}

impl Repo {
    /// Connects with `config` and freezes `registry`.
    ///
    /// ## Returns
    /// * `Ok(Repo)` - Ready-to-use repository
    /// * `Err(DbError::ConnectionFailed)` - The database is unreachable;
    ///   the caller decides whether to exit or retry
    pub async fn new(config: DbConfig, registry: Registry) -> DbResult<Self> {
        let pool = pool::connect(&config).await?;
        Ok(Repo::with_pool(pool, registry))
    }

    /// Builds a repository on an existing pool.
    pub fn with_pool(pool: SqlitePool, registry: Registry) -> Self {
        info!(tables = registry.len(), "Repository ready");
        for table in registry.tables() {
            debug!(
                entity = table.type_name,
                table = %table.table_name,
                key = %table.key_column,
                "Mapped entity"
            );
        }
        Repo {
            pool,
            registry: Arc::new(registry),
        }
    }

    /// Inserts `entity`; an empty id is replaced by a generated one.
    pub async fn create<T: Entity>(&self, entity: &mut T) -> DbResult<()> {
        crud::create(&self.pool, &self.registry, entity).await
    }

    /// Updates `entity` by id; fails when no row matched.
    pub async fn update<T: Entity>(&self, entity: &mut T) -> DbResult<()> {
        crud::update(&self.pool, &self.registry, entity).await
    }

    /// Runs `query` and decodes exactly one row.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let (count,): (i64,) = repo
    ///     .get(select(["count(id)"]).from("entity_sample"))
    ///     .await?;
    /// ```
    pub async fn get<O: FromSqlRow>(&self, query: SelectBuilder) -> DbResult<O> {
        crud::get(&self.pool, query).await
    }

    /// Loads the `T` stored under `id`.
    pub async fn get_by_id<T: Entity + FromSqlRow>(&self, id: &str) -> DbResult<T> {
        crud::get_by_id(&self.pool, &self.registry, id).await
    }

    /// Runs `query` and decodes every row.
    pub async fn find<O: FromSqlRow>(&self, query: SelectBuilder) -> DbResult<Vec<O>> {
        crud::find(&self.pool, query).await
    }

    /// Opens a transaction.
    ///
    /// With a single-connection pool the transaction holds the only
    /// connection until it is committed, rolled back or dropped.
    pub async fn begin(&self) -> DbResult<Tx> {
        let transaction = self.pool.begin().await?;
        debug!("Transaction started");
        Ok(Tx::new(transaction, Arc::clone(&self.registry)))
    }

    /// Returns the registry this repository was built with.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns a reference to the connection pool.
    ///
    /// For statements outside the repository contract (schema setup, ad hoc
    /// queries).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Closes the pool; every later operation fails.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }
}
