//! # Transactions
//!
//! The transactional façade: the same operations as [`Repo`](crate::Repo),
//! scoped to one open transaction.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Tx Lifecycle                                      │
//! │                                                                         │
//! │  repo.begin() ──► Tx (active)                                          │
//! │                     │  create / update / get / get_by_id / find        │
//! │                     │  (own writes visible, others see nothing yet)    │
//! │                     ▼                                                   │
//! │           ┌─────────┴─────────┐                                        │
//! │      commit()            rollback()        drop while active           │
//! │           │                   │                   │                     │
//! │           ▼                   ▼                   ▼                     │
//! │      writes kept        writes discarded   writes discarded            │
//! │                                                                         │
//! │  After commit/rollback every call fails with TransactionClosed.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use sqlx::{Sqlite, SqliteConnection, Transaction};
use tabula_core::{Entity, Registry, SelectBuilder};
use tracing::debug;

use crate::crud;
use crate::error::{DbError, DbResult};
use crate::executor::FromSqlRow;

/// An open transaction plus the registry needed to resolve tables.
///
/// Methods take `&mut self`: a transaction is one sequence of statements and
/// cannot be shared between concurrent callers.
#[derive(Debug)]
pub struct Tx {
    transaction: Option<Transaction<'static, Sqlite>>,
    registry: Arc<Registry>,
}

impl Tx {
    pub(crate) fn new(transaction: Transaction<'static, Sqlite>, registry: Arc<Registry>) -> Self {
        Tx {
            transaction: Some(transaction),
            registry,
        }
    }

    /// Whether neither commit nor rollback has run yet.
    pub fn is_active(&self) -> bool {
        self.transaction.is_some()
    }

    /// Inserts `entity` within the transaction.
    pub async fn create<T: Entity>(&mut self, entity: &mut T) -> DbResult<()> {
        let (conn, registry) = self.parts()?;
        crud::create(conn, registry, entity).await
    }

    /// Updates `entity` within the transaction.
    pub async fn update<T: Entity>(&mut self, entity: &mut T) -> DbResult<()> {
        let (conn, registry) = self.parts()?;
        crud::update(conn, registry, entity).await
    }

    /// Runs `query` within the transaction and decodes exactly one row.
    pub async fn get<O: FromSqlRow>(&mut self, query: SelectBuilder) -> DbResult<O> {
        let (conn, _) = self.parts()?;
        crud::get(conn, query).await
    }

    /// Loads the `T` stored under `id`, seeing this transaction's writes.
    pub async fn get_by_id<T: Entity + FromSqlRow>(&mut self, id: &str) -> DbResult<T> {
        let (conn, registry) = self.parts()?;
        crud::get_by_id(conn, registry, id).await
    }

    /// Runs `query` within the transaction and decodes every row.
    pub async fn find<O: FromSqlRow>(&mut self, query: SelectBuilder) -> DbResult<Vec<O>> {
        let (conn, _) = self.parts()?;
        crud::find(conn, query).await
    }

    /// Commits the transaction. A second commit or rollback fails.
    pub async fn commit(&mut self) -> DbResult<()> {
        let transaction = self.transaction.take().ok_or(DbError::TransactionClosed)?;
        transaction.commit().await?;
        debug!("Transaction committed");
        Ok(())
    }

    /// Rolls the transaction back. A second commit or rollback fails.
    pub async fn rollback(&mut self) -> DbResult<()> {
        let transaction = self.transaction.take().ok_or(DbError::TransactionClosed)?;
        transaction.rollback().await?;
        debug!("Transaction rolled back");
        Ok(())
    }

    fn parts(&mut self) -> DbResult<(&mut SqliteConnection, &Registry)> {
        let conn = self
            .transaction
            .as_deref_mut()
            .ok_or(DbError::TransactionClosed)?;
        Ok((conn, &*self.registry))
    }
}
