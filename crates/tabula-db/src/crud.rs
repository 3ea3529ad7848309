//! CRUD primitives shared by [`Repo`](crate::Repo) and [`Tx`](crate::Tx).
//!
//! Every function takes the executor explicitly, so the same code runs on the
//! pool and inside a transaction.

use tabula_core::query::select;
use tabula_core::{Entity, Registry, SelectBuilder, Statement, TableMap};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::executor::{FromSqlRow, SqlExecutor};

/// Inserts `entity`, assigning a fresh UUID when its id is empty.
///
/// ## Returns
/// * `Ok(())` - Row inserted; `entity.id()` is set
/// * `Err(DbError::EntityAlreadyExists)` - A unique constraint rejected the row
/// * `Err(DbError::UnknownTable)` - `T` was never registered
pub(crate) async fn create<T, E>(executor: E, registry: &Registry, entity: &mut T) -> DbResult<()>
where
    T: Entity,
    E: SqlExecutor,
{
    let table = table_for::<T>(registry)?;

    if entity.id().is_empty() {
        entity.set_id(Uuid::new_v4().to_string());
    }
    entity.pre_insert();

    debug!(table = %table.table_name, id = %entity.id(), "Inserting entity");

    let stmt = Statement::insert(registry, table, entity)?;
    match executor.execute(stmt).await {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            debug!(table = %table.table_name, id = %entity.id(), "Entity already exists");
            Err(DbError::EntityAlreadyExists {
                source: sqlx::Error::Database(db_err),
            })
        }
        Err(err) => Err(DbError::Database(err)),
    }
}

/// Updates every mapped field of `entity`, matched by id.
///
/// ## Returns
/// * `Ok(())` - At least one row updated
/// * `Err(DbError::UnexpectedUpdateCount(0))` - No row has this id
pub(crate) async fn update<T, E>(executor: E, registry: &Registry, entity: &mut T) -> DbResult<()>
where
    T: Entity,
    E: SqlExecutor,
{
    let table = table_for::<T>(registry)?;
    entity.pre_update();

    debug!(table = %table.table_name, id = %entity.id(), "Updating entity");

    let stmt = Statement::update(registry, table, entity)?;
    let count = executor.execute(stmt).await.map_err(DbError::Database)?;
    if count == 0 {
        return Err(DbError::UnexpectedUpdateCount(count));
    }

    Ok(())
}

/// Runs `query` and decodes exactly one row.
pub(crate) async fn get<O, E>(executor: E, query: SelectBuilder) -> DbResult<O>
where
    O: FromSqlRow,
    E: SqlExecutor,
{
    let stmt = Statement::select(query)?;
    debug!(sql = %stmt.sql, "Selecting one row");
    Ok(executor.fetch_one(stmt).await?)
}

/// Loads the `T` stored under `id`.
pub(crate) async fn get_by_id<T, E>(executor: E, registry: &Registry, id: &str) -> DbResult<T>
where
    T: Entity + FromSqlRow,
    E: SqlExecutor,
{
    let table = table_for::<T>(registry)?;
    let query = select(["*"])
        .from(table.table_name.as_str())
        .where_eq(&table.key_column, id);
    get(executor, query).await
}

/// Runs `query` and decodes every row; no rows is an empty vector.
pub(crate) async fn find<O, E>(executor: E, query: SelectBuilder) -> DbResult<Vec<O>>
where
    O: FromSqlRow,
    E: SqlExecutor,
{
    let stmt = Statement::select(query)?;
    debug!(sql = %stmt.sql, "Selecting rows");
    let rows = executor.fetch_all(stmt).await.map_err(DbError::Database)?;
    debug!(count = rows.len(), "Select returned rows");
    Ok(rows)
}

fn table_for<T: Entity>(registry: &Registry) -> DbResult<&TableMap> {
    registry
        .table_for::<T>()
        .ok_or_else(|| DbError::UnknownTable(T::type_name().to_string()))
}
