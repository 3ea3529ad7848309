//! # Executor Abstraction
//!
//! One capability, two implementations: statements run either on the pool
//! or inside an open transaction.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Dual-Mode Execution                                  │
//! │                                                                         │
//! │   Repo ── &SqlitePool ─────────┐                                       │
//! │                                ├──► SqlExecutor ──► crud::{create,     │
//! │   Tx ──── &mut SqliteConnection┘     execute         update, get,      │
//! │           (inside Transaction)       fetch_one       get_by_id, find}  │
//! │                                      fetch_all                         │
//! │                                                                         │
//! │   CRUD logic is written once, against the trait.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;

use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Arguments, FromRow, SqliteConnection, SqlitePool};
use tabula_core::{Statement, Value};

/// Types that can be decoded from a result row.
///
/// Covers derived entities as well as scalar tuples such as `(i64,)`.
pub trait FromSqlRow: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {}

impl<T> FromSqlRow for T where T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {}

/// Something that can run a rendered statement.
///
/// Each call consumes the executor handle, mirroring sqlx: `&SqlitePool` is
/// `Copy`, and a transaction connection is reborrowed per call.
pub trait SqlExecutor: Send + Sized {
    /// Runs a write and returns the number of affected rows.
    fn execute(self, stmt: Statement) -> impl Future<Output = Result<u64, sqlx::Error>> + Send;

    /// Decodes exactly one row; fails with `RowNotFound` when there is none.
    fn fetch_one<O: FromSqlRow>(
        self,
        stmt: Statement,
    ) -> impl Future<Output = Result<O, sqlx::Error>> + Send;

    /// Decodes every row.
    fn fetch_all<O: FromSqlRow>(
        self,
        stmt: Statement,
    ) -> impl Future<Output = Result<Vec<O>, sqlx::Error>> + Send;
}

impl<'c> SqlExecutor for &'c SqlitePool {
    fn execute(self, stmt: Statement) -> impl Future<Output = Result<u64, sqlx::Error>> + Send {
        async move {
            let args = arguments(&stmt.args)?;
            let result = sqlx::query_with(&stmt.sql, args).execute(self).await?;
            Ok(result.rows_affected())
        }
    }

    fn fetch_one<O: FromSqlRow>(
        self,
        stmt: Statement,
    ) -> impl Future<Output = Result<O, sqlx::Error>> + Send {
        async move {
            let args = arguments(&stmt.args)?;
            sqlx::query_as_with::<_, O, _>(&stmt.sql, args)
                .fetch_one(self)
                .await
        }
    }

    fn fetch_all<O: FromSqlRow>(
        self,
        stmt: Statement,
    ) -> impl Future<Output = Result<Vec<O>, sqlx::Error>> + Send {
        async move {
            let args = arguments(&stmt.args)?;
            sqlx::query_as_with::<_, O, _>(&stmt.sql, args)
                .fetch_all(self)
                .await
        }
    }
}

impl<'c> SqlExecutor for &'c mut SqliteConnection {
    fn execute(self, stmt: Statement) -> impl Future<Output = Result<u64, sqlx::Error>> + Send {
        async move {
            let args = arguments(&stmt.args)?;
            let result = sqlx::query_with(&stmt.sql, args).execute(self).await?;
            Ok(result.rows_affected())
        }
    }

    fn fetch_one<O: FromSqlRow>(
        self,
        stmt: Statement,
    ) -> impl Future<Output = Result<O, sqlx::Error>> + Send {
        async move {
            let args = arguments(&stmt.args)?;
            sqlx::query_as_with::<_, O, _>(&stmt.sql, args)
                .fetch_one(self)
                .await
        }
    }

    fn fetch_all<O: FromSqlRow>(
        self,
        stmt: Statement,
    ) -> impl Future<Output = Result<Vec<O>, sqlx::Error>> + Send {
        async move {
            let args = arguments(&stmt.args)?;
            sqlx::query_as_with::<_, O, _>(&stmt.sql, args)
                .fetch_all(self)
                .await
        }
    }
}

/// Binds values positionally, in statement order.
fn arguments<'q>(values: &[Value]) -> Result<SqliteArguments<'q>, sqlx::Error> {
    let mut args = SqliteArguments::default();
    for value in values {
        let bound = match value {
            Value::Null => args.add(None::<String>),
            Value::Bool(v) => args.add(*v),
            Value::Int(v) => args.add(*v),
            Value::Float(v) => args.add(*v),
            Value::Text(v) => args.add(v.clone()),
            Value::Bytes(v) => args.add(v.clone()),
            Value::Timestamp(v) => args.add(*v),
        };
        bound.map_err(sqlx::Error::Encode)?;
    }
    Ok(args)
}
