//! # Statements
//!
//! INSERT and UPDATE rendering for mapped entities.
//!
//! ```text
//! INSERT INTO entity_sample (id, enabled, created) VALUES ($1, $2, $3)
//! UPDATE entity_sample SET enabled = $1, created = $2 WHERE id = $3
//! ```
//!
//! Both use positional `$N` placeholders; arguments are returned in the same
//! order.

use crate::entity::{Entity, Value};
use crate::error::{QueryError, QueryResult};
use crate::query::{PlaceholderFormat, SelectBuilder};
use crate::registry::{Registry, TableMap};
use crate::KEY_COLUMN;

/// SQL text plus its ordered bind arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Statement {
            sql: sql.into(),
            args,
        }
    }

    /// Renders a SELECT builder with `$N` placeholders.
    pub fn select(builder: SelectBuilder) -> QueryResult<Self> {
        let (sql, args) = builder
            .placeholder_format(PlaceholderFormat::Dollar)
            .to_sql()?;
        Ok(Statement { sql, args })
    }

    /// Renders an INSERT of every mapped field of `entity`.
    ///
    /// Fails with [`QueryError::MissingKey`] when the key field is not listed.
    pub fn insert<T: Entity>(registry: &Registry, table: &TableMap, entity: &T) -> QueryResult<Self> {
        let fields = entity.fields();
        if fields.is_empty() {
            return Err(QueryError::NoInsertableColumns {
                table: table.table_name.clone(),
            });
        }
        if !fields.iter().any(|field| field.name == KEY_COLUMN) {
            return Err(missing_key(table));
        }

        let mut columns = Vec::with_capacity(fields.len());
        let mut placeholders = Vec::with_capacity(fields.len());
        let mut args = Vec::with_capacity(fields.len());
        for (i, field) in fields.into_iter().enumerate() {
            columns.push(registry.column_name(field.name));
            placeholders.push(format!("${}", i + 1));
            args.push(field.value);
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.table_name,
            columns.join(", "),
            placeholders.join(", ")
        );
        Ok(Statement { sql, args })
    }

    /// Renders an UPDATE of every non-key field, matched on the key column.
    pub fn update<T: Entity>(registry: &Registry, table: &TableMap, entity: &T) -> QueryResult<Self> {
        let mut assignments = Vec::new();
        let mut args = Vec::new();
        let mut key = None;

        for field in entity.fields() {
            if field.name == KEY_COLUMN {
                key = Some(field.value);
                continue;
            }
            args.push(field.value);
            assignments.push(format!(
                "{} = ${}",
                registry.column_name(field.name),
                args.len()
            ));
        }

        let key = key.ok_or_else(|| missing_key(table))?;
        if assignments.is_empty() {
            return Err(QueryError::NoUpdatableColumns {
                table: table.table_name.clone(),
            });
        }

        args.push(key);
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ${}",
            table.table_name,
            assignments.join(", "),
            table.key_column,
            args.len()
        );
        Ok(Statement { sql, args })
    }
}

fn missing_key(table: &TableMap) -> QueryError {
    QueryError::MissingKey {
        table: table.table_name.clone(),
        column: table.key_column.clone(),
    }
}
