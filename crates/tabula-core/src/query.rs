//! # Query Builder
//!
//! A fluent description of SELECT statements, rendered to parameterized SQL.
//!
//! ## Placeholders
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Placeholder Rendering                                │
//! │                                                                         │
//! │  Predicates are always written with `?`:                               │
//! │                                                                         │
//! │    .where_raw("created > ? AND enabled = ?", [t, true])                │
//! │                                                                         │
//! │  PlaceholderFormat::Question  →  created > ? AND enabled = ?           │
//! │  PlaceholderFormat::Dollar    →  created > $1 AND enabled = $2         │
//! │                                                                         │
//! │  `??` is an escaped literal `?` and never becomes a placeholder.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::entity::Value;
use crate::error::{QueryError, QueryResult};

// =============================================================================
// Placeholder Format
// =============================================================================

/// How `?` placeholders are rendered in the final SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderFormat {
    /// Leave `?` as is.
    #[default]
    Question,
    /// Positional `$1, $2, …`.
    Dollar,
}

impl PlaceholderFormat {
    /// Rewrites `?` placeholders in `sql`, turning `??` into a literal `?`.
    pub fn replace_placeholders(self, sql: &str) -> String {
        let mut out = String::with_capacity(sql.len() + 8);
        let mut chars = sql.chars().peekable();
        let mut index = 0usize;

        while let Some(c) = chars.next() {
            if c != '?' {
                out.push(c);
                continue;
            }
            if chars.peek() == Some(&'?') {
                chars.next();
                match self {
                    PlaceholderFormat::Question => out.push_str("??"),
                    PlaceholderFormat::Dollar => out.push('?'),
                }
                continue;
            }
            match self {
                PlaceholderFormat::Question => out.push('?'),
                PlaceholderFormat::Dollar => {
                    index += 1;
                    out.push('$');
                    out.push_str(&index.to_string());
                }
            }
        }

        out
    }
}

/// Counts `?` placeholders, skipping `??` escapes.
fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '?' {
            if chars.peek() == Some(&'?') {
                chars.next();
            } else {
                count += 1;
            }
        }
    }
    count
}

// =============================================================================
// Select Builder
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Predicate {
    sql: String,
    args: Vec<Value>,
}

/// Fluent SELECT statement description.
///
/// ## Example
/// ```rust
/// use tabula_core::query::{select, PlaceholderFormat};
///
/// let (sql, args) = select(["count(id)"])
///     .from("entity_sample")
///     .where_raw("enabled = ?", [true.into()])
///     .placeholder_format(PlaceholderFormat::Dollar)
///     .to_sql()
///     .unwrap();
///
/// assert_eq!(sql, "SELECT count(id) FROM entity_sample WHERE enabled = $1");
/// assert_eq!(args.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectBuilder {
    columns: Vec<String>,
    from: Option<String>,
    predicates: Vec<Predicate>,
    order_by: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    format: PlaceholderFormat,
}

/// Starts a SELECT over the given result columns.
pub fn select<I, S>(columns: I) -> SelectBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    SelectBuilder::new().columns(columns)
}

impl SelectBuilder {
    /// Creates an empty builder; at least one column must be added before rendering.
    pub fn new() -> Self {
        SelectBuilder::default()
    }

    /// Adds a result column (or expression such as `count(id)`).
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Adds several result columns.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Sets the source table.
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.from = Some(table.into());
        self
    }

    /// Adds `column = ?` bound to `value`.
    pub fn where_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        let sql = if value.is_null() {
            format!("{column} IS NULL")
        } else {
            format!("{column} = ?")
        };
        let args = if value.is_null() { Vec::new() } else { vec![value] };
        self.predicates.push(Predicate { sql, args });
        self
    }

    /// Adds a raw predicate written with `?` placeholders.
    ///
    /// Predicates are joined with `AND`; the placeholder count is checked
    /// against `args` when rendering.
    pub fn where_raw<I>(mut self, sql: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.predicates.push(Predicate {
            sql: sql.into(),
            args: args.into_iter().collect(),
        });
        self
    }

    /// Adds an ORDER BY term, e.g. `"created DESC"`.
    pub fn order_by(mut self, term: impl Into<String>) -> Self {
        self.order_by.push(term.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets how placeholders are rendered by [`SelectBuilder::to_sql`].
    pub fn placeholder_format(mut self, format: PlaceholderFormat) -> Self {
        self.format = format;
        self
    }

    /// Renders the statement text and its ordered arguments.
    pub fn to_sql(&self) -> QueryResult<(String, Vec<Value>)> {
        if self.columns.is_empty() {
            return Err(QueryError::NoColumns);
        }

        let mut sql = format!("SELECT {}", self.columns.join(", "));
        let mut args = Vec::new();

        if let Some(table) = &self.from {
            sql.push_str(" FROM ");
            sql.push_str(table);
        }

        if !self.predicates.is_empty() {
            let mut clauses = Vec::with_capacity(self.predicates.len());
            for predicate in &self.predicates {
                let placeholders = count_placeholders(&predicate.sql);
                if placeholders != predicate.args.len() {
                    return Err(QueryError::ArgumentCount {
                        predicate: predicate.sql.clone(),
                        placeholders,
                        args: predicate.args.len(),
                    });
                }
                if self.predicates.len() > 1 {
                    clauses.push(format!("({})", predicate.sql));
                } else {
                    clauses.push(predicate.sql.clone());
                }
                args.extend(predicate.args.iter().cloned());
            }
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        Ok((self.format.replace_placeholders(&sql), args))
    }
}
