//! # Entity Contract
//!
//! The unit of persistence and the values it maps to columns.
//!
//! ## Row Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Entity → Row                                         │
//! │                                                                         │
//! │  struct EntitySample {            fields()                             │
//! │      id: String,        ───────►  Field { "id",      Text("9f1c…") }   │
//! │      enabled: bool,     ───────►  Field { "enabled", Bool(false) }     │
//! │      created: DateTime, ───────►  Field { "created", Timestamp(…) }    │
//! │  }                                                                      │
//! │                                       │ name mapper (snake_case)       │
//! │                                       ▼                                 │
//! │                         entity_sample (id, enabled, created)           │
//! │                                                                         │
//! │  Reading goes the other way through sqlx::FromRow (derived).           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::naming;

// =============================================================================
// Entity
// =============================================================================

/// A persistable value with a string identifier.
///
/// Implementors list every mapped field, the identifier included, in
/// [`Entity::fields`]. Field names are converted to column names by the
/// registry's name mapper.
///
/// ## Example
/// ```rust
/// use tabula_core::{Entity, Field};
///
/// #[derive(Debug, Default)]
/// struct Note {
///     id: String,
///     body: String,
/// }
///
/// impl Entity for Note {
///     fn id(&self) -> &str {
///         &self.id
///     }
///
///     fn set_id(&mut self, id: String) {
///         self.id = id;
///     }
///
///     fn fields(&self) -> Vec<Field> {
///         vec![Field::new("id", &self.id), Field::new("body", &self.body)]
///     }
/// }
///
/// assert_eq!(Note::type_name(), "Note");
/// ```
pub trait Entity: Send + Sync + 'static {
    /// Returns the identifier; empty when not yet assigned.
    fn id(&self) -> &str;

    /// Assigns the identifier.
    fn set_id(&mut self, id: String);

    /// Returns every mapped field with its current value.
    fn fields(&self) -> Vec<Field>;

    /// Called right before the row is inserted, after the id is assigned.
    fn pre_insert(&mut self) {}

    /// Called right before the row is updated.
    fn pre_update(&mut self) {}

    /// Short type name, used to derive the default table name.
    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        naming::short_type_name::<Self>()
    }
}

// =============================================================================
// Field
// =============================================================================

/// A named field value as produced by [`Entity::fields`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub value: Value,
}

impl Field {
    /// Creates a field from anything convertible into a [`Value`].
    pub fn new(name: &'static str, value: impl Into<Value>) -> Self {
        Field {
            name,
            value: value.into(),
        }
    }
}

// =============================================================================
// Value
// =============================================================================

/// A bindable column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<&DateTime<Utc>> for Value {
    fn from(v: &DateTime<Utc>) -> Self {
        Value::Timestamp(*v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
