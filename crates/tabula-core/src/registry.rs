//! # Entity Registry
//!
//! Maps entity types to tables before a repository is built.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Registration Flow                                  │
//! │                                                                         │
//! │  Registry::new()                                                       │
//! │       │                                                                 │
//! │       ├── .register::<EntitySample>()      → entity_sample (id)        │
//! │       ├── .register_as::<Invoice>("bills") → bills (id)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Repo::new(config, registry)  ← registry is moved in, then frozen      │
//! │                                                                         │
//! │  Every table is keyed on `id`, never auto-incremented: identifiers     │
//! │  are generated on create when the entity does not carry one.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::any::TypeId;
use std::collections::HashMap;

use crate::entity::Entity;
use crate::naming::{self, NameMapper};
use crate::KEY_COLUMN;

// =============================================================================
// Table Map
// =============================================================================

/// Table metadata recorded for one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMap {
    /// Short name of the mapped Rust type.
    pub type_name: &'static str,
    /// Table the type is stored in.
    pub table_name: String,
    /// Primary key column.
    pub key_column: String,
    /// Whether the database generates keys. Always false for registered entities.
    pub auto_increment: bool,
}

// =============================================================================
// Registry
// =============================================================================

/// The set of entity types a repository can persist.
#[derive(Debug, Clone)]
pub struct Registry {
    tables: HashMap<TypeId, TableMap>,
    name_mapper: NameMapper,
}

impl Default for Registry {
    fn default() -> Self {
        Registry {
            tables: HashMap::new(),
            name_mapper: naming::to_snake_case,
        }
    }
}

impl Registry {
    /// Creates an empty registry using snake_case names.
    pub fn new() -> Self {
        Registry::default()
    }

    /// Replaces the name conversion rule for tables and columns.
    ///
    /// Only affects types registered afterwards; columns always use the
    /// current rule.
    pub fn with_name_mapper(mut self, mapper: NameMapper) -> Self {
        self.name_mapper = mapper;
        self
    }

    /// Maps `T` to the table named after its type.
    pub fn register<T: Entity>(self) -> Self {
        let table = (self.name_mapper)(T::type_name());
        self.register_as::<T>(table)
    }

    /// Maps `T` to an explicit table name.
    pub fn register_as<T: Entity>(mut self, table: impl Into<String>) -> Self {
        let map = TableMap {
            type_name: T::type_name(),
            table_name: table.into(),
            key_column: (self.name_mapper)(KEY_COLUMN),
            auto_increment: false,
        };
        self.tables.insert(TypeId::of::<T>(), map);
        self
    }

    /// Returns the table mapping for `T`, if registered.
    pub fn table_for<T: 'static>(&self) -> Option<&TableMap> {
        self.tables.get(&TypeId::of::<T>())
    }

    /// Converts a field name to its column name.
    pub fn column_name(&self, field: &str) -> String {
        (self.name_mapper)(field)
    }

    /// Iterates over every registered table.
    pub fn tables(&self) -> impl Iterator<Item = &TableMap> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
