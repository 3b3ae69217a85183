//! Convenient re-exports for common reforge usage.
//!
//! # Example
//!
//! ```no_run
//! use reforge::prelude::*;
//!
//! let record = RecordDef::new("User")
//!     .field("id", SemanticType::Integer)
//!     .field("name", SemanticType::Text);
//!
//! let mut registry = Registry::from_env_blocking().unwrap();
//! registry.register_blocking(TableMeta::new(record)).unwrap();
//! ```

pub use crate::adapter::{AdapterConfig, PgAdapter, SchemaAdapter};
pub use crate::diff::diff_schemas;
pub use crate::model::{
    ActualSchema, ColumnType, ExpectedSchema, FieldDef, FieldMeta, IndexColumn, RecordDef,
    SchemaDiff, SemanticType, TableMeta,
};
pub use crate::registry::Registry;
pub use crate::schema::{build_schema, collect_indexes, resolve_field};
pub use crate::util::{Result, SchemaError};
