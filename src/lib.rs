//! reforge - additive schema reconciliation for model-defined tables.
//!
//! Record definitions declare the column set a backing table should have.
//! This crate compares that expected schema against the live table (through a
//! pluggable adapter) and issues strictly additive changes: a placeholder
//! table on first contact, then one ADD COLUMN per missing column. Columns
//! are never altered, renamed, or dropped.
//!
//! # Quick Start
//!
//! ```no_run
//! use reforge::prelude::*;
//!
//! let record = RecordDef::new("OrderLineItem")
//!     .field("id", SemanticType::Integer)
//!     .field("description", SemanticType::Text);
//!
//! let mut registry = Registry::from_env_blocking().unwrap();
//! registry.register_blocking(TableMeta::new(record)).unwrap();
//! ```
//!
//! # Modules
//!
//! - [`model`] - Record definitions, field metadata, column classifications
//! - [`schema`] - Expected-schema construction from record definitions
//! - [`diff`] - Expected-vs-actual schema comparison
//! - [`adapter`] - Remote schema adapter contract and Postgres reference implementation
//! - [`registry`] - Registration and reconciliation orchestration

pub mod adapter;
pub mod diff;
pub mod model;
pub mod prelude;
pub mod registry;
pub mod schema;
pub mod util;
