//! Remote schema adapter contract.
//!
//! The core depends only on the two operations below; everything
//! driver-specific (connections, credentials, reconnects) is an adapter
//! concern. [`postgres::PgAdapter`] is the reference implementation.

pub mod postgres;

use async_trait::async_trait;
use serde::Deserialize;

use crate::model::{ActualSchema, SchemaDiff, TableMeta};
use crate::util::{Result, SchemaError};

pub use postgres::PgAdapter;

/// Pluggable boundary between the reconciliation core and a concrete
/// database.
#[async_trait]
pub trait SchemaAdapter: Send + Sync {
    /// Snapshots the named table's current columns, keyed by lowercased
    /// column name. A table that does not exist is an empty map, not an
    /// error.
    async fn discover_schema(&self, table: &str) -> Result<ActualSchema>;

    /// Ensures the table exists (creating a minimal placeholder table with
    /// an auto-generated filler column if not), then adds one column per
    /// diff entry. Composite entries are skipped. No retries; a failure
    /// mid-way may leave earlier columns applied.
    async fn update_schema(&self, table: &TableMeta, diff: &SchemaDiff) -> Result<()>;
}

/// Connection settings for the reference adapter, supplied by the embedding
/// application rather than discovered at use time.
#[derive(Debug, Clone, Deserialize)]
pub struct AdapterConfig {
    pub url: String,
    /// Namespace to introspect and alter. Defaults to the connection's
    /// default search path when unset.
    #[serde(default)]
    pub schema: Option<String>,
}

impl AdapterConfig {
    pub fn new(url: impl Into<String>) -> Self {
        AdapterConfig {
            url: url.into(),
            schema: None,
        }
    }

    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Reads `REFORGE_DATABASE_URL` and optional `REFORGE_SCHEMA`. A missing
    /// URL is a configuration error surfaced immediately, never deferred to
    /// first use.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("REFORGE_DATABASE_URL").map_err(|_| {
            SchemaError::Config(
                "REFORGE_DATABASE_URL is not set; the registry requires an adapter".to_string(),
            )
        })?;
        let schema = std::env::var("REFORGE_SCHEMA").ok();
        Ok(AdapterConfig { url, schema })
    }
}
