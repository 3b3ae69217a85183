//! Registration and reconciliation orchestration.

use crate::adapter::{AdapterConfig, PgAdapter, SchemaAdapter};
use crate::diff::diff_schemas;
use crate::model::TableMeta;
use crate::schema::{build_schema, collect_indexes};
use crate::util::{Result, SchemaError};

/// Explicit reconciliation context: one bound adapter plus the ordered
/// collection of registered table definitions.
///
/// The adapter is required at construction; there is no rebinding or deferred
/// discovery. A `Registry` is not synchronized internally - callers wanting
/// concurrent registration must serialize access themselves.
pub struct Registry {
    adapter: Box<dyn SchemaAdapter>,
    models: Vec<TableMeta>,
}

impl Registry {
    pub fn new(adapter: Box<dyn SchemaAdapter>) -> Self {
        Registry {
            adapter,
            models: Vec::new(),
        }
    }

    /// Builds a registry around the reference adapter, configured from the
    /// environment. Missing configuration is an immediate error.
    pub async fn from_env() -> Result<Self> {
        let config = AdapterConfig::from_env()?;
        let adapter = PgAdapter::connect(&config).await?;
        Ok(Registry::new(Box::new(adapter)))
    }

    /// Registers a table definition, reconciling the remote schema first.
    ///
    /// The expected schema is built fresh, the remote table introspected,
    /// and any missing columns added through the adapter. The definition is
    /// appended whether or not columns were missing, but only once the whole
    /// check has completed without error: a schema ambiguity or adapter
    /// failure leaves the registry untouched.
    pub async fn register(&mut self, mut table: TableMeta) -> Result<()> {
        let expected = build_schema(&table.record)?;
        let actual = self.adapter.discover_schema(&table.table).await?;

        let diff = diff_schemas(&expected, &actual);
        if !diff.is_empty() {
            tracing::info!(
                table = %table.table,
                record = %table.record.name,
                missing = diff.len(),
                "remote schema is not up to date"
            );
            self.adapter.update_schema(&table, &diff).await?;
        }

        table.indexes = collect_indexes(&expected);
        self.models.push(table);
        Ok(())
    }

    /// Registered definitions, in registration order.
    pub fn models(&self) -> &[TableMeta] {
        &self.models
    }

    /// Blocking variant of [`Registry::register`].
    ///
    /// Creates a tokio runtime per call; prefer the async API when a runtime
    /// is already available.
    pub fn register_blocking(&mut self, table: TableMeta) -> Result<()> {
        create_runtime()?.block_on(self.register(table))
    }

    /// Blocking variant of [`Registry::from_env`].
    pub fn from_env_blocking() -> Result<Self> {
        create_runtime()?.block_on(Registry::from_env())
    }
}

fn create_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| SchemaError::Config(format!("Failed to start runtime: {e}")))
}
