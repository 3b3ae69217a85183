//! Reference adapter: PostgreSQL over sqlx.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres, Row};

use crate::adapter::{AdapterConfig, SchemaAdapter};
use crate::model::{ActualSchema, ColumnType, FieldMeta, SchemaDiff, TableMeta};
use crate::util::{Result, SchemaError};

pub struct PgAdapter {
    pool: Pool<Postgres>,
    schema: String,
}

impl PgAdapter {
    pub async fn connect(config: &AdapterConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&config.url)
            .await
            .map_err(|e| SchemaError::Database(format!("Failed to connect: {e}")))?;
        tracing::debug!(schema = config.schema.as_deref().unwrap_or("public"), "connected");

        Ok(PgAdapter {
            pool,
            schema: config.schema.clone().unwrap_or_else(|| "public".to_string()),
        })
    }

    /// Reads connection settings from the environment. Fails fast with a
    /// configuration error when they are absent.
    pub async fn from_env() -> Result<Self> {
        let config = AdapterConfig::from_env()?;
        Self::connect(&config).await
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    async fn table_exists(&self, table: &str) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = $1 AND table_name = $2
            ) AS present
            "#,
        )
        .bind(&self.schema)
        .bind(table.to_lowercase())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            SchemaError::Database(format!("Failed to check table \"{table}\": {e}"))
        })?;

        Ok(row.get("present"))
    }

    fn qualified(&self, table: &str) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(&table.to_lowercase()))
    }
}

#[async_trait]
impl SchemaAdapter for PgAdapter {
    async fn discover_schema(&self, table: &str) -> Result<ActualSchema> {
        let rows = sqlx::query(
            r#"
            SELECT column_name, data_type
            FROM information_schema.columns
            WHERE table_schema = $1 AND table_name = $2
            ORDER BY ordinal_position
            "#,
        )
        .bind(&self.schema)
        .bind(table.to_lowercase())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            SchemaError::Database(format!("Failed to introspect \"{table}\": {e}"))
        })?;

        let mut schema = ActualSchema::new();
        for row in rows {
            let name: String = row.get("column_name");
            let data_type: String = row.get("data_type");
            let name = name.to_lowercase();
            schema.insert(
                name.clone(),
                FieldMeta::new(name, column_type_from_remote(&data_type)),
            );
        }

        Ok(schema)
    }

    async fn update_schema(&self, table: &TableMeta, diff: &SchemaDiff) -> Result<()> {
        if !self.table_exists(&table.table).await? {
            // Placeholder table; callers expect the filler column.
            let sql = format!(
                "CREATE TABLE {} (reforge_placeholder integer)",
                self.qualified(&table.table)
            );
            tracing::debug!(%sql, "creating table");
            sqlx::query(&sql).execute(&self.pool).await.map_err(|e| {
                SchemaError::Database(format!(
                    "Failed to create table \"{}\": {e}",
                    table.table
                ))
            })?;
        }

        for (column, meta) in diff {
            if let ColumnType::Composite(_) = meta.db_type {
                tracing::debug!(%column, "skipping composite column");
                continue;
            }
            let sql = format!(
                "ALTER TABLE {} ADD COLUMN {} {}",
                self.qualified(&table.table),
                quote_ident(&column.to_lowercase()),
                meta.db_type.sql_type()
            );
            tracing::debug!(%sql, "adding column");
            sqlx::query(&sql).execute(&self.pool).await.map_err(|e| {
                SchemaError::Database(format!(
                    "Failed to add column \"{column}\" to \"{}\": {e}",
                    table.table
                ))
            })?;
        }

        Ok(())
    }
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn column_type_from_remote(data_type: &str) -> ColumnType {
    match data_type.to_lowercase().as_str() {
        "character varying" | "varchar" | "text" | "character" | "char" => ColumnType::Varchar,
        "boolean" => ColumnType::Boolean,
        "date" | "timestamp without time zone" | "timestamp with time zone" | "timestamp" => {
            ColumnType::Timestamp
        }
        "numeric" | "integer" | "bigint" | "smallint" | "real" | "double precision" => {
            ColumnType::Number
        }
        other => ColumnType::Raw(other.to_string()),
    }
}
