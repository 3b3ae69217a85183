use inflector::Inflector;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Duplicate column \"{column}\" in record \"{record}\"")]
    DuplicateColumn { record: String, column: String },

    #[error("Database error: {0}")]
    Database(String),
}

pub type Result<T> = std::result::Result<T, SchemaError>;

/// Derives the default table name for a record type name: snake_case the
/// name, then pluralize only the final segment. `OrderLineItem` becomes
/// `order_line_items`.
pub fn table_name_for(type_name: &str) -> String {
    let snake = type_name.to_snake_case();
    let mut segments: Vec<String> = snake.split('_').map(str::to_string).collect();
    if let Some(last) = segments.last_mut() {
        *last = last.to_plural();
    }
    segments.join("_")
}
