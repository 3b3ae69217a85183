use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::util::table_name_for;

/// Semantic type tag carried by a field declaration.
///
/// Records declare what a field *means* rather than a database type; the
/// mapping to a column classification happens in [`SemanticType::column_type`].
/// `Other` is the escape hatch for types the closed set does not cover: it
/// carries the literal type name so adapters can special-case or reject it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SemanticType {
    Text,
    Boolean,
    Date,
    DateTime,
    Integer,
    Float,
    Decimal,
    List(Box<SemanticType>),
    Map(Box<SemanticType>, Box<SemanticType>),
    /// A nested record definition, referenced by its type name.
    Record(String),
    /// Any type outside the closed set, by its literal name.
    Other(String),
}

/// Database column classification an adapter materializes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ColumnType {
    Varchar,
    Boolean,
    Timestamp,
    Number,
    /// A nested record type. Adapters skip these rather than auto-materialize
    /// a composite column.
    Composite(String),
    /// An unrecognized type, preserved verbatim for the adapter to interpret.
    Raw(String),
}

impl SemanticType {
    /// Classifies this semantic type as a database column type.
    ///
    /// Total over all declarable types: container types collapse to their
    /// container kind (the element types are irrelevant, the value is stored
    /// serialized), and anything unrecognized falls through to [`ColumnType::Raw`]
    /// rather than erroring.
    pub fn column_type(&self) -> ColumnType {
        match self {
            SemanticType::List(_) | SemanticType::Map(_, _) => ColumnType::Varchar,
            SemanticType::Boolean => ColumnType::Boolean,
            SemanticType::Date | SemanticType::DateTime => ColumnType::Timestamp,
            SemanticType::Text => ColumnType::Varchar,
            SemanticType::Integer | SemanticType::Float | SemanticType::Decimal => {
                ColumnType::Number
            }
            SemanticType::Record(name) => ColumnType::Composite(name.clone()),
            SemanticType::Other(name) => ColumnType::Raw(name.clone()),
        }
    }
}

impl ColumnType {
    /// The database-native type name used when adding a column.
    pub fn sql_type(&self) -> &str {
        match self {
            ColumnType::Varchar => "varchar",
            ColumnType::Boolean => "boolean",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Number => "numeric",
            ColumnType::Composite(name) => name,
            ColumnType::Raw(name) => name,
        }
    }
}

/// Resolved column-level metadata for one field.
///
/// Usually derived from the field declaration, but authors can supply it
/// explicitly to map a field onto a differently-named column or to enroll
/// the column in indexes. Index names prefixed with `-` mean the column
/// participates in descending order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldMeta {
    pub column: String,
    pub db_type: ColumnType,
    #[serde(default)]
    pub indexes: Vec<String>,
}

impl FieldMeta {
    pub fn new(column: impl Into<String>, db_type: ColumnType) -> Self {
        FieldMeta {
            column: column.into(),
            db_type,
            indexes: Vec::new(),
        }
    }

    pub fn with_indexes(mut self, indexes: Vec<String>) -> Self {
        self.indexes = indexes;
        self
    }
}

/// One named, typed member of a record definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: SemanticType,
    /// Explicit column mapping. Wins unconditionally over derivation.
    pub meta: Option<FieldMeta>,
    /// Free-form annotations. The reserved key `"persist"` may hold a
    /// [`FieldMeta`] in serialized form.
    pub annotations: BTreeMap<String, serde_json::Value>,
}

/// An in-process structured type describing one row's shape.
///
/// Built explicitly by application setup code:
///
/// ```
/// use reforge::model::{RecordDef, SemanticType};
///
/// let record = RecordDef::new("OrderLineItem")
///     .field("id", SemanticType::Integer)
///     .field("description", SemanticType::Text);
/// assert_eq!(record.fields.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl RecordDef {
    pub fn new(name: impl Into<String>) -> Self {
        RecordDef {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, ty: SemanticType) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            meta: None,
            annotations: BTreeMap::new(),
        });
        self
    }

    pub fn field_with_meta(
        mut self,
        name: impl Into<String>,
        ty: SemanticType,
        meta: FieldMeta,
    ) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            meta: Some(meta),
            annotations: BTreeMap::new(),
        });
        self
    }

    pub fn field_with_annotations(
        mut self,
        name: impl Into<String>,
        ty: SemanticType,
        annotations: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            meta: None,
            annotations,
        });
        self
    }
}

/// One column's position inside a table-level index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    pub column: String,
    pub descending: bool,
}

/// Table-level metadata owning one record definition.
///
/// Created once per record definition at registration time. The index map is
/// populated by the registry from the expected schema's per-field index
/// memberships.
#[derive(Debug, Clone)]
pub struct TableMeta {
    pub record: RecordDef,
    pub schema: Option<String>,
    pub table: String,
    pub indexes: BTreeMap<String, Vec<IndexColumn>>,
}

impl TableMeta {
    /// Table name defaults to the pluralized snake_case form of the record
    /// type name.
    pub fn new(record: RecordDef) -> Self {
        let table = table_name_for(&record.name);
        TableMeta {
            record,
            schema: None,
            table,
            indexes: BTreeMap::new(),
        }
    }

    pub fn with_table(record: RecordDef, table: impl Into<String>) -> Self {
        TableMeta {
            record,
            schema: None,
            table: table.into(),
            indexes: BTreeMap::new(),
        }
    }

    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.table),
            None => self.table.clone(),
        }
    }

    /// Placeholder persistence hook. Row-level writes are out of scope.
    pub fn save(&self, row: &serde_json::Value) {
        tracing::debug!(table = %self.table, %row, "save is not implemented");
    }
}

/// Column name to resolved field metadata, as implied by a record definition.
pub type ExpectedSchema = BTreeMap<String, FieldMeta>;

/// Column name to field metadata, as reported by a remote table snapshot.
pub type ActualSchema = BTreeMap<String, FieldMeta>;

/// Columns expected but not yet present remotely.
pub type SchemaDiff = BTreeMap<String, FieldMeta>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_total_over_the_declared_set() {
        let cases = vec![
            (
                SemanticType::List(Box::new(SemanticType::Integer)),
                ColumnType::Varchar,
            ),
            (
                SemanticType::Map(
                    Box::new(SemanticType::Text),
                    Box::new(SemanticType::Text),
                ),
                ColumnType::Varchar,
            ),
            (SemanticType::Boolean, ColumnType::Boolean),
            (SemanticType::Text, ColumnType::Varchar),
            (SemanticType::Date, ColumnType::Timestamp),
            (SemanticType::DateTime, ColumnType::Timestamp),
            (SemanticType::Integer, ColumnType::Number),
            (SemanticType::Float, ColumnType::Number),
            (SemanticType::Decimal, ColumnType::Number),
            (
                SemanticType::Record("Address".to_string()),
                ColumnType::Composite("Address".to_string()),
            ),
            (
                SemanticType::Other("uuid".to_string()),
                ColumnType::Raw("uuid".to_string()),
            ),
        ];

        for (ty, expected) in cases {
            assert_eq!(ty.column_type(), expected);
        }
    }

    #[test]
    fn container_classification_ignores_element_types() {
        let of_bools = SemanticType::List(Box::new(SemanticType::Boolean));
        let of_records = SemanticType::List(Box::new(SemanticType::Record("X".to_string())));
        assert_eq!(of_bools.column_type(), ColumnType::Varchar);
        assert_eq!(of_records.column_type(), ColumnType::Varchar);
    }

    #[test]
    fn raw_type_preserves_literal_name() {
        let ty = SemanticType::Other("geography".to_string());
        assert_eq!(ty.column_type().sql_type(), "geography");
    }

    #[test]
    fn default_table_name_is_pluralized_snake_case() {
        let meta = TableMeta::new(RecordDef::new("OrderLineItem"));
        assert_eq!(meta.table, "order_line_items");
    }

    #[test]
    fn explicit_table_name_wins() {
        let meta = TableMeta::with_table(RecordDef::new("OrderLineItem"), "oli");
        assert_eq!(meta.table, "oli");
    }

    #[test]
    fn qualified_name_includes_schema_when_set() {
        let meta = TableMeta::new(RecordDef::new("User")).in_schema("analytics");
        assert_eq!(meta.qualified_name(), "analytics.users");

        let bare = TableMeta::new(RecordDef::new("User"));
        assert_eq!(bare.qualified_name(), "users");
    }

    #[test]
    fn field_meta_round_trips_through_json() {
        let meta = FieldMeta::new("nm", ColumnType::Varchar)
            .with_indexes(vec!["by_name".to_string()]);
        let value = serde_json::to_value(&meta).unwrap();
        let back: FieldMeta = serde_json::from_value(value).unwrap();
        assert_eq!(back, meta);
    }
}
