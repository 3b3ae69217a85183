//! Expected-schema construction: resolve each field of a record definition to
//! column metadata and assemble the column map.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{ExpectedSchema, FieldDef, FieldMeta, IndexColumn, RecordDef};
use crate::util::{Result, SchemaError};

/// Reserved annotation key holding a serialized [`FieldMeta`].
pub const PERSIST_KEY: &str = "persist";

/// Resolves one field to its column metadata.
///
/// Precedence: explicit `meta` on the field, then a `"persist"` annotation
/// entry, then derivation from the declared name and type. The field itself
/// is never modified.
pub fn resolve_field(field: &FieldDef) -> Result<FieldMeta> {
    if let Some(meta) = &field.meta {
        return Ok(meta.clone());
    }

    if let Some(value) = field.annotations.get(PERSIST_KEY) {
        return serde_json::from_value(value.clone()).map_err(|e| {
            SchemaError::Config(format!(
                "Malformed \"{PERSIST_KEY}\" annotation on field \"{}\": {e}",
                field.name
            ))
        });
    }

    Ok(FieldMeta::new(field.name.clone(), field.ty.column_type()))
}

/// Builds the expected schema for a record definition.
///
/// Fields are resolved in declaration order. Two fields resolving to the same
/// column name (case-insensitively) abort the build; nothing is silently
/// overwritten. The result is assembled fresh on every call so it always
/// reflects the current field declarations.
pub fn build_schema(record: &RecordDef) -> Result<ExpectedSchema> {
    let mut schema = ExpectedSchema::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();

    for field in &record.fields {
        let meta = resolve_field(field)?;
        if !seen.insert(meta.column.to_lowercase()) {
            return Err(SchemaError::DuplicateColumn {
                record: record.name.clone(),
                column: meta.column,
            });
        }
        schema.insert(meta.column.clone(), meta);
    }

    Ok(schema)
}

/// Aggregates per-field index memberships into a table-level index map.
///
/// An index name prefixed with `-` enrolls the column in descending order;
/// the prefix is stripped from the index name. Columns appear in schema
/// iteration order within each index.
pub fn collect_indexes(schema: &ExpectedSchema) -> BTreeMap<String, Vec<IndexColumn>> {
    let mut indexes: BTreeMap<String, Vec<IndexColumn>> = BTreeMap::new();

    for meta in schema.values() {
        for index_name in &meta.indexes {
            let (name, descending) = match index_name.strip_prefix('-') {
                Some(stripped) => (stripped.to_string(), true),
                None => (index_name.clone(), false),
            };
            indexes.entry(name).or_default().push(IndexColumn {
                column: meta.column.clone(),
                descending,
            });
        }
    }

    indexes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColumnType, SemanticType};

    #[test]
    fn derives_column_from_field_name_and_type() {
        let record = RecordDef::new("User")
            .field("id", SemanticType::Integer)
            .field("name", SemanticType::Text);

        let schema = build_schema(&record).unwrap();
        assert_eq!(
            schema.keys().collect::<Vec<_>>(),
            vec!["id", "name"]
        );
        assert_eq!(schema["id"].db_type, ColumnType::Number);
        assert_eq!(schema["name"].db_type, ColumnType::Varchar);
        assert!(schema["id"].indexes.is_empty());
    }

    #[test]
    fn explicit_meta_wins_over_derivation() {
        let meta = FieldMeta::new("nm", ColumnType::Varchar)
            .with_indexes(vec!["by_name".to_string()]);
        let record = RecordDef::new("User").field_with_meta(
            "name",
            SemanticType::Text,
            meta.clone(),
        );

        let schema = build_schema(&record).unwrap();
        assert!(!schema.contains_key("name"));
        assert_eq!(schema["nm"], meta);
    }

    #[test]
    fn persist_annotation_is_used_when_no_explicit_meta() {
        let mut annotations = BTreeMap::new();
        annotations.insert(
            PERSIST_KEY.to_string(),
            serde_json::json!({
                "column": "em",
                "db_type": "Varchar",
                "indexes": ["by_email"],
            }),
        );
        let record = RecordDef::new("User").field_with_annotations(
            "email",
            SemanticType::Text,
            annotations,
        );

        let schema = build_schema(&record).unwrap();
        assert_eq!(schema["em"].indexes, vec!["by_email".to_string()]);
    }

    #[test]
    fn malformed_persist_annotation_is_an_error() {
        let mut annotations = BTreeMap::new();
        annotations.insert(PERSIST_KEY.to_string(), serde_json::json!(42));
        let record = RecordDef::new("User").field_with_annotations(
            "email",
            SemanticType::Text,
            annotations,
        );

        let err = build_schema(&record).unwrap_err();
        assert!(err.to_string().contains("persist"));
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn duplicate_column_names_abort_the_build() {
        let record = RecordDef::new("User")
            .field("name", SemanticType::Text)
            .field_with_meta(
                "display_name",
                SemanticType::Text,
                FieldMeta::new("name", ColumnType::Varchar),
            );

        let err = build_schema(&record).unwrap_err();
        assert!(
            matches!(err, SchemaError::DuplicateColumn { ref record, ref column }
                if record == "User" && column == "name")
        );
    }

    #[test]
    fn duplicate_detection_is_case_insensitive() {
        let record = RecordDef::new("User")
            .field("Name", SemanticType::Text)
            .field("name", SemanticType::Text);

        assert!(build_schema(&record).is_err());
    }

    #[test]
    fn collect_indexes_groups_by_name_and_decodes_descending_prefix() {
        let record = RecordDef::new("Event")
            .field_with_meta(
                "occurred_at",
                SemanticType::DateTime,
                FieldMeta::new("occurred_at", ColumnType::Timestamp)
                    .with_indexes(vec!["-by_time".to_string()]),
            )
            .field_with_meta(
                "kind",
                SemanticType::Text,
                FieldMeta::new("kind", ColumnType::Varchar)
                    .with_indexes(vec!["by_time".to_string(), "by_kind".to_string()]),
            );

        let schema = build_schema(&record).unwrap();
        let indexes = collect_indexes(&schema);

        assert_eq!(indexes.len(), 2);
        let by_time = &indexes["by_time"];
        assert_eq!(by_time.len(), 2);
        assert!(by_time.iter().any(|c| c.column == "occurred_at" && c.descending));
        assert!(by_time.iter().any(|c| c.column == "kind" && !c.descending));
        assert_eq!(indexes["by_kind"].len(), 1);
    }

    #[test]
    fn build_is_fresh_per_call() {
        let mut record = RecordDef::new("User").field("id", SemanticType::Integer);
        assert_eq!(build_schema(&record).unwrap().len(), 1);

        record = record.field("name", SemanticType::Text);
        assert_eq!(build_schema(&record).unwrap().len(), 2);
    }
}
