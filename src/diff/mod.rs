//! Expected-vs-actual schema comparison.

use std::collections::BTreeSet;

use crate::model::{ActualSchema, ExpectedSchema, SchemaDiff};

/// Computes the columns present in `expected` but absent from `actual`.
///
/// Presence is judged by case-insensitive column name only; adapters may
/// report differently-cased names than the in-process declaration. A column
/// present under any type satisfies the expectation, so the result never
/// flags type or index mismatches. Metadata is copied from `expected`
/// unchanged.
pub fn diff_schemas(expected: &ExpectedSchema, actual: &ActualSchema) -> SchemaDiff {
    let actual_columns: BTreeSet<String> =
        actual.keys().map(|name| name.to_lowercase()).collect();

    expected
        .iter()
        .filter(|(column, _)| !actual_columns.contains(&column.to_lowercase()))
        .map(|(column, meta)| (column.clone(), meta.clone()))
        .collect()
}
