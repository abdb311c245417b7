//! Tabular cache abstraction.
//!
//! The cache only supports filtered reads and appends. Rows are never updated
//! or deleted; a later run appends fresh facts next to the old ones.

use async_trait::async_trait;
use dif_common::Row;
use serde_json::Value;

use crate::error::{DbError, Result};
use crate::schema::{CacheTable, ColumnKind};

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Rows of `table` whose columns equal every `(column, value)` filter,
    /// in insertion order.
    async fn find(&self, table: CacheTable, filters: &[(&str, &str)]) -> Result<Vec<Row>>;

    /// Append rows to `table`. Returns the number of rows written.
    async fn append(&self, table: CacheTable, rows: &[Row]) -> Result<usize>;
}

pub(crate) fn check_filters(table: CacheTable, filters: &[(&str, &str)]) -> Result<()> {
    for (column, _) in filters {
        if table.column_kind(column).is_none() {
            return Err(DbError::UnknownColumn {
                table: table.name(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Project a row onto the table layout: unknown keys are rejected, missing
/// columns become null and list values are `|`-joined.
pub(crate) fn normalise_row(table: CacheTable, row: &Row) -> Result<Row> {
    if let Some(column) = row.keys().find(|k| table.column_kind(k).is_none()) {
        return Err(DbError::UnknownColumn {
            table: table.name(),
            column: column.clone(),
        });
    }

    let mut out = Row::new();
    for (column, kind) in table.columns() {
        let value = row.get(column).cloned().unwrap_or(Value::Null);
        out.insert(column.to_string(), coerce(value, kind));
    }
    Ok(out)
}

fn coerce(value: Value, kind: ColumnKind) -> Value {
    match (value, kind) {
        (Value::Array(items), _) => {
            let joined = items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("|");
            Value::String(joined)
        }
        (Value::Object(map), _) => Value::String(Value::Object(map).to_string()),
        (Value::Number(n), ColumnKind::Bool) => Value::Bool(n.as_i64().unwrap_or(0) != 0),
        (Value::String(s), ColumnKind::Bool) => Value::Bool(s.eq_ignore_ascii_case("true")),
        (Value::String(s), ColumnKind::Integer) => match s.trim().parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(s),
        },
        (value, _) => value,
    }
}

/// Text form used when matching filter values.
pub(crate) fn filter_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
