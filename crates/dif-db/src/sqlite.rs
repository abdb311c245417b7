//! SQLite-backed cache.

use async_trait::async_trait;
use dif_common::Row;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

use crate::error::{DbError, Result};
use crate::schema::{CacheTable, ColumnKind};
use crate::store::{check_filters, normalise_row, CacheStore};

/// Cache handle over a single SQLite connection.
///
/// Open it once at process start and pass it to the resolver and ranker.
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    /// Open or create the cache file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "Opened cache database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let cache = Self { conn: Mutex::new(conn) };
        cache.initialize()?;
        Ok(cache)
    }

    /// Create missing tables.
    fn initialize(&self) -> Result<()> {
        let conn = self.lock()?;
        for table in CacheTable::ALL {
            let columns = table
                .columns()
                .iter()
                .map(|(name, kind)| format!("\"{}\" {}", name, kind.sql_type()))
                .collect::<Vec<_>>()
                .join(", ");
            conn.execute(
                &format!(
                    "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY AUTOINCREMENT, {})",
                    table.name(),
                    columns
                ),
                [],
            )?;
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Lock)
    }
}

#[async_trait]
impl CacheStore for SqliteCache {
    #[instrument(skip_all, fields(table = %table))]
    async fn find(&self, table: CacheTable, filters: &[(&str, &str)]) -> Result<Vec<Row>> {
        check_filters(table, filters)?;
        let columns = table.columns();

        let select = columns
            .iter()
            .map(|(name, _)| format!("\"{}\"", name))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("SELECT {} FROM {}", select, table.name());
        if !filters.is_empty() {
            let clause = filters
                .iter()
                .enumerate()
                .map(|(i, (column, _))| format!("\"{}\" = ?{}", column, i + 1))
                .collect::<Vec<_>>()
                .join(" AND ");
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }
        sql.push_str(" ORDER BY id");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(filters.iter().map(|(_, v)| *v)), |row| {
                let mut out = Row::new();
                for (i, (name, kind)) in columns.iter().enumerate() {
                    out.insert(name.to_string(), read_value(row.get_ref(i)?, *kind));
                }
                Ok(out)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(rows = rows.len(), "Cache lookup");
        Ok(rows)
    }

    #[instrument(skip_all, fields(table = %table, rows = rows.len()))]
    async fn append(&self, table: CacheTable, rows: &[Row]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        let normalised = rows
            .iter()
            .map(|r| normalise_row(table, r))
            .collect::<Result<Vec<_>>>()?;

        let columns = table.columns();
        let names = columns
            .iter()
            .map(|(name, _)| format!("\"{}\"", name))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("INSERT INTO {} ({}) VALUES ({})", table.name(), names, placeholders);

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in &normalised {
                let values = columns
                    .iter()
                    .map(|(name, _)| write_value(row.get(*name).unwrap_or(&Value::Null)));
                stmt.execute(params_from_iter(values))?;
            }
        }
        tx.commit()?;

        debug!("Appended rows to cache");
        Ok(normalised.len())
    }
}

fn write_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn read_value(value: ValueRef<'_>, kind: ColumnKind) -> Value {
    match (value, kind) {
        (ValueRef::Null, _) => Value::Null,
        (ValueRef::Integer(i), ColumnKind::Bool) => Value::Bool(i != 0),
        (ValueRef::Integer(i), _) => Value::from(i),
        (ValueRef::Real(f), _) => Value::from(f),
        (ValueRef::Text(t), _) | (ValueRef::Blob(t), _) => {
            Value::String(String::from_utf8_lossy(t).into_owned())
        }
    }
}
