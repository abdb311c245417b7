//! In-process cache used by tests and throwaway runs.

use async_trait::async_trait;
use dif_common::Row;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{DbError, Result};
use crate::schema::CacheTable;
use crate::store::{check_filters, filter_text, normalise_row, CacheStore};

#[derive(Default)]
pub struct MemoryCache {
    tables: Mutex<HashMap<CacheTable, Vec<Row>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held in `table`.
    pub fn len(&self, table: CacheTable) -> usize {
        self.tables
            .lock()
            .map(|t| t.get(&table).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, table: CacheTable) -> bool {
        self.len(table) == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn find(&self, table: CacheTable, filters: &[(&str, &str)]) -> Result<Vec<Row>> {
        check_filters(table, filters)?;
        let tables = self.tables.lock().map_err(|_| DbError::Lock)?;
        let rows = tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        filters.iter().all(|(column, expected)| {
                            row.get(*column)
                                .and_then(filter_text)
                                .is_some_and(|actual| actual == *expected)
                        })
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(rows)
    }

    async fn append(&self, table: CacheTable, rows: &[Row]) -> Result<usize> {
        let normalised = rows
            .iter()
            .map(|r| normalise_row(table, r))
            .collect::<Result<Vec<_>>>()?;
        let count = normalised.len();
        self.tables
            .lock()
            .map_err(|_| DbError::Lock)?
            .entry(table)
            .or_default()
            .extend(normalised);
        Ok(count)
    }
}
