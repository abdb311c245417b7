//! Trait for knowledge graph access.
//!
//! The resolver and ranker only need "run this query, give me rows back".
//! Implementations:
//! - [`RestGraphStore`](crate::RestGraphStore): the graph store's HTTP command endpoint
//! - [`MockGraphStore`](crate::MockGraphStore): canned rows for tests

use async_trait::async_trait;
use dif_common::{Result, Row};

#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Execute a query.
    ///
    /// Returns `None` when the query matched nothing. Transport failures are
    /// returned as errors and never retried.
    async fn execute(&self, query: &str) -> Result<Option<Vec<Row>>>;
}

/// Read the first row's integer column, as returned by `count(*)` queries.
pub fn first_count(rows: Option<&[Row]>, column: &str) -> u64 {
    rows.and_then(|r| r.first())
        .and_then(|row| row.get(column))
        .and_then(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
        .unwrap_or(0)
}
