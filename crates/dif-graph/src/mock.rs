//! Canned-response graph store for tests.

use async_trait::async_trait;
use dif_common::{Result, Row};
use std::sync::Mutex;

use crate::store::GraphStore;

/// Graph store answering from canned rows.
///
/// A query gets the rows of the first registered fragment it contains;
/// anything else gets "no results". Every executed query is recorded.
pub struct MockGraphStore {
    responses: Vec<(String, Vec<Row>)>,
    queries: Mutex<Vec<String>>,
}

impl MockGraphStore {
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Answer queries containing `fragment` with `rows`.
    pub fn with_response(mut self, fragment: &str, rows: Vec<Row>) -> Self {
        self.responses.push((fragment.to_string(), rows));
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().map(|q| q.len()).unwrap_or(0)
    }
}

impl Default for MockGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn execute(&self, query: &str) -> Result<Option<Vec<Row>>> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }
        Ok(self
            .responses
            .iter()
            .find(|(fragment, _)| query.contains(fragment.as_str()))
            .map(|(_, rows)| rows.clone())
            .filter(|rows| !rows.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_first_matching_fragment_wins() {
        let row = json!({"number": 3}).as_object().cloned().unwrap();
        let mock = MockGraphStore::new()
            .with_response("in.name = 'GSK3B'", vec![row.clone()])
            .with_response("GSK3B", vec![]);

        let hit = mock.execute("SELECT ... WHERE in.name = 'GSK3B'").await.unwrap();
        assert_eq!(hit, Some(vec![row]));
        assert_eq!(mock.execute("WHERE out.name = 'GSK3B'").await.unwrap(), None);
        assert_eq!(mock.execute("unrelated").await.unwrap(), None);
        assert_eq!(mock.call_count(), 3);
    }
}
