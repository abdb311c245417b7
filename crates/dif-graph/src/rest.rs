//! HTTP client for the graph store's SQL command endpoint.
//!
//! Endpoint: `{url}/command/{database}/sql`, body `{"command": "<query>"}`.
//! The response carries rows under `result`; keys starting with `@` are
//! record metadata and are dropped.

use async_trait::async_trait;
use dif_common::config::GraphStoreConfig;
use dif_common::{DifError, Result, Row};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::store::GraphStore;

pub struct RestGraphStore {
    client: Client,
    endpoint: String,
    user: Option<String>,
    password: Option<String>,
}

impl RestGraphStore {
    pub fn new(config: &GraphStoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}/command/{}/sql",
                config.url.trim_end_matches('/'),
                config.database
            ),
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GraphStore for RestGraphStore {
    #[instrument(skip(self, query), fields(endpoint = %self.endpoint))]
    async fn execute(&self, query: &str) -> Result<Option<Vec<Row>>> {
        debug!(query, "Querying graph store");

        let mut request = self.client.post(&self.endpoint).json(&json!({ "command": query }));
        if let Some(user) = &self.user {
            request = request.basic_auth(user, self.password.as_ref());
        }

        let body: Value = request.send().await?.error_for_status()?.json().await?;
        let rows = parse_result(body)?;
        if rows.is_empty() {
            warn!("Graph store returned no results");
            return Ok(None);
        }
        debug!(rows = rows.len(), "Graph store rows received");
        Ok(Some(rows))
    }
}

fn parse_result(body: Value) -> Result<Vec<Row>> {
    let Value::Object(mut body) = body else {
        return Err(DifError::Graph("response is not a JSON object".into()));
    };
    let rows = match body.remove("result") {
        Some(Value::Array(rows)) => rows,
        Some(Value::Null) | None => return Ok(Vec::new()),
        Some(other) => {
            return Err(DifError::Graph(format!("unexpected result payload: {other}")));
        }
    };
    Ok(rows
        .into_iter()
        .filter_map(|row| match row {
            Value::Object(map) => Some(map.into_iter().filter(|(k, _)| !k.starts_with('@')).collect()),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_result_strips_record_metadata() {
        let rows = parse_result(json!({
            "result": [
                {"@rid": "#12:0", "@version": 1, "drug": "Lithium", "pmid": 42},
                {"@type": "d", "drug": "Tideglusib"}
            ]
        }))
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0]["drug"], json!("Lithium"));
        assert!(!rows[1].contains_key("@type"));
    }

    #[test]
    fn test_parse_result_empty_and_malformed() {
        assert!(parse_result(json!({"result": []})).unwrap().is_empty());
        assert!(parse_result(json!({})).unwrap().is_empty());
        assert!(parse_result(json!([1, 2])).is_err());
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = GraphStoreConfig {
            url: "https://graph.example.org/".into(),
            ..GraphStoreConfig::default()
        };
        let store = RestGraphStore::new(&config).unwrap();
        assert_eq!(store.endpoint(), "https://graph.example.org/command/pharmacome/sql");
    }
}
