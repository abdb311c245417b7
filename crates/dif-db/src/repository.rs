//! Typed access to the cache tables.

use dif_common::{de, DruggableRecord, InteractorRecord, Result, Row};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::warn;

use crate::schema::CacheTable;
use crate::store::CacheStore;

// ── Metadata rows ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatentRow {
    #[serde(deserialize_with = "de::string")]
    pub drug_name: String,
    #[serde(default)]
    pub has_patent: bool,
    #[serde(default)]
    pub expired: bool,
    /// `|`-joined patent numbers.
    #[serde(default, deserialize_with = "de::string")]
    pub patent_numbers: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRow {
    #[serde(deserialize_with = "de::string")]
    pub drug_name: String,
    #[serde(default)]
    pub has_generic: bool,
    #[serde(default)]
    pub has_approved_generic: bool,
    /// `|`-joined names of generic products.
    #[serde(default, deserialize_with = "de::string")]
    pub generic_products: String,
}

/// One clinical trial of a drug. A row without `trial_id` records that the
/// drug was looked up and has no trials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRow {
    #[serde(default, deserialize_with = "de::string")]
    pub drug_name: String,
    #[serde(deserialize_with = "de::string")]
    pub drugbank_id: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub trial_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub trial_status: Option<String>,
    /// `;`-joined condition names.
    #[serde(default, deserialize_with = "de::string")]
    pub conditions: String,
    /// `|`-joined names of drugs tested in the trial.
    #[serde(default, deserialize_with = "de::string")]
    pub drugs_in_trial: String,
}

impl TrialRow {
    pub fn no_trials(drug_name: &str, drugbank_id: &str) -> Self {
        Self {
            drug_name: drug_name.to_string(),
            drugbank_id: drugbank_id.to_string(),
            trial_id: None,
            trial_status: None,
            conditions: String::new(),
            drugs_in_trial: String::new(),
        }
    }

    pub fn condition_set(&self) -> BTreeSet<String> {
        self.conditions
            .split(';')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeCountRow {
    pub out_count: u64,
    pub in_count: u64,
    pub both_count: u64,
}

#[derive(Serialize, Deserialize)]
struct EdgeCountEntry {
    #[serde(deserialize_with = "de::string")]
    symbol: String,
    #[serde(flatten)]
    counts: EdgeCountRow,
}

// ── Repository ──────────────────────────────────────────────────────────────

/// Typed repository over any [`CacheStore`].
#[derive(Clone)]
pub struct CacheRepository {
    store: Arc<dyn CacheStore>,
}

impl CacheRepository {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Interactor rows stored under a canonical target symbol.
    pub async fn interactors(&self, symbol: &str, target_type: &str) -> Result<Vec<InteractorRecord>> {
        self.find_typed(
            CacheTable::General,
            &[("target_symbol", symbol), ("target_type", target_type)],
        )
        .await
    }

    pub async fn append_interactors(&self, records: &[InteractorRecord]) -> Result<usize> {
        self.append_typed(CacheTable::General, records).await
    }

    pub async fn druggable(&self, symbol: &str, target_type: &str) -> Result<Vec<DruggableRecord>> {
        self.find_typed(
            CacheTable::Druggable,
            &[("target_symbol", symbol), ("target_type", target_type)],
        )
        .await
    }

    pub async fn append_druggable(&self, records: &[DruggableRecord]) -> Result<usize> {
        self.append_typed(CacheTable::Druggable, records).await
    }

    /// Most recently stored patent facts for a drug.
    pub async fn patent(&self, drug_name: &str) -> Result<Option<PatentRow>> {
        let rows: Vec<PatentRow> = self
            .find_typed(CacheTable::Patents, &[("drug_name", drug_name)])
            .await?;
        Ok(rows.into_iter().last())
    }

    pub async fn append_patents(&self, rows: &[PatentRow]) -> Result<usize> {
        self.append_typed(CacheTable::Patents, rows).await
    }

    pub async fn product(&self, drug_name: &str) -> Result<Option<ProductRow>> {
        let rows: Vec<ProductRow> = self
            .find_typed(CacheTable::Products, &[("drug_name", drug_name)])
            .await?;
        Ok(rows.into_iter().last())
    }

    pub async fn append_products(&self, rows: &[ProductRow]) -> Result<usize> {
        self.append_typed(CacheTable::Products, rows).await
    }

    /// Cached trials for a DrugBank id.
    ///
    /// `None` means the drug was never looked up; `Some(vec![])` means it
    /// was and has no trials.
    pub async fn trials(&self, drugbank_id: &str) -> Result<Option<Vec<TrialRow>>> {
        let rows: Vec<TrialRow> = self
            .find_typed(CacheTable::Trials, &[("drugbank_id", drugbank_id)])
            .await?;
        if rows.is_empty() {
            return Ok(None);
        }
        let mut seen = BTreeSet::new();
        Ok(Some(
            rows.into_iter()
                .filter(|r| r.trial_id.as_ref().is_some_and(|id| seen.insert(id.clone())))
                .collect(),
        ))
    }

    pub async fn append_trials(&self, rows: &[TrialRow]) -> Result<usize> {
        self.append_typed(CacheTable::Trials, rows).await
    }

    pub async fn edge_counts(&self, symbol: &str) -> Result<Option<EdgeCountRow>> {
        let rows: Vec<EdgeCountEntry> = self
            .find_typed(CacheTable::Edges, &[("symbol", symbol)])
            .await?;
        Ok(rows.into_iter().last().map(|e| e.counts))
    }

    pub async fn append_edge_counts(&self, symbol: &str, counts: EdgeCountRow) -> Result<usize> {
        let entry = EdgeCountEntry {
            symbol: symbol.to_string(),
            counts,
        };
        self.append_typed(CacheTable::Edges, std::slice::from_ref(&entry)).await
    }

    async fn find_typed<T: DeserializeOwned>(
        &self,
        table: CacheTable,
        filters: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let rows = self.store.find(table, filters).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_value::<T>(Value::Object(row)) {
                Ok(typed) => out.push(typed),
                Err(e) => warn!(table = %table, error = %e, "Skipping malformed cache row"),
            }
        }
        Ok(out)
    }

    async fn append_typed<T: Serialize>(&self, table: CacheTable, items: &[T]) -> Result<usize> {
        if items.is_empty() {
            return Ok(0);
        }
        let rows = items.iter().map(to_row).collect::<Result<Vec<_>>>()?;
        Ok(self.store.append(table, &rows).await?)
    }
}

fn to_row<T: Serialize>(item: &T) -> Result<Row> {
    match serde_json::to_value(item)? {
        Value::Object(row) => Ok(row),
        other => Err(dif_common::DifError::Cache(format!(
            "expected a tabular row, got {other}"
        ))),
    }
}
