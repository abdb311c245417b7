//! Cache-first interactor resolution.
//!
//! A lookup first reads the local cache under the canonical target symbol.
//! Only when the cache has nothing matching the requested relations and
//! modifications is the graph store queried; whatever it returns is appended
//! to the cache so the next lookup is served locally.
//!
//! Rows fetched by a modification search carry that search's key, so the same
//! search finds them again even when the graph matched on the modification
//! name rather than its type.

use dif_common::{
    DifError, DruggableRecord, EdgeCategory, InteractorRecord, RelationFilter, Result, Row, TargetName,
};
use dif_db::CacheRepository;
use dif_graph::query::{self, DruggableQueries, PmodFilter};
use dif_graph::GraphStore;
use indexmap::IndexSet;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// What to search for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetQuery {
    pub symbol: TargetName,
    /// Graph class of the target node.
    pub target_type: String,
    pub relation: RelationFilter,
    /// Protein modification codes; `all` means any modification.
    pub pmods: Vec<String>,
}

impl TargetQuery {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: TargetName::new(symbol),
            target_type: "protein".to_string(),
            relation: RelationFilter::All,
            pmods: Vec::new(),
        }
    }

    pub fn with_target_type(mut self, target_type: impl Into<String>) -> Self {
        self.target_type = target_type.into();
        self
    }

    pub fn with_relation(mut self, relation: RelationFilter) -> Self {
        self.relation = relation;
        self
    }

    pub fn with_pmods(mut self, pmods: Vec<String>) -> Self {
        self.pmods = pmods;
        self
    }

    /// Modification filter, if it applies to this target type.
    fn pmod_filter(&self) -> Option<PmodFilter<'_>> {
        PmodFilter::new(&self.target_type, &self.pmods)
    }

    /// Graph query text of the interactor search.
    pub fn interactor_sql(&self) -> String {
        query::interactor_query(&self.target_type, &self.symbol.variants(), &self.relation, &self.pmods)
    }

    /// Graph query texts of the druggable search.
    pub fn druggable_sql(&self) -> DruggableQueries {
        // Drugs are annotated on human proteins only, so a modification search
        // matches the upper-case symbol alone.
        let names = if self.pmod_filter().is_some() {
            vec![self.symbol.canonical()]
        } else {
            self.symbol.variants()
        };
        query::druggable_queries(&self.target_type, &names, &self.pmods)
    }
}

// ── Row accessors ───────────────────────────────────────────────────────────

/// Columns shared by interactor and druggable rows.
pub trait InteractorRow: DeserializeOwned {
    fn interactor_name(&self) -> &str;
    fn relation_type(&self) -> &str;
    fn pmod_type(&self) -> Option<&str>;
    fn pmod_filter(&self) -> Option<&str>;
    fn set_target_symbol(&mut self, symbol: String);
    fn set_pmod_filter(&mut self, key: Option<String>);
}

impl InteractorRow for InteractorRecord {
    fn interactor_name(&self) -> &str { &self.interactor_name }
    fn relation_type(&self) -> &str { &self.relation_type }
    fn pmod_type(&self) -> Option<&str> { self.pmod_type.as_deref() }
    fn pmod_filter(&self) -> Option<&str> { self.pmod_filter.as_deref() }
    fn set_target_symbol(&mut self, symbol: String) { self.target_symbol = symbol; }
    fn set_pmod_filter(&mut self, key: Option<String>) { self.pmod_filter = key; }
}

impl InteractorRow for DruggableRecord {
    fn interactor_name(&self) -> &str { &self.interactor_name }
    fn relation_type(&self) -> &str { &self.relation_type }
    fn pmod_type(&self) -> Option<&str> { self.pmod_type.as_deref() }
    fn pmod_filter(&self) -> Option<&str> { self.pmod_filter.as_deref() }
    fn set_target_symbol(&mut self, symbol: String) { self.target_symbol = symbol; }
    fn set_pmod_filter(&mut self, key: Option<String>) { self.pmod_filter = key; }
}

// ── Finder ──────────────────────────────────────────────────────────────────

pub struct InteractorFinder {
    graph: Arc<dyn GraphStore>,
    cache: CacheRepository,
}

impl InteractorFinder {
    pub fn new(graph: Arc<dyn GraphStore>, cache: CacheRepository) -> Self {
        Self { graph, cache }
    }

    pub fn graph(&self) -> &Arc<dyn GraphStore> {
        &self.graph
    }

    pub fn cache(&self) -> &CacheRepository {
        &self.cache
    }

    /// Interactors of the target connected by the requested relations.
    #[instrument(skip(self), fields(symbol = %query.symbol))]
    pub async fn resolve_interactors(&self, query: &TargetQuery) -> Result<Vec<InteractorRecord>> {
        let target = canonical_symbol(query)?;

        let cached = self.cache.interactors(&target, &query.target_type).await?;
        let cached = filter_cached(cached, &query.relation, query);
        if !cached.is_empty() {
            info!(rows = cached.len(), "Interactors served from cache");
            return Ok(cached);
        }

        let rows = self.graph.execute(&query.interactor_sql()).await?;
        let records: Vec<InteractorRecord> = decode_rows(rows.unwrap_or_default(), &target, query);
        if records.is_empty() {
            warn!(target = %target, "No interactors found");
            return Ok(Vec::new());
        }

        info!(target = %target, rows = records.len(), "Importing interactors into cache");
        self.cache.append_interactors(&records).await?;
        Ok(records)
    }

    /// Interactors reached through a causal relation that some drug targets.
    ///
    /// Both the direct ("pure") and composite-node ("capsule") paths are
    /// queried, one after the other, and their rows concatenated.
    #[instrument(skip(self), fields(symbol = %query.symbol))]
    pub async fn resolve_druggable(&self, query: &TargetQuery) -> Result<Vec<DruggableRecord>> {
        let target = canonical_symbol(query)?;
        let causal = RelationFilter::Category(EdgeCategory::Causal);

        let cached = self.cache.druggable(&target, &query.target_type).await?;
        let cached = filter_cached(cached, &causal, query);
        if !cached.is_empty() {
            info!(rows = cached.len(), "Druggable interactors served from cache");
            return Ok(cached);
        }

        let queries = query.druggable_sql();
        let mut rows = self.graph.execute(&queries.pure).await?.unwrap_or_default();
        debug!(rows = rows.len(), "Pure druggable rows");
        let capsule = self.graph.execute(&queries.capsule).await?.unwrap_or_default();
        debug!(rows = capsule.len(), "Capsule druggable rows");
        rows.extend(capsule);

        let decoded: Vec<DruggableRecord> = decode_rows(rows, &target, query);
        let total = decoded.len();
        let records: Vec<DruggableRecord> = decoded.into_iter().filter(|r| !r.drug.is_empty()).collect();
        if records.len() < total {
            warn!(dropped = total - records.len(), "Dropped druggable rows without a drug label");
        }
        if records.is_empty() {
            warn!(target = %target, "No druggable interactors found");
            return Ok(Vec::new());
        }

        info!(target = %target, rows = records.len(), "Importing druggable interactors into cache");
        self.cache.append_druggable(&records).await?;
        Ok(records)
    }
}

fn canonical_symbol(query: &TargetQuery) -> Result<String> {
    if query.symbol.is_empty() {
        return Err(DifError::Pipeline("target symbol must not be empty".into()));
    }
    Ok(query.symbol.canonical())
}

/// Cached rows that answer `query`.
///
/// Unfiltered searches only see rows stored by unfiltered searches. A
/// modification search prefers the rows it stored itself and otherwise falls
/// back to rows whose modification type is one of the requested codes.
fn filter_cached<R: InteractorRow>(rows: Vec<R>, relation: &RelationFilter, query: &TargetQuery) -> Vec<R> {
    let rows = rows.into_iter().filter(|r| relation.matches(r.relation_type()));
    let Some(filter) = query.pmod_filter() else {
        return rows.filter(|r| r.pmod_filter().is_none()).collect();
    };

    let key = filter.key();
    let (stored, others): (Vec<R>, Vec<R>) = rows.partition(|r| r.pmod_filter() == Some(key.as_str()));
    if !stored.is_empty() {
        return stored;
    }
    others
        .into_iter()
        .filter(|r| r.pmod_type().is_some_and(|t| filter.accepts_type(t)))
        .collect()
}

fn decode_rows<R: InteractorRow>(rows: Vec<Row>, target: &str, query: &TargetQuery) -> Vec<R> {
    let key = query.pmod_filter().map(|f| f.key());
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<R>(Value::Object(row)) {
            Ok(mut record) => {
                record.set_target_symbol(target.to_string());
                record.set_pmod_filter(key.clone());
                Some(record)
            }
            Err(e) => {
                warn!(error = %e, "Skipping malformed graph row");
                None
            }
        })
        .collect()
}

// ── Result helpers ──────────────────────────────────────────────────────────

/// Interactor names in order of first appearance.
pub fn unique_interactors<R: InteractorRow>(rows: &[R]) -> Vec<String> {
    rows.iter()
        .map(|r| r.interactor_name().to_string())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Drug labels in order of first appearance.
pub fn unique_drugs(rows: &[DruggableRecord]) -> Vec<String> {
    rows.iter()
        .map(|r| r.drug.clone())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct (drug, interactor) pairs in order of first appearance.
pub fn drug_interactor_pairs(rows: &[DruggableRecord]) -> Vec<(String, String)> {
    rows.iter()
        .map(|r| (r.drug.clone(), r.interactor_name.clone()))
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn row(interactor_name: &str, pmod_type: Option<&str>, pmod_filter: Option<&str>) -> InteractorRecord {
        let mut record = dif_test_utils::interactor("MAPT", "increases", interactor_name);
        record.pmod_type = pmod_type.map(String::from);
        record.pmod_filter = pmod_filter.map(String::from);
        record
    }

    fn names(rows: &[InteractorRecord]) -> Vec<&str> {
        rows.iter().map(|r| r.interactor_name.as_str()).collect()
    }

    #[test]
    fn test_cached_rows_by_pmod_type() {
        let cached = vec![
            row("GSK3B", Some("pho"), None),
            row("EP300", Some("ace"), None),
            row("PPP2CA", None, None),
        ];
        let query = |codes_: &[&str]| TargetQuery::new("MAPT").with_pmods(codes(codes_));

        let all = filter_cached(cached.clone(), &RelationFilter::All, &query(&["all"]));
        assert_eq!(names(&all), vec!["GSK3B", "EP300"]);
        let both = filter_cached(cached.clone(), &RelationFilter::All, &query(&["pho", "ace"]));
        assert_eq!(names(&both), vec!["GSK3B", "EP300"]);
        let pho = filter_cached(cached.clone(), &RelationFilter::All, &query(&["pho"]));
        assert_eq!(names(&pho), vec!["GSK3B"]);
        let plain = filter_cached(cached, &RelationFilter::All, &TargetQuery::new("MAPT"));
        assert_eq!(plain.len(), 3);
    }

    #[test]
    fn test_rows_stored_by_a_pmod_search_answer_it_again() {
        let cached = vec![
            row("GSK3B", Some("pho"), None),
            row("CDK5", Some("ph"), Some("pho")),
            row("DYRK1A", None, Some("all")),
        ];
        let query = |codes_: &[&str]| TargetQuery::new("MAPT").with_pmods(codes(codes_));

        let pho = filter_cached(cached.clone(), &RelationFilter::All, &query(&["pho"]));
        assert_eq!(names(&pho), vec!["CDK5"]);
        let all = filter_cached(cached.clone(), &RelationFilter::All, &query(&["all"]));
        assert_eq!(names(&all), vec!["DYRK1A"]);
        let plain = filter_cached(cached, &RelationFilter::All, &TargetQuery::new("MAPT"));
        assert_eq!(names(&plain), vec!["GSK3B"]);
    }

    #[test]
    fn test_druggable_sql_narrows_names_for_pmod_search() {
        let plain = TargetQuery::new("Mapt").druggable_sql();
        assert!(plain.pure.contains("name in ['Mapt', 'MAPT', 'mapt']"));

        let pho = TargetQuery::new("Mapt").with_pmods(codes(&["pho"])).druggable_sql();
        assert!(pho.pure.contains("name in ['MAPT']"));
        assert!(pho.capsule.contains("name in ['MAPT']"));
    }

    #[test]
    fn test_pmod_filter_only_for_proteins() {
        let q = TargetQuery::new("MAPT").with_pmods(codes(&["pho"]));
        assert!(q.pmod_filter().is_some());
        assert!(q.clone().with_target_type("rna").pmod_filter().is_none());
    }
}
