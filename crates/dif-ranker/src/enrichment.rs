//! Interactor enrichment: bioassay counts and causal edge counts.

use dif_common::Result;
use dif_db::{BioassayCache, BioassayCounts, CacheRepository, EdgeCountRow};
use dif_graph::query::{in_count_query, out_count_query, uniprot_query};
use dif_graph::{first_count, GraphStore};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::bioassay_provider::BioassayProvider;

/// Bioassay counts for `symbols`, filling the file cache for any missing symbol.
///
/// Symbols without a UniProt accession are skipped and stay uncached. The
/// returned map is the whole snapshot, which is also written back to disk.
#[instrument(skip_all, fields(symbols = symbols.len()))]
pub async fn count_bioassays(
    symbols: &[String],
    graph: &dyn GraphStore,
    provider: &dyn BioassayProvider,
    cache: &BioassayCache,
) -> Result<BioassayCounts> {
    let mut counts = cache.load();

    for symbol in symbols {
        if counts.contains_key(symbol) {
            continue;
        }
        let Some(accession) = uniprot_accession(graph, symbol).await? else {
            debug!(%symbol, "No UniProt accession, skipping bioassays");
            continue;
        };
        let count = provider.count_assays(&accession).await?;
        debug!(%symbol, %accession, count, "Bioassays fetched");
        counts.insert(symbol.clone(), count);
    }

    cache.save(&counts)?;
    Ok(counts)
}

async fn uniprot_accession(graph: &dyn GraphStore, symbol: &str) -> Result<Option<String>> {
    let rows = graph.execute(&uniprot_query(symbol)).await?;
    let accession = rows
        .as_deref()
        .and_then(|r| r.first())
        .and_then(|row| row.get("uniprot_id").or_else(|| row.get("uniprot.id")))
        .and_then(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Array(items) => items.iter().find_map(|v| v.as_str().map(String::from)),
            _ => None,
        });
    Ok(accession)
}

/// In, out and combined causal edge counts for `symbol`, cache first.
#[instrument(skip(graph, cache))]
pub async fn count_edges(symbol: &str, graph: &dyn GraphStore, cache: &CacheRepository) -> Result<EdgeCountRow> {
    if let Some(counts) = cache.edge_counts(symbol).await? {
        debug!(both = counts.both_count, "Edge counts from cache");
        return Ok(counts);
    }

    let in_rows = graph.execute(&in_count_query(symbol)).await?;
    let out_rows = graph.execute(&out_count_query(symbol)).await?;
    if in_rows.is_none() && out_rows.is_none() {
        warn!("Edge count queries returned nothing");
    }
    let in_count = first_count(in_rows.as_deref(), "number");
    let out_count = first_count(out_rows.as_deref(), "number");
    let counts = EdgeCountRow {
        out_count,
        in_count,
        both_count: in_count + out_count,
    };

    cache.append_edge_counts(symbol, counts).await?;
    info!(in_count, out_count, "Edge counts cached");
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bioassay_provider::MockBioassayProvider;
    use dif_db::MemoryCache;
    use dif_graph::MockGraphStore;
    use dif_test_utils::row;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_bioassays_cached_and_unresolved_symbols_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BioassayCache::new(dir.path().join("bioassays.json"));
        let graph = MockGraphStore::new().with_response("'GSK3B'", vec![row(json!({"uniprot_id": "P49841"}))]);
        let provider = MockBioassayProvider::new().with("P49841", 42);
        let symbols = vec!["GSK3B".to_string(), "NOPE".to_string()];

        let counts = count_bioassays(&symbols, &graph, &provider, &cache).await.unwrap();
        assert_eq!(counts.get("GSK3B"), Some(&42));
        assert!(!counts.contains_key("NOPE"));
        assert_eq!(cache.load(), counts);

        count_bioassays(&symbols, &graph, &provider, &cache).await.unwrap();
        assert_eq!(provider.calls(), vec!["P49841"]);
    }

    #[tokio::test]
    async fn test_edge_counts_summed_and_cached() {
        let graph = MockGraphStore::new()
            .with_response("in.name = 'GSK3B'", vec![row(json!({"number": 7}))])
            .with_response("out.name = 'GSK3B'", vec![row(json!({"number": 5}))]);
        let cache = CacheRepository::new(Arc::new(MemoryCache::new()));

        let counts = count_edges("GSK3B", &graph, &cache).await.unwrap();
        assert_eq!(counts, EdgeCountRow { out_count: 5, in_count: 7, both_count: 12 });

        let again = count_edges("GSK3B", &graph, &cache).await.unwrap();
        assert_eq!(again, counts);
        assert_eq!(graph.call_count(), 2);
    }
}
