//! Resolver behaviour against a mock graph store and an in-memory cache.

use dif_common::{EdgeCategory, RelationFilter};
use dif_db::{CacheRepository, CacheStore, CacheTable, MemoryCache, SqliteCache};
use dif_finder::{drug_interactor_pairs, unique_drugs, unique_interactors, InteractorFinder, TargetQuery};
use dif_graph::MockGraphStore;
use dif_test_utils::{interactor, rows, DruggableFixture};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn finder(graph: MockGraphStore) -> (InteractorFinder, Arc<MockGraphStore>, Arc<MemoryCache>) {
    let graph = Arc::new(graph);
    let cache = Arc::new(MemoryCache::new());
    let finder = InteractorFinder::new(graph.clone(), CacheRepository::new(cache.clone()));
    (finder, graph, cache)
}

fn mapt_graph() -> MockGraphStore {
    // Graph rows come back with the symbol spelled as stored in the graph.
    let mut gsk = interactor("Mapt", "increases", "GSK3B");
    gsk.pmod_type = Some("pho".into());
    let ppp = interactor("MAPT", "decreases", "PPP2CA");
    let assoc = interactor("MAPT", "association", "APOE");
    MockGraphStore::new().with_response("as:interactor", rows(&[gsk, ppp, assoc]))
}

#[tokio::test]
async fn test_remote_rows_are_cached_under_canonical_symbol() {
    let (finder, graph, cache) = finder(mapt_graph());

    let found = finder.resolve_interactors(&TargetQuery::new("mapt")).await.unwrap();
    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|r| r.target_symbol == "MAPT"));
    assert_eq!(graph.call_count(), 1);
    assert_eq!(cache.len(CacheTable::General), 3);

    let query = &graph.queries()[0];
    assert!(query.contains("name in ['mapt', 'MAPT', 'Mapt']"));
}

#[tokio::test]
async fn test_warm_cache_issues_no_remote_queries() {
    let (finder, graph, _) = finder(mapt_graph());
    let query = TargetQuery::new("MAPT");

    let first = finder.resolve_interactors(&query).await.unwrap();
    let second = finder.resolve_interactors(&query).await.unwrap();

    assert_eq!(graph.call_count(), 1);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[tokio::test]
async fn test_case_variants_resolve_to_identical_rows() {
    let (finder, graph, _) = finder(mapt_graph());

    let mut results = Vec::new();
    for symbol in ["mapt", "MAPT", "Mapt"] {
        results.push(finder.resolve_interactors(&TargetQuery::new(symbol)).await.unwrap());
    }
    assert_eq!(graph.call_count(), 1);
    assert_eq!(results[0], results[1]);
    assert_eq!(results[1], results[2]);
}

#[tokio::test]
async fn test_cached_rows_filtered_by_relation_and_pmod() {
    let (finder, graph, _) = finder(mapt_graph());
    finder.resolve_interactors(&TargetQuery::new("MAPT")).await.unwrap();

    let causal = TargetQuery::new("MAPT").with_relation(RelationFilter::Category(EdgeCategory::Causal));
    let found = finder.resolve_interactors(&causal).await.unwrap();
    assert_eq!(unique_interactors(&found), vec!["GSK3B", "PPP2CA"]);

    let pho = TargetQuery::new("MAPT").with_pmods(vec!["all".into()]);
    let found = finder.resolve_interactors(&pho).await.unwrap();
    assert_eq!(unique_interactors(&found), vec!["GSK3B"]);

    assert_eq!(graph.call_count(), 1);
}

#[tokio::test]
async fn test_filter_miss_falls_back_to_remote() {
    let (finder, graph, _) = finder(mapt_graph());
    finder.resolve_interactors(&TargetQuery::new("MAPT")).await.unwrap();

    let genomic = TargetQuery::new("MAPT").with_relation(RelationFilter::Category(EdgeCategory::Genomic));
    finder.resolve_interactors(&genomic).await.unwrap();

    assert_eq!(graph.call_count(), 2);
    assert!(graph.queries()[1].contains("class:genomic"));
}

#[tokio::test]
async fn test_nothing_anywhere_is_empty_not_error() {
    let (finder, graph, cache) = finder(MockGraphStore::new());
    let found = finder.resolve_interactors(&TargetQuery::new("NOPE")).await.unwrap();
    assert!(found.is_empty());
    assert_eq!(graph.call_count(), 1);
    assert!(cache.is_empty(CacheTable::General));

    let druggable = finder.resolve_druggable(&TargetQuery::new("NOPE")).await.unwrap();
    assert!(druggable.is_empty());
    assert_eq!(graph.call_count(), 3);
}

#[tokio::test]
async fn test_druggable_concatenates_pure_and_capsule_rows() {
    let pure = DruggableFixture::new("Tideglusib", "GSK3B", "increases")
        .target("MAPT")
        .actions(&["inhibitor"])
        .build();
    let capsule = DruggableFixture::new("Lithium", "GSK3B", "increases")
        .target("MAPT")
        .capsule("complex(p(HGNC:GSK3B), p(HGNC:AXIN1))")
        .build();
    let mut nameless = rows(&[pure.clone()]).remove(0);
    nameless.insert("drug".into(), json!(null));

    let graph = MockGraphStore::new()
        .with_response("as:capsule_interactor", rows(&[capsule.clone()]))
        .with_response("as:interactor", vec![rows(&[pure.clone()]).remove(0), nameless]);
    let (finder, graph, cache) = finder(graph);

    let found = finder.resolve_druggable(&TargetQuery::new("Mapt")).await.unwrap();
    assert_eq!(found, vec![pure, capsule]);
    assert_eq!(graph.call_count(), 2);
    assert_eq!(cache.len(CacheTable::Druggable), 2);
    assert_eq!(unique_drugs(&found), vec!["Tideglusib", "Lithium"]);
    assert_eq!(
        drug_interactor_pairs(&found),
        vec![
            ("Tideglusib".to_string(), "GSK3B".to_string()),
            ("Lithium".to_string(), "GSK3B".to_string())
        ]
    );

    finder.resolve_druggable(&TargetQuery::new("MAPT")).await.unwrap();
    assert_eq!(graph.call_count(), 2);
}

#[tokio::test]
async fn test_druggable_pmod_search_uses_canonical_name_only() {
    let hit = DruggableFixture::new("Tideglusib", "GSK3B", "increases")
        .target("MAPT")
        .pmod("pho")
        .build();
    let graph = MockGraphStore::new().with_response("has__pmod", rows(&[hit]));
    let (finder, graph, _) = finder(graph);

    let query = TargetQuery::new("Mapt").with_pmods(vec!["pho".into()]);
    let found = finder.resolve_druggable(&query).await.unwrap();
    assert_eq!(found.len(), 2);
    for q in graph.queries() {
        assert!(q.contains("name in ['MAPT']"));
    }
}

// ── Modification searches on a warm cache ───────────────────────────────────

fn pmod_codes(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

/// The graph matches phosphorylation by name as well as by type, so a hit may
/// carry a type outside the requested codes, or none at all.
fn loosely_modified_graph() -> MockGraphStore {
    let mut by_name = interactor("MAPT", "increases", "CDK5");
    by_name.pmod_type = Some("ph".into());
    let untyped = interactor("MAPT", "decreases", "DYRK1A");
    MockGraphStore::new().with_response("has__pmod", rows(&[by_name, untyped]))
}

async fn assert_interactor_search_repeats_locally(store: Arc<dyn CacheStore>, codes: &[&str]) {
    let graph = Arc::new(loosely_modified_graph());
    let cache = CacheRepository::new(store);
    let finder = InteractorFinder::new(graph.clone(), cache.clone());
    let query = TargetQuery::new("MAPT").with_pmods(pmod_codes(codes));

    let first = finder.resolve_interactors(&query).await.unwrap();
    assert_eq!(unique_interactors(&first), vec!["CDK5", "DYRK1A"]);
    let stored = cache.interactors("MAPT", "protein").await.unwrap().len();
    assert_eq!(stored, 2);

    let second = finder.resolve_interactors(&query).await.unwrap();
    assert_eq!(graph.call_count(), 1, "second {codes:?} search went remote");
    assert_eq!(cache.interactors("MAPT", "protein").await.unwrap().len(), stored);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_pmod_search_repeats_from_memory_cache() {
    for codes in [&["pho"][..], &["all"][..]] {
        assert_interactor_search_repeats_locally(Arc::new(MemoryCache::new()), codes).await;
    }
}

#[tokio::test]
async fn test_pmod_search_repeats_from_sqlite_cache() {
    for codes in [&["pho"][..], &["all"][..]] {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteCache::open(dir.path().join("dif.db")).unwrap();
        assert_interactor_search_repeats_locally(Arc::new(store), codes).await;
    }
}

#[tokio::test]
async fn test_pmod_search_rows_stay_out_of_plain_searches() {
    let plain_hit = interactor("MAPT", "increases", "GSK3B");
    let graph = Arc::new(loosely_modified_graph().with_response("as:interactor", rows(&[plain_hit])));
    let cache = CacheRepository::new(Arc::new(MemoryCache::new()));
    let finder = InteractorFinder::new(graph.clone(), cache);

    finder
        .resolve_interactors(&TargetQuery::new("MAPT").with_pmods(pmod_codes(&["pho"])))
        .await
        .unwrap();
    let plain = finder.resolve_interactors(&TargetQuery::new("MAPT")).await.unwrap();

    assert_eq!(graph.call_count(), 2);
    assert_eq!(unique_interactors(&plain), vec!["GSK3B"]);
}

#[tokio::test]
async fn test_druggable_pmod_search_repeats_from_sqlite_cache() {
    let hit = DruggableFixture::new("Tideglusib", "GSK3B", "increases")
        .target("MAPT")
        .pmod("ph")
        .build();
    let graph = Arc::new(MockGraphStore::new().with_response("has__pmod", rows(&[hit])));
    let dir = tempfile::tempdir().unwrap();
    let cache = CacheRepository::new(Arc::new(SqliteCache::open(dir.path().join("dif.db")).unwrap()));
    let finder = InteractorFinder::new(graph.clone(), cache.clone());
    let query = TargetQuery::new("MAPT").with_pmods(pmod_codes(&["pho"]));

    let first = finder.resolve_druggable(&query).await.unwrap();
    let second = finder.resolve_druggable(&query).await.unwrap();

    assert_eq!(graph.call_count(), 2);
    assert_eq!(cache.druggable("MAPT", "protein").await.unwrap().len(), 2);
    assert_eq!(first, second);
}
