//! Ranking pipeline over a resolved druggable set.
//!
//! Stages run in a fixed order once per target:
//! metadata compilation (at construction), drug relationships, patents and
//! products, clinical trials, interactor enrichment, summary. Every stage
//! replaces its previous output, so re-running one is harmless.

use dif_common::{DifError, DruggableRecord, Result};
use dif_db::{BioassayCache, CacheRepository, EdgeCountRow};
use dif_finder::{drug_interactor_pairs, unique_interactors, InteractorFinder, TargetQuery};
use dif_graph::query::patents_products_query;
use dif_graph::GraphStore;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::bioassay_provider::BioassayProvider;
use crate::enrichment::{count_bioassays, count_edges};
use crate::metadata::DrugMetadataBundle;
use crate::patents::{parse_patents, score_patents, PatentData, PatentFacts, PatentScore};
use crate::points::RankingSettings;
use crate::products::{parse_products, score_products, ProductData, ProductFacts, ProductScore};
use crate::relationships::{score_pair, PairScore};
use crate::summary::{summarize_pairs, SummaryRow};
use crate::trials::{collect_trials, score_trials, TrialScore};

/// DrugBank ids per patents/products query.
const PATENT_BATCH_SIZE: usize = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Stage {
    BuildMetadata,
    ScoreDrugRelationships,
    ScorePatentsAndProducts,
    ScoreClinicalTrials,
    ScoreInteractorMetadata,
    Summarize,
}

/// Collaborators a ranking run talks to.
#[derive(Clone)]
pub struct RankerDeps {
    pub graph: Arc<dyn GraphStore>,
    pub cache: CacheRepository,
    pub bioassay_cache: BioassayCache,
    pub bioassays: Arc<dyn BioassayProvider>,
}

/// Scores of one drug, per criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrugScores {
    pub interactors: IndexMap<String, PairScore>,
    pub patents: Option<PatentScore>,
    pub products: Option<ProductScore>,
    pub trials: Option<TrialScore>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InteractorMetadata {
    pub bioassays: Option<u64>,
    pub edges: Option<EdgeCountRow>,
}

/// Drugs whose patent or product facts are still missing after the cache lookup.
struct PendingLookup {
    drug: String,
    patents: bool,
    products: bool,
}

pub struct Ranker {
    deps: RankerDeps,
    settings: RankingSettings,
    interactors: Vec<String>,
    pairs: Vec<(String, String)>,
    metadata: DrugMetadataBundle,
    scores: IndexMap<String, DrugScores>,
    interactor_metadata: IndexMap<String, InteractorMetadata>,
    completed: BTreeSet<Stage>,
}

impl Ranker {
    /// Compile drug metadata from resolved rows. Fails when there is nothing to rank.
    pub fn new(rows: Vec<DruggableRecord>, deps: RankerDeps, settings: RankingSettings) -> Result<Self> {
        if rows.is_empty() {
            return Err(DifError::NoResults(
                "resolve druggable interactors before ranking".to_string(),
            ));
        }

        let metadata = DrugMetadataBundle::compile(&rows);
        let interactors = unique_interactors(&rows);
        let pairs = drug_interactor_pairs(&rows);
        info!(
            drugs = metadata.len(),
            interactors = interactors.len(),
            pairs = pairs.len(),
            "Drug metadata compiled"
        );

        Ok(Self {
            deps,
            settings,
            interactor_metadata: interactors
                .iter()
                .map(|i| (i.clone(), InteractorMetadata::default()))
                .collect(),
            interactors,
            pairs,
            metadata,
            scores: IndexMap::new(),
            completed: BTreeSet::from([Stage::BuildMetadata]),
        })
    }

    /// Run every stage in order and return the summary.
    pub async fn rank(&mut self) -> Result<Vec<SummaryRow>> {
        self.score_drug_relationships();
        self.score_patents_and_products().await?;
        self.score_clinical_trials().await?;
        self.score_interactor_metadata().await?;
        self.summarize()
    }

    // ── Drug relationships ──────────────────────────────────────────────────

    pub fn score_drug_relationships(&mut self) {
        for (drug, meta) in self.metadata.iter() {
            let pair_scores = meta
                .interactors
                .iter()
                .map(|(interactor, evidence)| (interactor.clone(), score_pair(evidence, &self.settings.points)))
                .collect();
            self.scores.entry(drug.clone()).or_default().interactors = pair_scores;
        }
        self.completed.insert(Stage::ScoreDrugRelationships);
    }

    // ── Patents and products ────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub async fn score_patents_and_products(&mut self) -> Result<()> {
        self.collect_patents_and_products().await?;

        let points = self.settings.points;
        for (drug, meta) in self.metadata.iter() {
            let scores = self.scores.entry(drug.clone()).or_default();
            scores.patents = Some(score_patents(&meta.patents, &points));
            scores.products = Some(score_products(&meta.products, &points));
        }
        self.completed.insert(Stage::ScorePatentsAndProducts);
        Ok(())
    }

    async fn collect_patents_and_products(&mut self) -> Result<()> {
        let cache = &self.deps.cache;
        let mut pending: IndexMap<String, Vec<PendingLookup>> = IndexMap::new();

        for (drug, meta) in self.metadata.iter_mut() {
            meta.patents = PatentData::Unknown;
            meta.products = ProductData::Unknown;

            let patent = cache.patent(drug).await?;
            let product = cache.product(drug).await?;
            let lookup = PendingLookup {
                drug: drug.clone(),
                patents: patent.is_none(),
                products: product.is_none(),
            };
            if let Some(row) = patent {
                meta.patents = PatentData::Facts(row.into());
            }
            if let Some(row) = product {
                meta.products = ProductData::Facts(row.into());
            }

            if lookup.patents || lookup.products {
                match &meta.identifiers.drugbank_id {
                    Some(id) => pending.entry(id.clone()).or_default().push(lookup),
                    None => debug!(%drug, "No DrugBank id, patents and products unknown"),
                }
            }
        }

        if pending.is_empty() {
            return Ok(());
        }

        let ids: Vec<String> = pending.keys().cloned().collect();
        let mut patent_rows = Vec::new();
        let mut product_rows = Vec::new();
        let mut answered: BTreeSet<String> = BTreeSet::new();

        for batch in ids.chunks(PATENT_BATCH_SIZE) {
            let rows = self
                .deps
                .graph
                .execute(&patents_products_query(batch))
                .await?
                .unwrap_or_default();
            debug!(requested = batch.len(), returned = rows.len(), "Patent/product batch");

            for row in rows {
                let Some(id) = row.get("drugbank_id").and_then(Value::as_str) else {
                    continue;
                };
                let Some(lookups) = pending.get(id) else {
                    continue;
                };
                answered.insert(id.to_string());

                let raw_patents = row.get("drug_patents").unwrap_or(&Value::Null);
                let raw_products = row.get("drug_products").unwrap_or(&Value::Null);
                for lookup in lookups {
                    let Some(meta) = self.metadata.get_mut(&lookup.drug) else {
                        continue;
                    };
                    if lookup.patents {
                        meta.patents = match parse_patents(raw_patents, self.settings.today) {
                            Ok(facts) => {
                                patent_rows.push(facts.to_row(&lookup.drug));
                                PatentData::Facts(facts)
                            }
                            Err(e) => {
                                warn!(drug = %lookup.drug, error = %e, "Unreadable patent data");
                                PatentData::Malformed(e)
                            }
                        };
                    }
                    if lookup.products {
                        meta.products = match parse_products(raw_products) {
                            Ok(facts) => {
                                product_rows.push(facts.to_row(&lookup.drug));
                                ProductData::Facts(facts)
                            }
                            Err(e) => {
                                warn!(drug = %lookup.drug, error = %e, "Unreadable product data");
                                ProductData::Malformed(e)
                            }
                        };
                    }
                }
            }
        }

        // Drugs the graph store knows nothing about are cached as having no data.
        for (id, lookups) in &pending {
            if answered.contains(id) {
                continue;
            }
            for lookup in lookups {
                let Some(meta) = self.metadata.get_mut(&lookup.drug) else {
                    continue;
                };
                if lookup.patents {
                    let facts = PatentFacts::default();
                    patent_rows.push(facts.to_row(&lookup.drug));
                    meta.patents = PatentData::Facts(facts);
                }
                if lookup.products {
                    let facts = ProductFacts::default();
                    product_rows.push(facts.to_row(&lookup.drug));
                    meta.products = ProductData::Facts(facts);
                }
            }
        }

        if !patent_rows.is_empty() {
            self.deps.cache.append_patents(&patent_rows).await?;
        }
        if !product_rows.is_empty() {
            self.deps.cache.append_products(&product_rows).await?;
        }
        info!(
            patents = patent_rows.len(),
            products = product_rows.len(),
            "Patent and product facts cached"
        );
        Ok(())
    }

    // ── Clinical trials ─────────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub async fn score_clinical_trials(&mut self) -> Result<()> {
        let graph = self.deps.graph.as_ref();
        let cache = &self.deps.cache;

        for (drug, meta) in self.metadata.iter_mut() {
            let trials = match &meta.identifiers.drugbank_id {
                Some(id) => collect_trials(drug, id, graph, cache).await?,
                None => Vec::new(),
            };
            let score = score_trials(&trials, &self.settings);
            meta.trials = Some(trials);
            self.scores.entry(drug.clone()).or_default().trials = Some(score);
        }
        self.completed.insert(Stage::ScoreClinicalTrials);
        Ok(())
    }

    // ── Interactor enrichment ───────────────────────────────────────────────

    #[instrument(skip(self))]
    pub async fn score_interactor_metadata(&mut self) -> Result<()> {
        let graph = self.deps.graph.as_ref();

        let bioassays = count_bioassays(
            &self.interactors,
            graph,
            self.deps.bioassays.as_ref(),
            &self.deps.bioassay_cache,
        )
        .await?;

        for symbol in &self.interactors {
            let edges = count_edges(symbol, graph, &self.deps.cache).await?;
            self.interactor_metadata.insert(
                symbol.clone(),
                InteractorMetadata {
                    bioassays: bioassays.get(symbol).copied(),
                    edges: Some(edges),
                },
            );
        }
        self.completed.insert(Stage::ScoreInteractorMetadata);
        Ok(())
    }

    // ── Summary ─────────────────────────────────────────────────────────────

    /// One row per (drug, interactor) pair. Later criteria are optional; drug
    /// relationships must have been scored.
    pub fn summarize(&mut self) -> Result<Vec<SummaryRow>> {
        if !self.completed.contains(&Stage::ScoreDrugRelationships) {
            return Err(DifError::Pipeline(
                "drug relationships must be scored before summarizing".to_string(),
            ));
        }
        let rows = summarize_pairs(&self.pairs, &self.metadata, &self.scores, &self.interactor_metadata);
        self.completed.insert(Stage::Summarize);
        info!(rows = rows.len(), "Ranking summarized");
        Ok(rows)
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn metadata(&self) -> &DrugMetadataBundle {
        &self.metadata
    }

    pub fn scores(&self) -> &IndexMap<String, DrugScores> {
        &self.scores
    }

    pub fn interactor_metadata(&self) -> &IndexMap<String, InteractorMetadata> {
        &self.interactor_metadata
    }

    pub fn interactors(&self) -> &[String] {
        &self.interactors
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn has_completed(&self, stage: Stage) -> bool {
        self.completed.contains(&stage)
    }
}

/// Resolve the druggable interactors of a target and rank them.
pub async fn rank_target(
    finder: &InteractorFinder,
    query: &TargetQuery,
    deps: RankerDeps,
    settings: RankingSettings,
) -> Result<Vec<SummaryRow>> {
    let rows = finder.resolve_druggable(query).await?;
    let mut ranker = Ranker::new(rows, deps, settings)?;
    ranker.rank().await
}
