//! Flat per (drug, interactor) report rows.

use indexmap::IndexMap;
use serde::Serialize;

use crate::metadata::DrugMetadataBundle;
use crate::ranker::{DrugScores, InteractorMetadata};

/// One report row. Criteria that were not scored stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub drug: String,
    pub interactor: String,
    /// Interactors of the target this drug acts on.
    pub drug_target_count: usize,
    pub target_interactor_contradiction: bool,
    pub drug_action_contradiction: bool,
    pub synergy: bool,
    pub drug_relation_points: Option<i64>,
    pub patent_expired: bool,
    pub patent_penalized: bool,
    pub patent_points: Option<i64>,
    pub has_approved_generic: bool,
    pub generic_penalized: bool,
    pub generic_points: Option<i64>,
    pub trial_points: Option<i64>,
    pub bioassays: Option<u64>,
    pub edges: Option<u64>,
    pub total_points: i64,
}

/// One row per pair, in the order given.
pub fn summarize_pairs(
    pairs: &[(String, String)],
    metadata: &DrugMetadataBundle,
    scores: &IndexMap<String, DrugScores>,
    interactors: &IndexMap<String, InteractorMetadata>,
) -> Vec<SummaryRow> {
    pairs
        .iter()
        .map(|(drug, interactor)| {
            let mut row = SummaryRow {
                drug: drug.clone(),
                interactor: interactor.clone(),
                drug_target_count: metadata.get(drug).map_or(0, |m| m.target_count()),
                ..SummaryRow::default()
            };

            if let Some(drug_scores) = scores.get(drug) {
                if let Some(pair) = drug_scores.interactors.get(interactor) {
                    row.target_interactor_contradiction = pair.tic;
                    row.drug_action_contradiction = pair.dac;
                    row.synergy = pair.synergy;
                    row.drug_relation_points = Some(pair.points);
                }
                if let Some(patents) = &drug_scores.patents {
                    row.patent_expired = patents.expired;
                    row.patent_penalized = patents.penalized;
                    row.patent_points = Some(patents.points);
                }
                if let Some(products) = &drug_scores.products {
                    row.has_approved_generic = products.has_approved_generic;
                    row.generic_penalized = products.penalized;
                    row.generic_points = Some(products.points);
                }
                row.trial_points = drug_scores.trials.as_ref().map(|t| t.points);
            }

            if let Some(meta) = interactors.get(interactor) {
                row.bioassays = meta.bioassays;
                row.edges = meta.edges.map(|e| e.both_count);
            }

            row.total_points = [
                row.drug_relation_points,
                row.patent_points,
                row.generic_points,
                row.trial_points,
            ]
            .into_iter()
            .flatten()
            .fold(0i64, i64::saturating_add);
            row
        })
        .collect()
}

// ── Interactor view ─────────────────────────────────────────────────────────

/// Report rows folded per interactor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InteractorSummary {
    pub interactor: String,
    pub drug_count: usize,
    pub synergistic_drugs: usize,
    /// Highest-scoring drug; the first one seen wins ties.
    pub best_drug: String,
    pub best_points: i64,
    pub bioassays: Option<u64>,
    pub edges: Option<u64>,
}

/// One row per interactor, best score first. Equal scores keep discovery order.
pub fn pivot_by_interactor(rows: &[SummaryRow]) -> Vec<InteractorSummary> {
    let mut grouped: IndexMap<&str, InteractorSummary> = IndexMap::new();
    for row in rows {
        let entry = grouped.entry(row.interactor.as_str()).or_insert_with(|| InteractorSummary {
            interactor: row.interactor.clone(),
            best_drug: row.drug.clone(),
            best_points: row.total_points,
            bioassays: row.bioassays,
            edges: row.edges,
            ..InteractorSummary::default()
        });
        entry.drug_count += 1;
        if row.synergy {
            entry.synergistic_drugs += 1;
        }
        if row.total_points > entry.best_points {
            entry.best_points = row.total_points;
            entry.best_drug = row.drug.clone();
        }
    }

    let mut pivot: Vec<InteractorSummary> = grouped.into_values().collect();
    pivot.sort_by(|a, b| b.best_points.cmp(&a.best_points));
    pivot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patents::PatentScore;
    use crate::relationships::PairScore;

    #[test]
    fn test_unscored_pair_still_reported() {
        let pairs = vec![
            ("D1".to_string(), "X1".to_string()),
            ("D1".to_string(), "X2".to_string()),
        ];
        let mut scores = IndexMap::new();
        let mut d1 = DrugScores::default();
        d1.interactors.insert(
            "X1".to_string(),
            PairScore { tic: false, dac: false, synergy: true, points: 1 },
        );
        d1.patents = Some(PatentScore { penalized: true, points: -1, ..PatentScore::default() });
        scores.insert("D1".to_string(), d1);

        let rows = summarize_pairs(&pairs, &DrugMetadataBundle::default(), &scores, &IndexMap::new());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].drug_target_count, 0);
        assert!(rows[0].synergy);
        assert_eq!(rows[0].total_points, 0);
        assert_eq!(rows[1].drug_relation_points, None);
        assert_eq!(rows[1].total_points, -1);
        assert!(rows[1].patent_penalized);
    }

    #[test]
    fn test_pivot_groups_pairs_per_interactor() {
        let row = |drug: &str, interactor: &str, points: i64, synergy: bool| SummaryRow {
            drug: drug.to_string(),
            interactor: interactor.to_string(),
            synergy,
            total_points: points,
            bioassays: Some(7),
            ..SummaryRow::default()
        };
        let rows = vec![
            row("D1", "X1", 0, false),
            row("D2", "X1", 2, true),
            row("D3", "X2", 3, true),
            row("D4", "X1", 2, true),
            row("D1", "X3", 3, false),
        ];

        let pivot = pivot_by_interactor(&rows);
        let order: Vec<&str> = pivot.iter().map(|p| p.interactor.as_str()).collect();
        assert_eq!(order, vec!["X2", "X3", "X1"]);

        let x1 = &pivot[2];
        assert_eq!(x1.drug_count, 3);
        assert_eq!(x1.synergistic_drugs, 2);
        assert_eq!((x1.best_drug.as_str(), x1.best_points), ("D2", 2));
        assert_eq!(x1.bioassays, Some(7));
    }
}
