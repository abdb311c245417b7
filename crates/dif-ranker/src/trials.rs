//! Clinical trials: reading them from graph rows and the cache, and scoring.

use dif_common::trials::is_ongoing;
use dif_common::{Result, Row};
use dif_db::{CacheRepository, TrialRow};
use dif_graph::query::clinical_trials_query;
use dif_graph::GraphStore;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

use crate::points::RankingSettings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trial {
    pub trial_id: String,
    pub status: Option<String>,
    /// Primary and MeSH conditions.
    pub conditions: BTreeSet<String>,
    pub drugs_in_trial: Vec<String>,
}

impl Trial {
    /// A trial returned by the graph store. Rows without a trial id are ignored.
    pub fn from_graph(row: &Row) -> Option<Self> {
        let trial_id = match row.get("trial_id")? {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let mut conditions: BTreeSet<String> = string_list(row.get("condition")).into_iter().collect();
        conditions.extend(string_list(row.get("mesh_conditions")));

        Some(Self {
            trial_id,
            status: row
                .get("overall_status")
                .and_then(Value::as_str)
                .map(String::from),
            conditions,
            drugs_in_trial: string_list(row.get("drugs_in_trial")),
        })
    }

    /// A cached trial. Marker rows carry no trial.
    pub fn from_row(row: &TrialRow) -> Option<Self> {
        Some(Self {
            trial_id: row.trial_id.clone()?,
            status: row.trial_status.clone(),
            conditions: row.condition_set(),
            drugs_in_trial: row
                .drugs_in_trial
                .split('|')
                .filter(|d| !d.is_empty())
                .map(String::from)
                .collect(),
        })
    }

    pub fn to_row(&self, drug_name: &str, drugbank_id: &str) -> TrialRow {
        TrialRow {
            drug_name: drug_name.to_string(),
            drugbank_id: drugbank_id.to_string(),
            trial_id: Some(self.trial_id.clone()),
            trial_status: self.status.clone(),
            conditions: self.conditions.iter().cloned().collect::<Vec<_>>().join(";"),
            drugs_in_trial: self.drugs_in_trial.join("|"),
        }
    }

    pub fn is_ongoing(&self) -> bool {
        self.status.as_deref().is_some_and(is_ongoing)
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::String(s)) => s
            .split('|')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Trials of one drug: cached ones if the drug was looked up before, else the
/// graph's, which are then cached. A drug with no trials is cached as a marker row.
#[instrument(skip(graph, cache))]
pub async fn collect_trials(
    drug_name: &str,
    drugbank_id: &str,
    graph: &dyn GraphStore,
    cache: &CacheRepository,
) -> Result<Vec<Trial>> {
    if let Some(rows) = cache.trials(drugbank_id).await? {
        debug!(trials = rows.len(), "Trials from cache");
        return Ok(rows.iter().filter_map(Trial::from_row).collect());
    }

    let rows = graph
        .execute(&clinical_trials_query(drugbank_id))
        .await?
        .unwrap_or_default();
    let mut trials: Vec<Trial> = Vec::new();
    for trial in rows.iter().filter_map(Trial::from_graph) {
        if !trials.iter().any(|t| t.trial_id == trial.trial_id) {
            trials.push(trial);
        }
    }

    let to_cache: Vec<TrialRow> = if trials.is_empty() {
        vec![TrialRow::no_trials(drug_name, drugbank_id)]
    } else {
        trials.iter().map(|t| t.to_row(drug_name, drugbank_id)).collect()
    };
    cache.append_trials(&to_cache).await?;
    debug!(trials = trials.len(), "Trials fetched");
    Ok(trials)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrialAssessment {
    pub keyword_disease_investigated: bool,
    pub similar_disease_investigated: bool,
    pub trial_ongoing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrialScore {
    pub trials: IndexMap<String, TrialAssessment>,
    pub points: i64,
}

/// Score a drug's trials in order.
///
/// Starts from the reward and applies one delta per trial: ongoing trials
/// for the disease itself or for unrelated conditions cost a penalty, trials
/// for a similar disease add twice the reward.
pub fn score_trials(trials: &[Trial], settings: &RankingSettings) -> TrialScore {
    let points = settings.points;
    let mut score = TrialScore {
        trials: IndexMap::new(),
        points: points.reward,
    };

    for trial in trials {
        let mut assessment = TrialAssessment::default();
        let ongoing = trial.is_ongoing();

        if trial.conditions.contains(&settings.disease_keyword) {
            assessment.keyword_disease_investigated = true;
            if ongoing {
                assessment.trial_ongoing = true;
                score.points = score.points.saturating_add(points.penalty);
            }
        } else if settings
            .similar_diseases
            .iter()
            .any(|d| trial.conditions.contains(d))
        {
            assessment.similar_disease_investigated = true;
            score.points = score.points.saturating_add(points.reward.saturating_mul(2));
        } else if ongoing {
            assessment.trial_ongoing = true;
            score.points = score.points.saturating_add(points.penalty);
        }

        score.trials.insert(trial.trial_id.clone(), assessment);
    }
    score
}
