//! Drug relationship scoring.
//!
//! A drug -> interactor -> target path is judged in three steps:
//! contradicting interactor/target relations, contradicting drug actions, and
//! finally whether the drug action combined with the relation direction
//! lowers the target.

use dif_common::actions::map_actions;
use dif_common::DrugAction;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::metadata::InteractorEvidence;
use crate::points::Points;

const INCREASING: [&str; 2] = ["increases", "directly_increases"];
const DECREASING: [&str; 2] = ["decreases", "directly_decreases"];

/// Relation pairs that cannot both hold between the same interactor and target.
const CONTRADICTIONS: [(&str, &str); 4] = [
    ("increases", "decreases"),
    ("increases", "directly_decreases"),
    ("decreases", "directly_increases"),
    ("directly_increases", "directly_decreases"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PairScore {
    /// Target/interactor contradiction.
    pub tic: bool,
    /// Drug action contradiction.
    pub dac: bool,
    pub synergy: bool,
    pub points: i64,
}

pub fn has_target_interactor_contradiction(relations: &BTreeSet<String>) -> bool {
    CONTRADICTIONS
        .iter()
        .any(|(a, b)| relations.contains(*a) && relations.contains(*b))
}

pub fn has_drug_action_contradiction(actions: &BTreeSet<DrugAction>) -> bool {
    actions.contains(&DrugAction::PositiveRegulator) && actions.contains(&DrugAction::NegativeRegulator)
}

/// Whether the drug action and relation direction together decrease the target.
pub fn has_synergy(actions: &BTreeSet<DrugAction>, relations: &BTreeSet<String>) -> bool {
    let increasing = INCREASING.iter().any(|r| relations.contains(*r));
    let decreasing = DECREASING.iter().any(|r| relations.contains(*r));
    let inhibits = actions.contains(&DrugAction::NegativeRegulator);
    let activates = actions.contains(&DrugAction::PositiveRegulator);

    if inhibits && decreasing {
        false
    } else if inhibits && increasing {
        true
    } else if activates && increasing {
        false
    } else {
        activates && decreasing
    }
}

pub fn score_pair(evidence: &InteractorEvidence, points: &Points) -> PairScore {
    let mut score = PairScore::default();

    if has_target_interactor_contradiction(&evidence.relation_types) {
        score.tic = true;
        score.points = points.penalty;
        return score;
    }

    let Some(actions) = &evidence.actions else {
        score.points = points.penalty;
        return score;
    };

    let mapped = map_actions(actions);
    if has_drug_action_contradiction(&mapped) {
        score.dac = true;
        score.points = points.penalty;
    } else {
        score.synergy = has_synergy(&mapped, &evidence.relation_types);
        score.points = points.award(score.synergy);
    }
    score
}
