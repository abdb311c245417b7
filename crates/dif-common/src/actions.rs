//! Drug action vocabulary mapped onto regulation polarity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrugAction {
    PositiveRegulator,
    NegativeRegulator,
    Neutral,
}

const POSITIVE: [&str; 6] = [
    "activator",
    "agonist",
    "cofactor",
    "inducer",
    "partial agonist",
    "stabilization",
];

const NEGATIVE: [&str; 7] = [
    "aggregation inhibitor",
    "antagonist",
    "inhibitor",
    "multitarget",
    "neutralizer",
    "potentiator",
    "weak inhibitor",
];

impl DrugAction {
    /// Map a raw action term. Unrecognised terms count as neutral.
    pub fn map(term: &str) -> Self {
        let term = term.trim().to_lowercase();
        if POSITIVE.contains(&term.as_str()) {
            DrugAction::PositiveRegulator
        } else if NEGATIVE.contains(&term.as_str()) {
            DrugAction::NegativeRegulator
        } else {
            DrugAction::Neutral
        }
    }
}

/// Map every term of an action vocabulary.
pub fn map_actions<S: AsRef<str>>(terms: &[S]) -> BTreeSet<DrugAction> {
    terms.iter().map(|t| DrugAction::map(t.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_is_case_insensitive() {
        assert_eq!(DrugAction::map("Inhibitor"), DrugAction::NegativeRegulator);
        assert_eq!(DrugAction::map("PARTIAL AGONIST"), DrugAction::PositiveRegulator);
        assert_eq!(DrugAction::map("binder"), DrugAction::Neutral);
    }

    #[test]
    fn test_unknown_term_is_neutral() {
        assert_eq!(DrugAction::map("chaperone"), DrugAction::Neutral);
    }

    #[test]
    fn test_map_actions_deduplicates() {
        let mapped = map_actions(&["inhibitor", "antagonist", "agonist"]);
        assert_eq!(mapped.len(), 2);
        assert!(mapped.contains(&DrugAction::PositiveRegulator));
        assert!(mapped.contains(&DrugAction::NegativeRegulator));
    }
}
