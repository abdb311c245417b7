//! Relation taxonomy of the knowledge graph.
//!
//! Edge classes are grouped into categories. A [`RelationFilter`] selects
//! either a whole category, one literal relation, or everything.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DifError;

pub const CAUSAL: [&str; 7] = [
    "increases",
    "decreases",
    "directly_increases",
    "directly_decreases",
    "causes_no_change",
    "rate_limiting_step_of",
    "regulates",
];

pub const CORRELATIVE: [&str; 4] = [
    "association",
    "no_correlation",
    "positive_correlation",
    "negative_correlation",
];

pub const OTHER: [&str; 10] = [
    "has_member",
    "has_members",
    "has_component",
    "has_components",
    "equivalent_to",
    "is_a",
    "sub_process_of",
    "analogous_to",
    "biomarker_for",
    "prognostic_biomarker_for",
];

pub const GENOMIC: [&str; 3] = ["transcribed_to", "translated_to", "orthologous"];

pub const COMPILER: [&str; 7] = [
    "has_modification",
    "has_product",
    "reactant_in",
    "acts_in",
    "has_variant",
    "translocates",
    "includes",
];

/// Graph class matched when no narrowing is requested.
pub const ALL_EDGES_CLASS: &str = "E";

/// Named group of relation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeCategory {
    BelRelation,
    Causal,
    Correlative,
    Other,
    Genomic,
    Compiler,
}

impl EdgeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeCategory::BelRelation => "bel_relation",
            EdgeCategory::Causal => "causal",
            EdgeCategory::Correlative => "correlative",
            EdgeCategory::Other => "other",
            EdgeCategory::Genomic => "genomic",
            EdgeCategory::Compiler => "compiler",
        }
    }

    pub fn relations(&self) -> Vec<&'static str> {
        match self {
            EdgeCategory::BelRelation => bel_relations(),
            EdgeCategory::Causal => CAUSAL.to_vec(),
            EdgeCategory::Correlative => CORRELATIVE.to_vec(),
            EdgeCategory::Other => OTHER.to_vec(),
            EdgeCategory::Genomic => GENOMIC.to_vec(),
            EdgeCategory::Compiler => COMPILER.to_vec(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "bel_relation" => Some(EdgeCategory::BelRelation),
            "causal" => Some(EdgeCategory::Causal),
            "correlative" => Some(EdgeCategory::Correlative),
            "other" => Some(EdgeCategory::Other),
            "genomic" => Some(EdgeCategory::Genomic),
            "compiler" => Some(EdgeCategory::Compiler),
            _ => None,
        }
    }
}

fn bel_relations() -> Vec<&'static str> {
    CAUSAL
        .iter()
        .chain(CORRELATIVE.iter())
        .chain(OTHER.iter())
        .chain(GENOMIC.iter())
        .copied()
        .collect()
}

/// Every relation type known to the graph.
pub fn all_relations() -> Vec<&'static str> {
    let mut all = bel_relations();
    all.extend(COMPILER);
    all
}

/// Selection of relation types for an interactor search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RelationFilter {
    /// Wildcard, written `E` or `all`.
    #[default]
    All,
    Category(EdgeCategory),
    /// A single literal relation name.
    Relation(String),
}

impl RelationFilter {
    /// Relation names that satisfy this filter.
    pub fn relations(&self) -> Vec<String> {
        match self {
            RelationFilter::All => all_relations().into_iter().map(String::from).collect(),
            RelationFilter::Category(c) => c.relations().into_iter().map(String::from).collect(),
            RelationFilter::Relation(r) => vec![r.clone()],
        }
    }

    /// Graph class used to match edges in a query.
    pub fn query_class(&self) -> &str {
        match self {
            RelationFilter::All => ALL_EDGES_CLASS,
            RelationFilter::Category(c) => c.as_str(),
            RelationFilter::Relation(r) => r,
        }
    }

    pub fn matches(&self, relation: &str) -> bool {
        match self {
            RelationFilter::All => true,
            RelationFilter::Category(c) => c.relations().contains(&relation),
            RelationFilter::Relation(r) => r == relation,
        }
    }
}

impl FromStr for RelationFilter {
    type Err = DifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DifError::Config("empty relation filter".into()));
        }
        if s == ALL_EDGES_CLASS || s.eq_ignore_ascii_case("all") {
            return Ok(RelationFilter::All);
        }
        if let Some(category) = EdgeCategory::from_name(s) {
            return Ok(RelationFilter::Category(category));
        }
        Ok(RelationFilter::Relation(s.to_string()))
    }
}

impl fmt::Display for RelationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_class())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wildcards() {
        assert_eq!("E".parse::<RelationFilter>().unwrap(), RelationFilter::All);
        assert_eq!("all".parse::<RelationFilter>().unwrap(), RelationFilter::All);
        assert!("".parse::<RelationFilter>().is_err());
    }

    #[test]
    fn test_parse_category_and_literal() {
        assert_eq!(
            "causal".parse::<RelationFilter>().unwrap(),
            RelationFilter::Category(EdgeCategory::Causal)
        );
        assert_eq!(
            "increases".parse::<RelationFilter>().unwrap(),
            RelationFilter::Relation("increases".into())
        );
    }

    #[test]
    fn test_bel_relation_excludes_compiler_edges() {
        let bel = EdgeCategory::BelRelation.relations();
        assert_eq!(bel.len(), CAUSAL.len() + CORRELATIVE.len() + OTHER.len() + GENOMIC.len());
        assert!(!bel.contains(&"has_variant"));
        assert_eq!(all_relations().len(), bel.len() + COMPILER.len());
    }

    #[test]
    fn test_matches() {
        let causal = RelationFilter::Category(EdgeCategory::Causal);
        assert!(causal.matches("directly_decreases"));
        assert!(!causal.matches("association"));
        assert!(RelationFilter::All.matches("anything"));
        assert_eq!(causal.query_class(), "causal");
        assert_eq!(RelationFilter::All.query_class(), "E");
    }
}
