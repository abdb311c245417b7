//! Resolved target/relation/interactor rows.
//! These are the typed forms of the tabular rows exchanged with the graph store
//! and the local cache.

use serde::{Deserialize, Serialize};

use crate::de;

/// An untyped tabular row addressable by column name.
pub type Row = serde_json::Map<String, serde_json::Value>;

// ── Interactor ──────────────────────────────────────────────────────────────

/// A target–relation–interactor edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractorRecord {
    #[serde(default, deserialize_with = "de::string")]
    pub target_symbol: String,
    #[serde(default, deserialize_with = "de::string")]
    pub target_type: String,
    #[serde(default, deserialize_with = "de::string")]
    pub target_bel: String,
    #[serde(default, deserialize_with = "de::string")]
    pub relation_type: String,
    #[serde(default, deserialize_with = "de::string")]
    pub interactor_name: String,
    #[serde(default, deserialize_with = "de::string")]
    pub interactor_type: String,
    #[serde(default, deserialize_with = "de::string")]
    pub interactor_bel: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub pmod_type: Option<String>,
    /// Modification search that produced the row; `None` for unfiltered searches.
    #[serde(default, deserialize_with = "de::opt_string")]
    pub pmod_filter: Option<String>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub pmid: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub pmc: Option<String>,
    /// NCBI taxonomy code; 0 when the graph has none.
    #[serde(default, deserialize_with = "de::i64_or_zero")]
    pub target_species: i64,
}

impl InteractorRecord {
    /// Column projection for interactor searches.
    pub const COLUMNS: [&'static str; 12] = [
        "target_species",
        "pmid",
        "pmc",
        "interactor_type",
        "interactor_name",
        "interactor_bel",
        "relation_type",
        "target_bel",
        "target_type",
        "target_symbol",
        "pmod_type",
        "pmod_filter",
    ];
}

// ── Druggable interactor ────────────────────────────────────────────────────

/// An interactor row that also carries the drug acting on the interactor.
///
/// For capsule hits `interactor_*` describes the pure protein the drug binds
/// and `capsule_interactor_*` the composite node used in the causal edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DruggableRecord {
    #[serde(default, deserialize_with = "de::string")]
    pub drug: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub drugbank_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub chembl_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub pubchem_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub capsule_interactor_type: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub capsule_interactor_bel: Option<String>,
    #[serde(default, deserialize_with = "de::string")]
    pub interactor_bel: String,
    #[serde(default, deserialize_with = "de::string")]
    pub interactor_type: String,
    #[serde(default, deserialize_with = "de::string")]
    pub interactor_name: String,
    #[serde(default, deserialize_with = "de::string")]
    pub relation_type: String,
    #[serde(default, deserialize_with = "de::string")]
    pub target_bel: String,
    #[serde(default, deserialize_with = "de::string")]
    pub target_symbol: String,
    #[serde(default, deserialize_with = "de::string")]
    pub target_type: String,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub pmid: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub pmc: Option<String>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub rel_pub_year: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub rel_rid: Option<String>,
    /// Drug/interactor action vocabulary (inhibitor, agonist, ...).
    #[serde(default, deserialize_with = "de::actions", serialize_with = "de::join_actions")]
    pub drug_rel_actions: Vec<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub drug_rel_rid: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub pmod_type: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub pmod_filter: Option<String>,
}

impl DruggableRecord {
    /// Column projection for druggable searches.
    pub const COLUMNS: [&'static str; 21] = [
        "drug",
        "capsule_interactor_type",
        "capsule_interactor_bel",
        "interactor_bel",
        "interactor_type",
        "interactor_name",
        "relation_type",
        "target_bel",
        "target_symbol",
        "target_type",
        "pmid",
        "pmc",
        "rel_pub_year",
        "rel_rid",
        "drug_rel_actions",
        "drug_rel_rid",
        "drugbank_id",
        "chembl_id",
        "pubchem_id",
        "pmod_type",
        "pmod_filter",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_interactor_missing_species_defaults_to_zero() {
        let r: InteractorRecord = serde_json::from_value(json!({
            "target_symbol": "MAPT",
            "relation_type": "increases",
            "interactor_name": "GSK3B",
            "pmid": "12345",
        }))
        .unwrap();
        assert_eq!(r.target_species, 0);
        assert_eq!(r.pmid, Some(12345));
        assert!(r.pmod_type.is_none());
    }

    #[test]
    fn test_druggable_actions_from_array_and_joined_text() {
        let from_array: DruggableRecord = serde_json::from_value(json!({
            "drug": "Tideglusib",
            "drug_rel_actions": ["inhibitor", "binder"],
            "pubchem_id": 11313622,
        }))
        .unwrap();
        let from_text: DruggableRecord = serde_json::from_value(json!({
            "drug": "Tideglusib",
            "drug_rel_actions": "inhibitor|binder",
            "pubchem_id": "11313622",
        }))
        .unwrap();
        assert_eq!(from_array, from_text);
        assert_eq!(from_array.drug_rel_actions, vec!["inhibitor", "binder"]);
    }

    #[test]
    fn test_druggable_serializes_flat() {
        let rec: DruggableRecord = serde_json::from_value(json!({
            "drug": "Lithium",
            "drug_rel_actions": ["inhibitor"],
        }))
        .unwrap();
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["drug_rel_actions"], json!("inhibitor"));

        let back: DruggableRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn test_columns_match_serialized_fields() {
        let rec: DruggableRecord = serde_json::from_value(json!({"drug": "X"})).unwrap();
        let serialized = row(serde_json::to_value(&rec).unwrap());
        for col in DruggableRecord::COLUMNS {
            assert!(serialized.contains_key(col), "missing column {col}");
        }
        assert_eq!(serialized.len(), DruggableRecord::COLUMNS.len());
    }
}
