//! Shared fixtures for DIF tests.
//!
//! Builders for resolved rows and helpers that turn typed records into the
//! untyped rows a graph store or cache hands back.

use dif_common::{DruggableRecord, InteractorRecord, Row};
use serde::Serialize;
use serde_json::Value;

/// Object literal as a row. Panics on anything but a JSON object.
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture row must be an object, got {other}"),
    }
}

/// Typed records as untyped rows.
pub fn rows<T: Serialize>(records: &[T]) -> Vec<Row> {
    records
        .iter()
        .map(|r| row(serde_json::to_value(r).expect("fixture serializes")))
        .collect()
}

/// A protein target -> relation -> protein interactor edge.
pub fn interactor(target: &str, relation: &str, interactor: &str) -> InteractorRecord {
    InteractorRecord {
        target_symbol: target.to_string(),
        target_type: "protein".to_string(),
        target_bel: format!("p(HGNC:{target})"),
        relation_type: relation.to_string(),
        interactor_name: interactor.to_string(),
        interactor_type: "protein".to_string(),
        interactor_bel: format!("p(HGNC:{interactor})"),
        pmod_type: None,
        pmod_filter: None,
        pmid: Some(10_000_001),
        pmc: None,
        target_species: 9606,
    }
}

/// Builder for druggable rows.
pub struct DruggableFixture {
    record: DruggableRecord,
}

impl DruggableFixture {
    /// `drug` acts on `interactor`, which relates to target T1 by `relation`.
    pub fn new(drug: &str, interactor: &str, relation: &str) -> Self {
        Self {
            record: DruggableRecord {
                drug: drug.to_string(),
                drugbank_id: Some(format!("DB-{drug}")),
                chembl_id: None,
                pubchem_id: None,
                capsule_interactor_type: None,
                capsule_interactor_bel: None,
                interactor_bel: format!("p(HGNC:{interactor})"),
                interactor_type: "protein".to_string(),
                interactor_name: interactor.to_string(),
                relation_type: relation.to_string(),
                target_bel: "p(HGNC:T1)".to_string(),
                target_symbol: "T1".to_string(),
                target_type: "protein".to_string(),
                pmid: Some(10_000_001),
                pmc: None,
                rel_pub_year: Some(2020),
                rel_rid: None,
                drug_rel_actions: Vec::new(),
                drug_rel_rid: None,
                pmod_type: None,
                pmod_filter: None,
            },
        }
    }

    pub fn target(mut self, symbol: &str) -> Self {
        self.record.target_symbol = symbol.to_string();
        self.record.target_bel = format!("p(HGNC:{symbol})");
        self
    }

    pub fn actions(mut self, actions: &[&str]) -> Self {
        self.record.drug_rel_actions = actions.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn drugbank_id(mut self, id: Option<&str>) -> Self {
        self.record.drugbank_id = id.map(String::from);
        self
    }

    pub fn pmod(mut self, pmod: &str) -> Self {
        self.record.pmod_type = Some(pmod.to_string());
        self
    }

    /// Reached through a composite node.
    pub fn capsule(mut self, bel: &str) -> Self {
        self.record.capsule_interactor_bel = Some(bel.to_string());
        self.record.capsule_interactor_type = Some("complex".to_string());
        self
    }

    pub fn build(self) -> DruggableRecord {
        self.record
    }
}
