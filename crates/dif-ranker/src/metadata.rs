//! Per-drug metadata compiled from resolved druggable rows.

use dif_common::DruggableRecord;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::patents::PatentData;
use crate::products::ProductData;
use crate::trials::Trial;

/// Relation carried by rows that say nothing about direction.
const NON_DIRECTIONAL: &str = "regulates";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrugIdentifiers {
    pub drugbank_id: Option<String>,
    pub chembl_id: Option<String>,
    pub pubchem_id: Option<String>,
}

/// What is known about one drug -> interactor -> target path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InteractorEvidence {
    /// Every interactor -> target relation observed.
    pub relation_types: BTreeSet<String>,
    /// Drug -> interactor actions from the first row seen, `None` when that row had none.
    pub actions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct DrugMetadata {
    pub identifiers: DrugIdentifiers,
    /// Directional evidence per interactor, in discovery order.
    pub interactors: IndexMap<String, InteractorEvidence>,
    /// Every interactor the drug acts on, including non-directional ones.
    pub targets: IndexSet<String>,
    pub patents: PatentData,
    pub products: ProductData,
    /// `None` until trials are collected.
    pub trials: Option<Vec<Trial>>,
}

impl DrugMetadata {
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }
}

/// Drugs in order of first discovery.
#[derive(Debug, Clone, Default)]
pub struct DrugMetadataBundle {
    drugs: IndexMap<String, DrugMetadata>,
}

impl DrugMetadataBundle {
    pub fn compile(rows: &[DruggableRecord]) -> Self {
        let mut drugs: IndexMap<String, DrugMetadata> = IndexMap::new();

        for row in rows {
            let is_new = !drugs.contains_key(&row.drug);
            let drug = drugs.entry(row.drug.clone()).or_default();
            if is_new {
                drug.identifiers = DrugIdentifiers {
                    drugbank_id: row.drugbank_id.clone(),
                    chembl_id: row.chembl_id.clone(),
                    pubchem_id: row.pubchem_id.clone(),
                };
            }
            drug.targets.insert(row.interactor_name.clone());

            if row.relation_type == NON_DIRECTIONAL {
                continue;
            }
            drug.interactors
                .entry(row.interactor_name.clone())
                .or_insert_with(|| InteractorEvidence {
                    relation_types: BTreeSet::new(),
                    actions: (!row.drug_rel_actions.is_empty()).then(|| row.drug_rel_actions.clone()),
                })
                .relation_types
                .insert(row.relation_type.clone());
        }

        Self { drugs }
    }

    pub fn get(&self, drug: &str) -> Option<&DrugMetadata> {
        self.drugs.get(drug)
    }

    pub fn get_mut(&mut self, drug: &str) -> Option<&mut DrugMetadata> {
        self.drugs.get_mut(drug)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DrugMetadata)> {
        self.drugs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut DrugMetadata)> {
        self.drugs.iter_mut()
    }

    pub fn drug_names(&self) -> Vec<String> {
        self.drugs.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dif_test_utils::DruggableFixture;

    #[test]
    fn test_compile_groups_relations_and_keeps_first_actions() {
        let rows = vec![
            DruggableFixture::new("D1", "X1", "increases").actions(&["inhibitor"]).build(),
            DruggableFixture::new("D1", "X1", "directly_increases").actions(&["agonist"]).build(),
            DruggableFixture::new("D2", "X2", "decreases").build(),
            DruggableFixture::new("D1", "X3", "regulates").actions(&["agonist"]).build(),
        ];
        let bundle = DrugMetadataBundle::compile(&rows);

        assert_eq!(bundle.drug_names(), vec!["D1", "D2"]);
        let d1 = bundle.get("D1").unwrap();
        let x1 = &d1.interactors["X1"];
        assert_eq!(x1.relation_types.len(), 2);
        assert_eq!(x1.actions, Some(vec!["inhibitor".to_string()]));
        assert!(!d1.interactors.contains_key("X3"));
        assert_eq!(d1.target_count(), 2);
        assert_eq!(d1.identifiers.drugbank_id.as_deref(), Some("DB-D1"));

        assert_eq!(bundle.get("D2").unwrap().interactors["X2"].actions, None);
    }

    #[test]
    fn test_regulates_only_drug_still_has_identifiers() {
        let rows = vec![DruggableFixture::new("D9", "X9", "regulates").build()];
        let bundle = DrugMetadataBundle::compile(&rows);
        let d9 = bundle.get("D9").unwrap();
        assert!(d9.interactors.is_empty());
        assert_eq!(d9.identifiers.drugbank_id.as_deref(), Some("DB-D9"));
    }
}
