//! Cache tables and their column layouts.

use dif_common::{DruggableRecord, InteractorRecord};
use std::fmt;

/// Storage kind of a cache column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Bool,
}

impl ColumnKind {
    pub(crate) fn sql_type(&self) -> &'static str {
        match self {
            ColumnKind::Text => "TEXT",
            ColumnKind::Integer | ColumnKind::Bool => "INTEGER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTable {
    /// Interactor search rows.
    General,
    /// Druggable interactor rows.
    Druggable,
    Patents,
    Products,
    Trials,
    Edges,
}

const PATENT_COLUMNS: [(&str, ColumnKind); 4] = [
    ("drug_name", ColumnKind::Text),
    ("has_patent", ColumnKind::Bool),
    ("expired", ColumnKind::Bool),
    ("patent_numbers", ColumnKind::Text),
];

const PRODUCT_COLUMNS: [(&str, ColumnKind); 4] = [
    ("drug_name", ColumnKind::Text),
    ("has_generic", ColumnKind::Bool),
    ("has_approved_generic", ColumnKind::Bool),
    ("generic_products", ColumnKind::Text),
];

const TRIAL_COLUMNS: [(&str, ColumnKind); 6] = [
    ("drug_name", ColumnKind::Text),
    ("drugbank_id", ColumnKind::Text),
    ("trial_id", ColumnKind::Text),
    ("trial_status", ColumnKind::Text),
    ("conditions", ColumnKind::Text),
    ("drugs_in_trial", ColumnKind::Text),
];

const EDGE_COLUMNS: [(&str, ColumnKind); 4] = [
    ("symbol", ColumnKind::Text),
    ("out_count", ColumnKind::Integer),
    ("in_count", ColumnKind::Integer),
    ("both_count", ColumnKind::Integer),
];

const INTEGER_RECORD_COLUMNS: [&str; 3] = ["target_species", "pmid", "rel_pub_year"];

impl CacheTable {
    pub const ALL: [CacheTable; 6] = [
        CacheTable::General,
        CacheTable::Druggable,
        CacheTable::Patents,
        CacheTable::Products,
        CacheTable::Trials,
        CacheTable::Edges,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CacheTable::General => "general",
            CacheTable::Druggable => "druggable",
            CacheTable::Patents => "patents",
            CacheTable::Products => "products",
            CacheTable::Trials => "trials",
            CacheTable::Edges => "edges",
        }
    }

    /// Columns in storage order.
    pub fn columns(&self) -> Vec<(&'static str, ColumnKind)> {
        let record_column = |c: &'static str| {
            if INTEGER_RECORD_COLUMNS.contains(&c) {
                (c, ColumnKind::Integer)
            } else {
                (c, ColumnKind::Text)
            }
        };
        match self {
            CacheTable::General => InteractorRecord::COLUMNS.into_iter().map(record_column).collect(),
            CacheTable::Druggable => DruggableRecord::COLUMNS.into_iter().map(record_column).collect(),
            CacheTable::Patents => PATENT_COLUMNS.to_vec(),
            CacheTable::Products => PRODUCT_COLUMNS.to_vec(),
            CacheTable::Trials => TRIAL_COLUMNS.to_vec(),
            CacheTable::Edges => EDGE_COLUMNS.to_vec(),
        }
    }

    pub fn column_kind(&self, column: &str) -> Option<ColumnKind> {
        self.columns()
            .into_iter()
            .find(|(name, _)| *name == column)
            .map(|(_, kind)| kind)
    }
}

impl fmt::Display for CacheTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tables_follow_record_columns() {
        assert_eq!(CacheTable::General.columns().len(), InteractorRecord::COLUMNS.len());
        assert_eq!(CacheTable::Druggable.column_kind("pmid"), Some(ColumnKind::Integer));
        assert_eq!(CacheTable::Druggable.column_kind("drug"), Some(ColumnKind::Text));
        assert_eq!(CacheTable::Patents.column_kind("expired"), Some(ColumnKind::Bool));
        assert_eq!(CacheTable::Edges.column_kind("drug"), None);
    }
}
