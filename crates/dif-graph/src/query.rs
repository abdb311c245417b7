//! Query builder for the knowledge graph.
//!
//! Callers pass structured parameters; only this module splices text.

use dif_common::RelationFilter;

/// Structural edges linking a composite node to the pure protein it contains.
pub const CAPSULE_EDGES: [&str; 5] = [
    "has__protein",
    "has_modified_protein",
    "has_variant_protein",
    "has_located_protein",
    "has_fragmented_protein",
];

/// Protein modification filter applied to the target node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PmodFilter<'a> {
    pmods: &'a [String],
}

impl<'a> PmodFilter<'a> {
    /// Only protein targets carry modifications; for anything else the filter is dropped.
    pub fn new(target_type: &str, pmods: &'a [String]) -> Option<Self> {
        (target_type == "protein" && !pmods.is_empty()).then_some(Self { pmods })
    }

    fn has(&self, code: &str) -> bool {
        self.pmods.iter().any(|p| p == code)
    }

    /// Whether a row's own modification type is one of the requested codes.
    pub fn accepts_type(&self, pmod_type: &str) -> bool {
        self.has("all") || self.has(pmod_type)
    }

    /// Order-independent name of the search, stored with the rows it returns.
    pub fn key(&self) -> String {
        if self.has("all") {
            return "all".to_string();
        }
        let mut codes: Vec<&str> = self.pmods.iter().map(String::as_str).collect();
        codes.sort_unstable();
        codes.dedup();
        codes.join(",")
    }

    /// `WHERE` body for the pmod node.
    ///
    /// `all` accepts any modification. Phosphorylation (`pho`) also accepts
    /// modifications whose name mentions phosphorylation.
    pub fn condition(&self) -> String {
        let mut condition = if self.has("all") {
            "type != '' or name != ''".to_string()
        } else {
            format!("type in {}", literal_list(self.pmods))
        };
        if self.has("pho") || self.has("all") {
            condition.push_str(" OR name like '%phosphorylat%'");
        }
        condition
    }

    fn match_prefix(&self) -> String {
        format!(
            "MATCH {{class:pmod, as:pmod, WHERE:({})}}<-has__pmod-\n",
            self.condition()
        )
    }
}

fn match_head(pmod: Option<&PmodFilter<'_>>) -> String {
    pmod.map_or_else(|| "MATCH\n".to_string(), |p| p.match_prefix())
}

/// Target -> relation -> interactor search.
pub fn interactor_query(
    target_type: &str,
    names: &[String],
    relation: &RelationFilter,
    pmods: &[String],
) -> String {
    let pmod = PmodFilter::new(target_type, pmods);
    format!(
        "{head}{{class:{target_type}, as:target, WHERE:(name in {names})}}
.inE(){{class:{relation}, as:relation, where:(@class != 'causes_no_change')}}
.outV(){{class:bel, as:interactor}}
RETURN
pmod.type as pmod_type,
relation.@class as relation_type,
target.name as target_symbol,
target.bel as target_bel,
target.@class as target_type,
interactor.bel as interactor_bel,
interactor.name as interactor_name,
interactor.@class as interactor_type,
relation.pmid as pmid,
relation.pmc as pmc,
target.species as target_species",
        head = match_head(pmod.as_ref()),
        names = literal_list(names),
        relation = relation.query_class(),
    )
}

/// The two druggable searches: drugs binding the interactor itself, and drugs
/// binding a pure protein inside a composite interactor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DruggableQueries {
    pub pure: String,
    pub capsule: String,
}

const DRUG_COLUMNS: &str = "drug.label as drug,
drug.drugbank_id as drugbank_id,
drug.drugbank.chembl_id as chembl_id,
drug.drugbank.pubchem_cid as pubchem_id,
relation.@class as relation_type,
relation.citation.pub_date.subString(0, 4) as rel_pub_year,
target.name as target_symbol,
target.bel as target_bel,
target.@class as target_type,
relation.pmid as pmid,
relation.pmc as pmc,
relation.@rid.asString() as rel_rid,
drug_rel.@rid.asString() as drug_rel_rid,
drug_rel.actions as drug_rel_actions";

pub fn druggable_queries(target_type: &str, names: &[String], pmods: &[String]) -> DruggableQueries {
    let pmod = PmodFilter::new(target_type, pmods);
    let head = match_head(pmod.as_ref());
    let target = format!(
        "{{class:{}, as:target, WHERE:(name in {})}}\n\
         .inE(){{class:causal, as:relation, where:(@class != 'causes_no_change')}}",
        target_type,
        literal_list(names)
    );

    let pure = format!(
        "{head}{target}
.outV(){{class:bel, as:interactor}}
.inE(){{class:has_drug_target, as:drug_rel}}
.outV(){{class:drug, as:drug}}
RETURN
pmod.type as pmod_type,
interactor.bel as interactor_bel,
interactor.name as interactor_name,
interactor.@class as interactor_type,
{DRUG_COLUMNS}"
    );

    let capsule_edges = CAPSULE_EDGES
        .iter()
        .map(|e| quote(e))
        .collect::<Vec<_>>()
        .join(", ");
    let capsule = format!(
        "{head}{target}
.outV(){{class:bel, as:capsule_interactor}}
.bothE({capsule_edges})
.bothV(){{class:protein, as:pure_interactor, WHERE:(pure=true)}}
.inE(){{class:has_drug_target, as:drug_rel}}
.outV(){{class:drug, as:drug}}
RETURN
pmod.type as pmod_type,
pure_interactor.@class as interactor_type,
pure_interactor.bel as interactor_bel,
pure_interactor.name as interactor_name,
capsule_interactor.bel as capsule_interactor_bel,
capsule_interactor.@class as capsule_interactor_type,
{DRUG_COLUMNS}"
    );

    DruggableQueries { pure, capsule }
}

// ── Metadata lookups ────────────────────────────────────────────────────────

/// Causal edges pointing at the pure protein `symbol`.
pub fn in_count_query(symbol: &str) -> String {
    format!(
        "SELECT count(*) as number FROM causal WHERE in.name = {} AND in.pure = true AND in.@class = 'protein'",
        quote(symbol)
    )
}

/// Causal edges leaving the pure protein `symbol`.
pub fn out_count_query(symbol: &str) -> String {
    format!(
        "SELECT count(*) as number FROM causal WHERE out.name = {} AND out.pure = true AND out.@class = 'protein'",
        quote(symbol)
    )
}

pub fn uniprot_query(symbol: &str) -> String {
    format!(
        "SELECT uniprot.id as uniprot_id FROM protein WHERE name = {} and pure = true LIMIT 1",
        quote(symbol)
    )
}

pub fn clinical_trials_query(drugbank_id: &str) -> String {
    format!(
        "SELECT expand(clinical_trials) FROM drugbank WHERE id = {}",
        quote(drugbank_id)
    )
}

pub fn patents_products_query(drugbank_ids: &[String]) -> String {
    format!(
        "SELECT id as drugbank_id, name, patents as drug_patents, products.product as drug_products FROM drugbank WHERE id in {}",
        literal_list(drugbank_ids)
    )
}

// ── Literals ────────────────────────────────────────────────────────────────

/// Single-quoted string literal.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// `['A', 'B']` list literal.
pub fn literal_list<S: AsRef<str>>(values: &[S]) -> String {
    let items = values
        .iter()
        .map(|v| quote(v.as_ref()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", items)
}
