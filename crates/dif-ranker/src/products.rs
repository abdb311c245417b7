//! Generic product availability.

use dif_db::ProductRow;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::points::Points;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductFacts {
    pub has_generic: bool,
    pub has_approved_generic: bool,
    /// Names of the generic products.
    pub generic_products: Vec<String>,
}

impl ProductFacts {
    pub fn to_row(&self, drug_name: &str) -> ProductRow {
        ProductRow {
            drug_name: drug_name.to_string(),
            has_generic: self.has_generic,
            has_approved_generic: self.has_approved_generic,
            generic_products: self.generic_products.join("|"),
        }
    }
}

impl From<ProductRow> for ProductFacts {
    fn from(row: ProductRow) -> Self {
        Self {
            has_generic: row.has_generic,
            has_approved_generic: row.has_approved_generic,
            generic_products: row
                .generic_products
                .split('|')
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProductData {
    #[default]
    Unknown,
    Facts(ProductFacts),
    Malformed(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProductScore {
    pub has_generic: bool,
    pub has_approved_generic: bool,
    /// Scored the penalty.
    pub penalized: bool,
    pub points: i64,
}

/// Read raw product data as returned by the graph store.
pub fn parse_products(raw: &Value) -> Result<ProductFacts, String> {
    let mut facts = ProductFacts::default();

    for product in product_entries(raw)? {
        let generic = flag(product, "generic")
            .ok_or_else(|| format!("product without a generic flag: {}", Value::Object(product.clone())))?;
        if !generic {
            continue;
        }
        facts.has_generic = true;
        if flag(product, "approved").unwrap_or(false) {
            facts.has_approved_generic = true;
        }
        if let Some(name) = product.get("name").and_then(Value::as_str) {
            if !facts.generic_products.iter().any(|p| p == name) {
                facts.generic_products.push(name.to_string());
            }
        }
    }
    Ok(facts)
}

fn product_entries(raw: &Value) -> Result<Vec<&Map<String, Value>>, String> {
    match raw {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => match map.get("product") {
            Some(nested) => product_entries(nested),
            None if map.is_empty() => Ok(Vec::new()),
            None => Ok(vec![map]),
        },
        Value::Array(items) => {
            let mut out = Vec::new();
            for item in items {
                out.extend(product_entries(item)?);
            }
            Ok(out)
        }
        other => Err(format!("unexpected product data: {other}")),
    }
}

/// `true`/`false` as a JSON bool or string.
fn flag(product: &Map<String, Value>, key: &str) -> Option<bool> {
    match product.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => Some(s.trim().eq_ignore_ascii_case("true")),
        _ => None,
    }
}

pub fn score_products(data: &ProductData, points: &Points) -> ProductScore {
    match data {
        ProductData::Facts(facts) => {
            let met = facts.has_generic && facts.has_approved_generic;
            ProductScore {
                has_generic: facts.has_generic,
                has_approved_generic: facts.has_approved_generic,
                penalized: !met,
                points: points.award(met),
            }
        }
        ProductData::Unknown | ProductData::Malformed(_) => ProductScore {
            penalized: true,
            points: points.penalty,
            ..ProductScore::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn facts(raw: Value) -> ProductFacts {
        parse_products(&raw).unwrap()
    }

    #[test]
    fn test_approved_generic_rewarded() {
        let parsed = facts(json!([
            {"name": "Brand", "generic": "false", "approved": "true"},
            {"name": "Generic A", "generic": "true", "approved": "true"}
        ]));
        assert_eq!(parsed.generic_products, vec!["Generic A"]);
        let score = score_products(&ProductData::Facts(parsed), &Points::default());
        assert!(score.has_generic && score.has_approved_generic);
        assert_eq!(score.points, 1);
    }

    #[test]
    fn test_unapproved_generic_penalised() {
        let parsed = facts(json!({"product": {"name": "G", "generic": true, "approved": false}}));
        assert!(parsed.has_generic);
        assert!(!parsed.has_approved_generic);
        let score = score_products(&ProductData::Facts(parsed), &Points::default());
        assert_eq!(score.points, -1);
    }

    #[test]
    fn test_no_products_penalised() {
        let parsed = facts(json!(null));
        assert_eq!(parsed, ProductFacts::default());
        let score = score_products(&ProductData::Unknown, &Points::new(2, -3));
        assert!(score.penalized);
        assert_eq!(score.points, -3);
    }

    #[test]
    fn test_missing_generic_flag_is_malformed() {
        assert!(parse_products(&json!([{"name": "X", "approved": "true"}])).is_err());
    }
}
