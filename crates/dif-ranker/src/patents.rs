//! Patent facts and patent scoring.
//!
//! The graph store nests patent entries under a `patent` key holding either a
//! single object or a list of `{number, expires}` objects.

use chrono::NaiveDate;
use dif_db::PatentRow;
use serde::Serialize;
use serde_json::Value;

use crate::points::Points;

const EXPIRY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatentFacts {
    pub has_patent: bool,
    /// True only when every patent expired before the evaluation date.
    pub expired: bool,
    pub patent_numbers: Vec<String>,
}

impl PatentFacts {
    pub fn to_row(&self, drug_name: &str) -> PatentRow {
        PatentRow {
            drug_name: drug_name.to_string(),
            has_patent: self.has_patent,
            expired: self.expired,
            patent_numbers: self.patent_numbers.join("|"),
        }
    }
}

impl From<PatentRow> for PatentFacts {
    fn from(row: PatentRow) -> Self {
        Self {
            has_patent: row.has_patent,
            expired: row.expired,
            patent_numbers: row
                .patent_numbers
                .split('|')
                .filter(|n| !n.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

/// Patent state of one drug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PatentData {
    /// Not looked up, or no DrugBank id to look up with.
    #[default]
    Unknown,
    Facts(PatentFacts),
    /// The graph returned something that could not be read.
    Malformed(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PatentScore {
    pub has_patent: bool,
    pub expired: bool,
    /// Scored the penalty.
    pub penalized: bool,
    pub points: i64,
}

/// Read raw patent data as returned by the graph store.
pub fn parse_patents(raw: &Value, today: NaiveDate) -> Result<PatentFacts, String> {
    let entries = patent_entries(raw)?;
    let mut facts = PatentFacts::default();
    let mut all_expired = true;

    for entry in entries {
        let number = match entry.get("number") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err("patent entry without a number".to_string()),
        };
        let expires = entry
            .get("expires")
            .and_then(Value::as_str)
            .ok_or_else(|| format!("patent {number} has no expiry date"))?;
        let expires = NaiveDate::parse_from_str(expires.trim(), EXPIRY_FORMAT)
            .map_err(|e| format!("patent {number} expiry {expires:?}: {e}"))?;

        all_expired &= expires < today;
        facts.patent_numbers.push(number);
    }

    facts.has_patent = !facts.patent_numbers.is_empty();
    facts.expired = facts.has_patent && all_expired;
    Ok(facts)
}

fn patent_entries(raw: &Value) -> Result<Vec<&serde_json::Map<String, Value>>, String> {
    match raw {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => match map.get("patent") {
            Some(nested) => patent_entries(nested),
            None if map.is_empty() => Ok(Vec::new()),
            None => Ok(vec![map]),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_object()
                    .ok_or_else(|| format!("patent entry is not an object: {item}"))
            })
            .collect(),
        other => Err(format!("unexpected patent data: {other}")),
    }
}

pub fn score_patents(data: &PatentData, points: &Points) -> PatentScore {
    match data {
        PatentData::Facts(facts) => {
            let met = facts.has_patent && facts.expired;
            PatentScore {
                has_patent: facts.has_patent,
                expired: facts.expired,
                penalized: !met,
                points: points.award(met),
            }
        }
        PatentData::Unknown | PatentData::Malformed(_) => PatentScore {
            penalized: true,
            points: points.penalty,
            ..PatentScore::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn score_raw_patents(raw: &Value, today: NaiveDate, points: &Points) -> PatentScore {
        let data = match parse_patents(raw, today) {
            Ok(facts) => PatentData::Facts(facts),
            Err(e) => PatentData::Malformed(e),
        };
        score_patents(&data, points)
    }

    #[test]
    fn test_expired_patent_rewarded() {
        let raw = json!([{"number": "P1", "expires": "2000-01-01"}]);
        let score = score_raw_patents(&raw, today(), &Points::default());
        assert!(score.has_patent);
        assert!(score.expired);
        assert_eq!(score.points, 1);
    }

    #[test]
    fn test_active_patent_penalised() {
        let raw = json!({"patent": {"number": "P1", "expires": "2099-01-01"}});
        let score = score_raw_patents(&raw, today(), &Points::default());
        assert!(score.has_patent);
        assert!(!score.expired);
        assert!(score.penalized);
        assert_eq!(score.points, -1);
    }

    #[test]
    fn test_one_active_patent_blocks_expiry() {
        let raw = json!({"patent": [
            {"number": "P1", "expires": "2000-01-01"},
            {"number": "P2", "expires": "2099-01-01"}
        ]});
        let facts = parse_patents(&raw, today()).unwrap();
        assert_eq!(facts.patent_numbers, vec!["P1", "P2"]);
        assert!(!facts.expired);
    }

    #[test]
    fn test_no_patent_data_penalised() {
        for raw in [json!(null), json!({}), json!([])] {
            let score = score_raw_patents(&raw, today(), &Points::default());
            assert!(!score.has_patent);
            assert!(score.penalized);
            assert_eq!(score.points, -1);
        }
        let unknown = score_patents(&PatentData::Unknown, &Points::default());
        assert!(unknown.penalized);
    }

    #[test]
    fn test_unparsable_expiry_is_malformed() {
        let raw = json!([{"number": "P1", "expires": "01/01/2000"}]);
        assert!(parse_patents(&raw, today()).is_err());
        let score = score_raw_patents(&raw, today(), &Points::new(1, -4));
        assert_eq!(score.points, -4);
        assert!(score.penalized);
    }

    #[test]
    fn test_row_conversion_splits_numbers() {
        let facts = PatentFacts {
            has_patent: true,
            expired: false,
            patent_numbers: vec!["P1".into(), "P2".into()],
        };
        let row = facts.to_row("D1");
        assert_eq!(row.patent_numbers, "P1|P2");
        assert_eq!(PatentFacts::from(row), facts);
    }
}
