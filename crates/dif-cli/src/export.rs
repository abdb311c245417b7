//! CSV output of result tables.

use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Write `rows` to `output` as CSV and, when `verbose`, print them to stdout.
pub fn emit<T: Serialize>(rows: &[T], output: Option<&Path>, verbose: bool) -> anyhow::Result<()> {
    if let Some(path) = output {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        write_csv(rows, file)?;
        info!(rows = rows.len(), path = %path.display(), "Results written");
    }
    if verbose {
        write_csv(rows, std::io::stdout().lock())?;
    }
    Ok(())
}

pub fn write_csv<T: Serialize, W: Write>(rows: &[T], writer: W) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Hit {
        drug: String,
        points: Option<i64>,
    }

    #[test]
    fn test_csv_has_header_and_empty_options() {
        let rows = vec![
            Hit { drug: "D1".into(), points: Some(2) },
            Hit { drug: "D2".into(), points: None },
        ];
        let mut buf = Vec::new();
        write_csv(&rows, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "drug,points\nD1,2\nD2,\n");
    }

    #[test]
    fn test_emit_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        emit(&[Hit { drug: "D1".into(), points: None }], Some(&path), false).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("drug,points"));
    }
}
