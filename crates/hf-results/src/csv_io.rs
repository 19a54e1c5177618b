//! CSV serialization of result tables.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::ResultsResult;
use crate::types::{SummaryRecord, VariableRecord};

/// Write the per-vessel summary table.
pub fn write_summary_csv<W: Write>(writer: W, records: &[SummaryRecord]) -> ResultsResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the variable-based table.
///
/// The ydot column appears only when the records carry derivatives, so the
/// header matches what was requested.
pub fn write_variable_csv<W: Write>(writer: W, records: &[VariableRecord]) -> ResultsResult<()> {
    #[derive(Serialize)]
    struct Plain<'a> {
        name: &'a str,
        time: f64,
        y: f64,
    }

    #[derive(Serialize)]
    struct WithDerivative<'a> {
        name: &'a str,
        time: f64,
        y: f64,
        ydot: f64,
    }

    let mut csv = csv::Writer::from_writer(writer);
    let with_derivative = records.iter().any(|r| r.ydot.is_some());
    for record in records {
        if with_derivative {
            csv.serialize(WithDerivative {
                name: &record.name,
                time: record.time,
                y: record.y,
                ydot: record.ydot.unwrap_or(0.0),
            })?;
        } else {
            csv.serialize(Plain {
                name: &record.name,
                time: record.time,
                y: record.y,
            })?;
        }
    }
    csv.flush()?;
    Ok(())
}

/// Write the summary table to a file path.
pub fn write_summary_csv_file(path: &Path, records: &[SummaryRecord]) -> ResultsResult<()> {
    let file = std::fs::File::create(path)?;
    write_summary_csv(file, records)
}

/// Write the variable table to a file path.
pub fn write_variable_csv_file(path: &Path, records: &[VariableRecord]) -> ResultsResult<()> {
    let file = std::fs::File::create(path)?;
    write_variable_csv(file, records)
}
