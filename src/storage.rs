//! Loading the state dataset from CSV, and exporting coerced records.

use crate::error::LoadError;
use crate::models::{Field, StateRecord};
use anyhow::Result;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use log::{debug, info};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Location of the dataset relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "assets/data/stateData.csv";

/// Load and coerce all rows of the state CSV at `path`.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<StateRecord>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_records(file)?;
    info!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse state rows from any CSV reader.
///
/// The header must name at least `state`, `abbr` and the six numeric columns;
/// column order is free and extra columns are ignored.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<StateRecord>, LoadError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::Headers).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let state_col = column(&headers, "state")?;
    let abbr_col = column(&headers, "abbr")?;
    let mut numeric_cols = [0usize; 6];
    for (slot, field) in numeric_cols.iter_mut().zip(Field::ALL) {
        *slot = column(&headers, field.key())?;
    }

    let mut out = Vec::new();
    for (idx, row) in rdr.records().enumerate() {
        let row = row?;
        let cell = |c: usize| row.get(c).unwrap_or("");

        let mut values = [0f64; 6];
        for ((value, field), col) in values.iter_mut().zip(Field::ALL).zip(numeric_cols) {
            let raw = cell(col);
            let v = coerce_number(raw);
            if !v.is_finite() || v < 0.0 {
                return Err(LoadError::InvalidNumber {
                    row: idx + 1,
                    column: field.key(),
                    raw: raw.to_string(),
                });
            }
            *value = v;
        }
        let [poverty, income, age, healthcare, smokes, obesity] = values;

        let record = StateRecord {
            state: cell(state_col).to_string(),
            abbr: cell(abbr_col).to_string(),
            poverty,
            income,
            age,
            healthcare,
            smokes,
            obesity,
        };
        debug!("row {}: {} ({})", idx + 1, record.state, record.abbr);
        out.push(record);
    }
    Ok(out)
}

fn column(headers: &StringRecord, name: &'static str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(LoadError::MissingColumn(name))
}

/// Numeric coercion of a text cell: blank text is zero, anything unparseable is NaN.
pub fn coerce_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Prefix cells that a spreadsheet would evaluate as a formula.
fn sanitize_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{s}"),
        _ => s.to_string(),
    }
}

/// Save records as CSV with the same header layout the loader expects.
pub fn save_csv<P: AsRef<Path>>(records: &[StateRecord], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record([
        "state",
        "abbr",
        "poverty",
        "income",
        "age",
        "healthcare",
        "smokes",
        "obesity",
    ])?;
    for r in records {
        wtr.serialize((
            sanitize_cell(&r.state),
            sanitize_cell(&r.abbr),
            r.poverty,
            r.income,
            r.age,
            r.healthcare,
            r.smokes,
            r.obesity,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save records as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(records: &[StateRecord], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(records)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
