//! Error types for loading data and building scales.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::Field;

/// A field name that is not part of the dataset (or not valid for the requested axis).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field `{0}`")]
pub struct UnknownField(pub String);

/// Failure while reading the state CSV.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing column `{0}` in CSV header")]
    MissingColumn(&'static str),
    #[error("row {row}: column `{column}` holds {raw:?}, expected a finite non-negative number")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        raw: String,
    },
}

/// Failure while deriving a scale from records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaleError {
    #[error("no records to derive a `{0}` scale from")]
    Empty(Field),
}
