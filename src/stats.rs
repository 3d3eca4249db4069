use crate::models::{Field, StateRecord};
use serde::{Deserialize, Serialize};

/// Summary statistics for one numeric field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub field: Field,
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute statistics for a single field.
pub fn summarize(records: &[StateRecord], field: Field) -> Summary {
    let mut vals: Vec<f64> = records.iter().map(|r| field.value(r)).collect();
    vals.sort_by(f64::total_cmp);
    let count = vals.len();
    let min = vals.first().cloned();
    let max = vals.last().cloned();
    let mean = if count > 0 {
        Some(vals.iter().copied().sum::<f64>() / count as f64)
    } else {
        None
    };
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };
    Summary {
        field,
        count,
        min,
        max,
        mean,
        median,
    }
}

/// Statistics for every numeric field, in column order.
pub fn field_summary(records: &[StateRecord]) -> Vec<Summary> {
    Field::ALL.iter().map(|&f| summarize(records, f)).collect()
}
