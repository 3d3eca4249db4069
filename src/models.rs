use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownField;

/// One row of the state dataset (one row = one U.S. state).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateRecord {
    pub state: String,
    pub abbr: String,
    /// Share of the population in poverty (%).
    pub poverty: f64,
    /// Median household income.
    pub income: f64,
    /// Median age.
    pub age: f64,
    /// Share of the population lacking healthcare (%).
    pub healthcare: f64,
    /// Share of smokers (%).
    pub smokes: f64,
    /// Share of obese adults (%).
    pub obesity: f64,
}

/// Every numeric column of a [`StateRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Poverty,
    Income,
    Age,
    Healthcare,
    Smokes,
    Obesity,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Poverty,
        Field::Income,
        Field::Age,
        Field::Healthcare,
        Field::Smokes,
        Field::Obesity,
    ];

    /// CSV column name.
    pub fn key(self) -> &'static str {
        match self {
            Field::Poverty => "poverty",
            Field::Income => "income",
            Field::Age => "age",
            Field::Healthcare => "healthcare",
            Field::Smokes => "smokes",
            Field::Obesity => "obesity",
        }
    }

    pub fn value(self, record: &StateRecord) -> f64 {
        match self {
            Field::Poverty => record.poverty,
            Field::Income => record.income,
            Field::Age => record.age,
            Field::Healthcare => record.healthcare,
            Field::Smokes => record.smokes,
            Field::Obesity => record.obesity,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Field::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// A field that may be plotted on one of the two chart axes.
///
/// Implemented by [`XField`] and [`YField`], which restrict each axis to its
/// permissible set of fields.
pub trait AxisField: Copy + Eq + fmt::Debug + 'static {
    /// Permissible fields for this axis, in label order.
    const ALL: &'static [Self];

    fn field(self) -> Field;

    /// Clickable axis label text.
    fn axis_label(self) -> &'static str;

    /// Prefix used for this field in the hover tooltip.
    fn tooltip_label(self) -> &'static str;

    fn key(self) -> &'static str {
        self.field().key()
    }

    fn value(self, record: &StateRecord) -> f64 {
        self.field().value(record)
    }
}

/// Fields selectable on the horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XField {
    #[default]
    Poverty,
    Age,
    Income,
}

/// Fields selectable on the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YField {
    #[default]
    Healthcare,
    Smokes,
    Obesity,
}

impl AxisField for XField {
    const ALL: &'static [Self] = &[XField::Poverty, XField::Age, XField::Income];

    fn field(self) -> Field {
        match self {
            XField::Poverty => Field::Poverty,
            XField::Age => Field::Age,
            XField::Income => Field::Income,
        }
    }

    fn axis_label(self) -> &'static str {
        match self {
            XField::Poverty => "In Poverty (%)",
            XField::Age => "Age (Median)",
            XField::Income => "Household Income (Median)",
        }
    }

    fn tooltip_label(self) -> &'static str {
        match self {
            XField::Poverty => "In Poverty:",
            XField::Age => "Median Age:",
            XField::Income => "Median Income:",
        }
    }
}

impl AxisField for YField {
    // Label order from top to bottom once rotated: obesity outermost.
    const ALL: &'static [Self] = &[YField::Obesity, YField::Smokes, YField::Healthcare];

    fn field(self) -> Field {
        match self {
            YField::Healthcare => Field::Healthcare,
            YField::Smokes => Field::Smokes,
            YField::Obesity => Field::Obesity,
        }
    }

    fn axis_label(self) -> &'static str {
        match self {
            YField::Healthcare => "Lacks Healthcare (%)",
            YField::Smokes => "Smokes (%)",
            YField::Obesity => "Obese (%)",
        }
    }

    fn tooltip_label(self) -> &'static str {
        match self {
            YField::Healthcare => "Lacks Healthcare:",
            YField::Smokes => "Smokes:",
            YField::Obesity => "Obese",
        }
    }
}

fn parse_axis_field<F: AxisField>(s: &str) -> Result<F, UnknownField> {
    let field: Field = s.parse()?;
    F::ALL
        .iter()
        .copied()
        .find(|f| f.field() == field)
        .ok_or_else(|| UnknownField(s.to_string()))
}

impl FromStr for XField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_axis_field(s)
    }
}

impl FromStr for YField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_axis_field(s)
    }
}

impl fmt::Display for XField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl fmt::Display for YField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Which axis a field or label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// The currently chosen field per axis.
///
/// Immutable: selecting a field yields a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSelection {
    pub x: XField,
    pub y: YField,
}

impl AxisSelection {
    pub fn new(x: XField, y: YField) -> Self {
        Self { x, y }
    }

    pub fn with_x(self, x: XField) -> Self {
        Self { x, ..self }
    }

    pub fn with_y(self, y: YField) -> Self {
        Self { y, ..self }
    }
}
