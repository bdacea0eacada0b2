use serde::{Deserialize, Serialize};

use crate::dex::PokemonRecord;

pub const P1_PREFIX: &str = "p1_";
pub const P2_PREFIX: &str = "p2_";
pub const GOES_FIRST_COLUMN: &str = "p1_goes_first";

/// Raw identifiers the classifier never saw during training.
pub const IDENTIFIER_COLUMNS: [&str; 4] = ["p1_#", "p1_Name", "p2_#", "p2_Name"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl FeatureValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(v) => Some(*v),
            FeatureValue::Flag(true) => Some(1.0),
            FeatureValue::Flag(false) => Some(0.0),
            FeatureValue::Text(raw) => raw.trim().parse::<f64>().ok(),
        }
    }

    pub fn as_category(&self) -> String {
        match self {
            FeatureValue::Number(v) => v.to_string(),
            FeatureValue::Text(raw) => raw.clone(),
            FeatureValue::Flag(b) => b.to_string(),
        }
    }
}

/// One feature row for a single prediction. Column order follows assembly
/// order; lookups are by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchupRow {
    columns: Vec<(String, FeatureValue)>,
}

impl MatchupRow {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Replaces the value if the column exists, appends it otherwise.
    pub fn set(&mut self, column: impl Into<String>, value: FeatureValue) {
        let column = column.into();
        if let Some(slot) = self.columns.iter_mut().find(|(name, _)| *name == column) {
            slot.1 = value;
        } else {
            self.columns.push((column, value));
        }
    }

    /// Removes the named columns; names that are absent are ignored.
    pub fn drop_columns(&mut self, names: &[&str]) {
        self.columns.retain(|(name, _)| !names.contains(&name.as_str()));
    }
}

pub fn assemble(p1: &PokemonRecord, p2: &PokemonRecord) -> MatchupRow {
    assemble_columns(p1.columns(), p2.columns())
}

/// Prefixes both attribute sets, marks the first entity as moving first and
/// strips identifier columns.
pub fn assemble_columns<K1, K2>(
    p1: impl IntoIterator<Item = (K1, FeatureValue)>,
    p2: impl IntoIterator<Item = (K2, FeatureValue)>,
) -> MatchupRow
where
    K1: AsRef<str>,
    K2: AsRef<str>,
{
    let mut row = MatchupRow::with_capacity(32);
    for (name, value) in p1 {
        row.set(format!("{P1_PREFIX}{}", name.as_ref()), value);
    }
    for (name, value) in p2 {
        row.set(format!("{P2_PREFIX}{}", name.as_ref()), value);
    }
    row.set(GOES_FIRST_COLUMN, FeatureValue::Flag(true));
    row.drop_columns(&IDENTIFIER_COLUMNS);
    row
}
