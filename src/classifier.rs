use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matchup::MatchupRow;

const EMBEDDED_MODEL: &str = include_str!("../assets/battle_model_v1.json");

/// Label for "the first-listed entity wins".
pub const FIRST_WINS: u8 = 1;
/// Label for "the second-listed entity wins".
pub const SECOND_WINS: u8 = 0;

/// Row columns differ from the columns the classifier was trained on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "matchup schema mismatch (missing: [{}], unexpected: [{}])",
    .missing.join(", "),
    .unexpected.join(", ")
)]
pub struct SchemaError {
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
}

/// Binary classifier over matchup rows.
///
/// `predict_proba` returns `[p_second_wins, p_first_wins]`, summing to 1.
pub trait Classifier {
    fn predict_proba(&self, row: &MatchupRow) -> Result<[f64; 2], SchemaError>;

    fn predict(&self, row: &MatchupRow) -> Result<u8, SchemaError> {
        let proba = self.predict_proba(row)?;
        Ok(if proba[1] >= 0.5 {
            FIRST_WINS
        } else {
            SECOND_WINS
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericFeature {
    pub column: String,
    #[serde(default)]
    pub mean: f64,
    #[serde(default = "unit_std")]
    pub std: f64,
    pub coeff: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalFeature {
    pub column: String,
    #[serde(default)]
    pub levels: HashMap<String, f64>,
    #[serde(default)]
    pub default_coeff: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleModelArtifact {
    pub version: u32,
    pub generated_at: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub intercept: f64,
    #[serde(default)]
    pub numeric: Vec<NumericFeature>,
    #[serde(default)]
    pub categorical: Vec<CategoricalFeature>,
}

/// Standardized logistic model loaded from a JSON artifact. Immutable after
/// construction.
#[derive(Debug, Clone)]
pub struct BattleModel {
    artifact: BattleModelArtifact,
    columns: BTreeSet<String>,
}

impl BattleModel {
    pub fn from_artifact(artifact: BattleModelArtifact) -> Self {
        let columns = artifact
            .numeric
            .iter()
            .map(|f| f.column.clone())
            .chain(artifact.categorical.iter().map(|f| f.column.clone()))
            .collect();
        Self { artifact, columns }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let artifact =
            serde_json::from_str::<BattleModelArtifact>(raw).context("parse battle model")?;
        Ok(Self::from_artifact(artifact))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read battle model {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("load battle model {}", path.display()))
    }

    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_MODEL).context("load embedded battle model")
    }

    pub fn load_or_embedded(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Self::embedded()
        }
    }

    pub fn artifact(&self) -> &BattleModelArtifact {
        &self.artifact
    }

    /// Trained column set, sorted.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.as_str())
    }

    pub fn check_schema(&self, row: &MatchupRow) -> Result<(), SchemaError> {
        let row_columns = row.column_names().collect::<BTreeSet<_>>();
        let missing = self
            .columns
            .iter()
            .filter(|c| !row_columns.contains(c.as_str()))
            .cloned()
            .collect::<Vec<_>>();
        let unexpected = row_columns
            .iter()
            .filter(|c| !self.columns.contains(**c))
            .map(|c| c.to_string())
            .collect::<Vec<_>>();
        if missing.is_empty() && unexpected.is_empty() {
            Ok(())
        } else {
            Err(SchemaError {
                missing,
                unexpected,
            })
        }
    }

    /// Log-odds that the first entity wins.
    pub fn decision_function(&self, row: &MatchupRow) -> Result<f64, SchemaError> {
        self.check_schema(row)?;
        let mut z = self.artifact.intercept;
        for feature in &self.artifact.numeric {
            let raw = row
                .get(&feature.column)
                .and_then(|v| v.as_number())
                .unwrap_or(feature.mean);
            z += feature.coeff * standardized(raw, feature);
        }
        for feature in &self.artifact.categorical {
            let level = row
                .get(&feature.column)
                .map(|v| v.as_category())
                .unwrap_or_default();
            z += feature
                .levels
                .get(&level)
                .copied()
                .unwrap_or(feature.default_coeff);
        }
        Ok(z)
    }

    /// Per-column weight magnitude, largest first.
    pub fn feature_importances(&self) -> Vec<(String, f64)> {
        let mut out = self
            .artifact
            .numeric
            .iter()
            .map(|f| (f.column.clone(), f.coeff.abs()))
            .chain(self.artifact.categorical.iter().map(|f| {
                let peak = f
                    .levels
                    .values()
                    .map(|c| c.abs())
                    .fold(f.default_coeff.abs(), f64::max);
                (f.column.clone(), peak)
            }))
            .collect::<Vec<_>>();
        out.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        out
    }
}

impl Classifier for BattleModel {
    fn predict_proba(&self, row: &MatchupRow) -> Result<[f64; 2], SchemaError> {
        let p_first = sigmoid(self.decision_function(row)?);
        Ok([1.0 - p_first, p_first])
    }
}

fn standardized(raw: f64, feature: &NumericFeature) -> f64 {
    (raw - feature.mean) / feature.std.max(1e-6)
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn unit_std() -> f64 {
    1.0
}
