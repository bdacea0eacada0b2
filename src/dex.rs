use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::matchup::FeatureValue;

/// Stored in place of a missing secondary type.
pub const NONE_TYPE: &str = "None";

const EMBEDDED_POKEDEX: &str = include_str!("../assets/pokemon.csv");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonRecord {
    #[serde(rename = "#")]
    pub number: u32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type1")]
    pub type1: String,
    #[serde(rename = "Type2", deserialize_with = "type_or_none")]
    pub type2: String,
    #[serde(rename = "HP")]
    pub hp: u32,
    #[serde(rename = "Attack")]
    pub attack: u32,
    #[serde(rename = "Defense")]
    pub defense: u32,
    #[serde(rename = "Sp. Atk")]
    pub sp_atk: u32,
    #[serde(rename = "Sp. Def")]
    pub sp_def: u32,
    #[serde(rename = "Speed")]
    pub speed: u32,
    #[serde(rename = "Generation")]
    pub generation: u8,
    #[serde(rename = "Legendary", deserialize_with = "loose_bool")]
    pub legendary: bool,
}

impl PokemonRecord {
    /// All columns in file order, identifiers included.
    pub fn columns(&self) -> Vec<(&'static str, FeatureValue)> {
        vec![
            ("#", FeatureValue::Number(self.number as f64)),
            ("Name", FeatureValue::Text(self.name.clone())),
            ("Type1", FeatureValue::Text(self.type1.clone())),
            ("Type2", FeatureValue::Text(self.type2.clone())),
            ("HP", FeatureValue::Number(self.hp as f64)),
            ("Attack", FeatureValue::Number(self.attack as f64)),
            ("Defense", FeatureValue::Number(self.defense as f64)),
            ("Sp. Atk", FeatureValue::Number(self.sp_atk as f64)),
            ("Sp. Def", FeatureValue::Number(self.sp_def as f64)),
            ("Speed", FeatureValue::Number(self.speed as f64)),
            ("Generation", FeatureValue::Number(self.generation as f64)),
            ("Legendary", FeatureValue::Flag(self.legendary)),
        ]
    }

    pub fn base_stat_total(&self) -> u32 {
        self.hp + self.attack + self.defense + self.sp_atk + self.sp_def + self.speed
    }

    pub fn type_label(&self) -> String {
        if self.type2 == NONE_TYPE {
            self.type1.clone()
        } else {
            format!("{}/{}", self.type1, self.type2)
        }
    }
}

/// Read-only entity table, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct Pokedex {
    records: Vec<PokemonRecord>,
}

impl Pokedex {
    pub fn from_records(records: Vec<PokemonRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut duplicates = Vec::new();
        for record in &records {
            let key = record.name.trim().to_lowercase();
            if !seen.insert(key) {
                duplicates.push(record.name.clone());
            }
        }
        if !duplicates.is_empty() {
            return Err(anyhow!(
                "duplicate pokemon names (case-insensitive): {}",
                duplicates.join(", ")
            ));
        }
        Ok(Self { records })
    }

    pub fn from_csv_str(raw: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(raw.as_bytes());
        let mut records = Vec::with_capacity(1024);
        for (idx, row) in reader.deserialize::<PokemonRecord>().enumerate() {
            // Header is line 1.
            let record = row.with_context(|| format!("parse pokedex row {}", idx + 2))?;
            records.push(record);
        }
        Self::from_records(records)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read pokedex {}", path.display()))?;
        Self::from_csv_str(&raw).with_context(|| format!("load pokedex {}", path.display()))
    }

    /// The table bundled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_csv_str(EMBEDDED_POKEDEX).context("load embedded pokedex")
    }

    /// Loads `path` when it exists; falls back to the bundled table otherwise.
    pub fn load_or_embedded(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Self::embedded()
        }
    }

    /// Case- and surrounding-whitespace-insensitive exact match.
    pub fn find_by_name(&self, query: &str) -> Option<&PokemonRecord> {
        let want = query.trim().to_lowercase();
        if want.is_empty() {
            return None;
        }
        self.records
            .iter()
            .find(|record| record.name.to_lowercase() == want)
    }

    pub fn records(&self) -> &[PokemonRecord] {
        &self.records
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn type_or_none<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NONE_TYPE.to_string()))
}

fn loose_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(D::Error::custom(format!("invalid boolean {other:?}"))),
    }
}
