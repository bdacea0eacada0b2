use anyhow::Result;
use serde::Serialize;
use thiserror::Error;

use crate::artwork::ArtworkConfig;
use crate::classifier::{BattleModel, Classifier, FIRST_WINS, SchemaError};
use crate::config::Settings;
use crate::dex::{Pokedex, PokemonRecord};
use crate::matchup;
use crate::slug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    /// Either or both names failed lookup; no prediction was attempted.
    #[error("One or both Pokémon names not found. Please check your spelling.")]
    NotFound { missing: Vec<String> },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    First,
    Second,
}

/// A resolved entity as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contender {
    pub display_name: String,
    pub slug: String,
    pub image_url: String,
    pub types: String,
    pub base_stat_total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub first: Contender,
    pub second: Contender,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub first: Contender,
    pub second: Contender,
    pub winner: Side,
    pub p_first: f64,
    pub p_second: f64,
}

impl PredictionResult {
    pub fn winner(&self) -> &Contender {
        match self.winner {
            Side::First => &self.first,
            Side::Second => &self.second,
        }
    }

    pub fn winner_text(&self) -> String {
        format!("{} wins!", self.winner().display_name)
    }

    pub fn probability_lines(&self) -> [String; 2] {
        [
            format!("{} Wins: {}", self.first.display_name, format_percent(self.p_first)),
            format!(
                "{} Wins: {}",
                self.second.display_name,
                format_percent(self.p_second)
            ),
        ]
    }
}

pub fn format_percent(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

/// Everything a request needs, built once and only ever borrowed.
#[derive(Debug, Clone)]
pub struct Arena<C = BattleModel> {
    dex: Pokedex,
    model: C,
    artwork: ArtworkConfig,
}

impl Arena<BattleModel> {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let dex = Pokedex::load_or_embedded(&settings.pokedex_path)?;
        let model = BattleModel::load_or_embedded(&settings.model_path)?;
        Ok(Self::new(dex, model, settings.artwork.clone()))
    }

    pub fn embedded() -> Result<Self> {
        Ok(Self::new(
            Pokedex::embedded()?,
            BattleModel::embedded()?,
            ArtworkConfig::default(),
        ))
    }
}

impl<C: Classifier> Arena<C> {
    pub fn new(dex: Pokedex, model: C, artwork: ArtworkConfig) -> Self {
        Self {
            dex,
            model,
            artwork,
        }
    }

    pub fn dex(&self) -> &Pokedex {
        &self.dex
    }

    pub fn model(&self) -> &C {
        &self.model
    }

    pub fn artwork(&self) -> &ArtworkConfig {
        &self.artwork
    }

    pub fn contender(&self, record: &PokemonRecord) -> Contender {
        let slug = slug::normalize(&record.name);
        Contender {
            display_name: record.name.clone(),
            image_url: self.artwork.url_for_slug(&slug),
            slug,
            types: record.type_label(),
            base_stat_total: record.base_stat_total(),
        }
    }

    /// Looks both names up without touching the classifier.
    pub fn preview(&self, p1: &str, p2: &str) -> Result<Preview, BattleError> {
        let (r1, r2) = self.resolve(p1, p2)?;
        Ok(Preview {
            first: self.contender(r1),
            second: self.contender(r2),
        })
    }

    /// Full prediction; the first-listed entity is always assumed to move first.
    pub fn battle(&self, p1: &str, p2: &str) -> Result<PredictionResult, BattleError> {
        let (r1, r2) = self.resolve(p1, p2)?;
        let row = matchup::assemble(r1, r2);
        let label = self.model.predict(&row)?;
        let proba = self.model.predict_proba(&row)?;
        Ok(PredictionResult {
            first: self.contender(r1),
            second: self.contender(r2),
            winner: if label == FIRST_WINS {
                Side::First
            } else {
                Side::Second
            },
            p_first: proba[1],
            p_second: proba[0],
        })
    }

    fn resolve(
        &self,
        p1: &str,
        p2: &str,
    ) -> Result<(&PokemonRecord, &PokemonRecord), BattleError> {
        match (self.dex.find_by_name(p1), self.dex.find_by_name(p2)) {
            (Some(r1), Some(r2)) => Ok((r1, r2)),
            (r1, r2) => {
                let mut missing = Vec::with_capacity(2);
                if r1.is_none() {
                    missing.push(p1.trim().to_string());
                }
                if r2.is_none() {
                    missing.push(p2.trim().to_string());
                }
                Err(BattleError::NotFound { missing })
            }
        }
    }
}
