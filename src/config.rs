use std::env;
use std::path::PathBuf;

use crate::artwork::ArtworkConfig;

pub const DEFAULT_POKEDEX_PATH: &str = "assets/pokemon.csv";
pub const DEFAULT_MODEL_PATH: &str = "assets/battle_model_v1.json";
pub const DEFAULT_P1: &str = "Bulbasaur";
pub const DEFAULT_P2: &str = "Squirtle";

/// Process-wide settings, read once from the environment after `.env` files
/// have been loaded.
#[derive(Debug, Clone)]
pub struct Settings {
    pub pokedex_path: PathBuf,
    pub model_path: PathBuf,
    pub artwork: ArtworkConfig,
    pub default_p1: String,
    pub default_p2: String,
    pub persist_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pokedex_path: PathBuf::from(DEFAULT_POKEDEX_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            artwork: ArtworkConfig::default(),
            default_p1: DEFAULT_P1.to_string(),
            default_p2: DEFAULT_P2.to_string(),
            persist_enabled: true,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        };
        let defaults = Self::default();
        let artwork = ArtworkConfig {
            base_url: get("ARTWORK_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.artwork.base_url),
            format: get("ARTWORK_FORMAT").unwrap_or(defaults.artwork.format),
            ext: get("ARTWORK_EXT")
                .map(|ext| ext.trim_start_matches('.').to_string())
                .unwrap_or(defaults.artwork.ext),
        };
        Self {
            pokedex_path: get("POKEDEX_CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.pokedex_path),
            model_path: get("BATTLE_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            artwork,
            default_p1: get("DEFAULT_P1").unwrap_or(defaults.default_p1),
            default_p2: get("DEFAULT_P2").unwrap_or(defaults.default_p2),
            persist_enabled: get("POKE_SIGHT_PERSIST")
                .and_then(|raw| parse_flag(&raw))
                .unwrap_or(defaults.persist_enabled),
        }
    }
}

/// Loads `.env.local` then `.env`; both are optional.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flag_accepts_common_spellings() {
        assert_eq!(parse_flag(" OFF "), Some(false));
        assert_eq!(parse_flag("yes"), Some(true));
        assert_eq!(parse_flag("maybe"), None);
    }

    fn settings_from(pairs: &[(&str, &str)]) -> Settings {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<std::collections::HashMap<_, _>>();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn artwork_variables_are_normalized() {
        let settings = settings_from(&[
            ("ARTWORK_BASE_URL", " https://cdn.example.test/art/ "),
            ("ARTWORK_FORMAT", "normal"),
            ("ARTWORK_EXT", ".png"),
        ]);
        assert_eq!(settings.artwork.base_url, "https://cdn.example.test/art");
        assert_eq!(settings.artwork.format, "normal");
        assert_eq!(settings.artwork.ext, "png");
        assert_eq!(
            settings.artwork.url_for_slug("mew"),
            "https://cdn.example.test/art/normal/mew.png"
        );
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let settings = settings_from(&[
            ("POKEDEX_CSV_PATH", "   "),
            ("ARTWORK_BASE_URL", ""),
            ("DEFAULT_P1", " "),
            ("POKE_SIGHT_PERSIST", ""),
        ]);
        let defaults = Settings::default();
        assert_eq!(settings.pokedex_path, defaults.pokedex_path);
        assert_eq!(settings.artwork, defaults.artwork);
        assert_eq!(settings.default_p1, "Bulbasaur");
        assert!(settings.persist_enabled);
    }

    #[test]
    fn paths_inputs_and_persist_flag_are_read() {
        let settings = settings_from(&[
            ("POKEDEX_CSV_PATH", "data/dex.csv"),
            ("BATTLE_MODEL_PATH", "data/model.json"),
            ("DEFAULT_P1", "Pikachu"),
            ("DEFAULT_P2", " Gengar "),
            ("POKE_SIGHT_PERSIST", "off"),
        ]);
        assert_eq!(settings.pokedex_path, PathBuf::from("data/dex.csv"));
        assert_eq!(settings.model_path, PathBuf::from("data/model.json"));
        assert_eq!(settings.default_p1, "Pikachu");
        assert_eq!(settings.default_p2, "Gengar");
        assert!(!settings.persist_enabled);

        let unknown = settings_from(&[("POKE_SIGHT_PERSIST", "maybe")]);
        assert!(unknown.persist_enabled);
    }

    #[test]
    fn defaults_point_at_bundled_assets() {
        let settings = Settings::default();
        assert_eq!(settings.pokedex_path, PathBuf::from("assets/pokemon.csv"));
        assert_eq!(settings.default_p1, "Bulbasaur");
        assert_eq!(settings.default_p2, "Squirtle");
        assert!(settings.persist_enabled);
    }
}
