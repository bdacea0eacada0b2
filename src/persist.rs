use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::state::{AppState, BattleRecord, MAX_HISTORY};

const CACHE_DIR: &str = "poke_sight";
const CACHE_FILE: &str = "session.json";
const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct SessionFile {
    version: u32,
    #[serde(default)]
    p1: String,
    #[serde(default)]
    p2: String,
    #[serde(default)]
    history: Vec<BattleRecord>,
}

/// Restores inputs and history from the default session file, if any.
pub fn load_into_state(state: &mut AppState) {
    if let Some(path) = cache_path() {
        load_from_path(&path, state);
    }
}

pub fn save_from_state(state: &AppState) {
    if let Some(path) = cache_path() {
        save_to_path(&path, state);
    }
}

pub fn load_from_path(path: &Path, state: &mut AppState) {
    let Ok(raw) = fs::read_to_string(path) else {
        return;
    };
    let Ok(session) = serde_json::from_str::<SessionFile>(&raw) else {
        return;
    };
    if session.version != CACHE_VERSION {
        return;
    }

    if !session.p1.trim().is_empty() && !session.p2.trim().is_empty() {
        state.set_inputs(session.p1, session.p2);
    }
    state.history = session.history.into_iter().take(MAX_HISTORY).collect();
}

pub fn save_to_path(path: &Path, state: &AppState) {
    let Some(dir) = path.parent() else {
        return;
    };
    let _ = fs::create_dir_all(dir);

    let session = SessionFile {
        version: CACHE_VERSION,
        p1: state.p1_input.clone(),
        p2: state.p2_input.clone(),
        history: state.history.iter().cloned().collect(),
    };
    if let Ok(json) = serde_json::to_string(&session) {
        let tmp = path.with_extension("json.tmp");
        if fs::write(&tmp, json).is_ok() {
            let _ = fs::rename(&tmp, path);
        }
    }
}

fn cache_path() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(CACHE_FILE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_session_path(tag: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("poke_sight_test_{}_{tag}", std::process::id()))
            .join(CACHE_FILE)
    }

    #[test]
    fn session_round_trips_inputs_and_history() {
        let path = temp_session_path("roundtrip");
        let mut state = AppState::new("Pikachu", "Gengar");
        state.history.push_back(BattleRecord {
            p1: "Pikachu".into(),
            p2: "Gengar".into(),
            winner: "Gengar".into(),
            p_first: 0.41,
            at: "2025-01-01T00:00:00Z".into(),
        });
        save_to_path(&path, &state);

        let mut restored = AppState::new("Bulbasaur", "Squirtle");
        load_from_path(&path, &mut restored);
        assert_eq!(restored.p1_input, "Pikachu");
        assert_eq!(restored.p2_input, "Gengar");
        assert_eq!(restored.history.len(), 1);
        assert_eq!(restored.history[0].winner, "Gengar");

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn corrupt_or_stale_sessions_are_ignored() {
        let path = temp_session_path("stale");
        fs::create_dir_all(path.parent().unwrap()).unwrap();

        fs::write(&path, "{not json").unwrap();
        let mut state = AppState::new("Bulbasaur", "Squirtle");
        load_from_path(&path, &mut state);
        assert_eq!(state.p1_input, "Bulbasaur");

        fs::write(&path, r#"{"version":99,"p1":"Mew","p2":"Mewtwo"}"#).unwrap();
        load_from_path(&path, &mut state);
        assert_eq!(state.p1_input, "Bulbasaur");

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn history_survives_a_session_without_inputs() {
        let path = temp_session_path("no_inputs");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"{"version":1,"history":[{"p1":"Mew","p2":"Mewtwo","winner":"Mewtwo","p_first":0.2}]}"#,
        )
        .unwrap();

        let mut state = AppState::new("Bulbasaur", "Squirtle");
        load_from_path(&path, &mut state);
        assert_eq!(state.p1_input, "Bulbasaur");
        assert_eq!(state.p2_input, "Squirtle");
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].winner, "Mewtwo");

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
