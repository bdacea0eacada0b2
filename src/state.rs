use std::collections::VecDeque;

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};

use crate::arena::{Arena, BattleError, Preview, PredictionResult};
use crate::classifier::Classifier;

pub const MAX_LOGS: usize = 200;
pub const MAX_HISTORY: usize = 20;
const MAX_INPUT_CHARS: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    First,
    Second,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Prediction(PredictionResult),
    Error(String),
}

/// One finished battle, kept for the history panel and the session file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub p1: String,
    pub p2: String,
    pub winner: String,
    pub p_first: f64,
    #[serde(default)]
    pub at: String,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub p1_input: String,
    pub p2_input: String,
    pub focus: InputField,
    pub preview: Option<Preview>,
    pub outcome: Option<Outcome>,
    pub importances: Vec<(String, f64)>,
    pub history: VecDeque<BattleRecord>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(p1: impl Into<String>, p2: impl Into<String>) -> Self {
        Self {
            p1_input: p1.into(),
            p2_input: p2.into(),
            focus: InputField::First,
            preview: None,
            outcome: None,
            importances: Vec::new(),
            history: VecDeque::with_capacity(MAX_HISTORY),
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
        }
    }

    pub fn focused_input(&self) -> &str {
        match self.focus {
            InputField::First => &self.p1_input,
            InputField::Second => &self.p2_input,
        }
    }

    fn focused_input_mut(&mut self) -> &mut String {
        match self.focus {
            InputField::First => &mut self.p1_input,
            InputField::Second => &mut self.p2_input,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            InputField::First => InputField::Second,
            InputField::Second => InputField::First,
        };
    }

    /// Returns true when the input changed.
    pub fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let input = self.focused_input_mut();
        if input.chars().count() >= MAX_INPUT_CHARS {
            return false;
        }
        input.push(ch);
        self.outcome = None;
        true
    }

    pub fn pop_char(&mut self) -> bool {
        let changed = self.focused_input_mut().pop().is_some();
        if changed {
            self.outcome = None;
        }
        changed
    }

    pub fn clear_focused(&mut self) -> bool {
        let input = self.focused_input_mut();
        if input.is_empty() {
            return false;
        }
        input.clear();
        self.outcome = None;
        true
    }

    pub fn set_inputs(&mut self, p1: impl Into<String>, p2: impl Into<String>) {
        self.p1_input = p1.into();
        self.p2_input = p2.into();
        self.outcome = None;
    }

    /// Recomputes the image preview from the current inputs. Never predicts.
    pub fn refresh_preview<C: Classifier>(&mut self, arena: &Arena<C>) {
        self.preview = arena.preview(&self.p1_input, &self.p2_input).ok();
    }

    pub fn run_battle<C: Classifier>(&mut self, arena: &Arena<C>) {
        match arena.battle(&self.p1_input, &self.p2_input) {
            Ok(result) => {
                self.push_log(format!(
                    "[INFO] {} vs {}: {}",
                    result.first.display_name,
                    result.second.display_name,
                    result.winner_text()
                ));
                self.record_battle(&result);
                self.outcome = Some(Outcome::Prediction(result));
            }
            Err(err) => {
                match &err {
                    BattleError::NotFound { missing } => {
                        self.push_log(format!("[WARN] Unknown names: {}", missing.join(", ")))
                    }
                    BattleError::Schema(_) => self.push_log(format!("[ERROR] {err}")),
                }
                self.outcome = Some(Outcome::Error(err.to_string()));
            }
        }
    }

    pub fn record_battle(&mut self, result: &PredictionResult) {
        self.history.push_front(BattleRecord {
            p1: result.first.display_name.clone(),
            p2: result.second.display_name.clone(),
            winner: result.winner().display_name.clone(),
            p_first: result.p_first,
            at: Utc::now().to_rfc3339(),
        });
        self.history.truncate(MAX_HISTORY);
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let line = format!("{} {}", Local::now().format("%H:%M:%S"), msg.into());
        self.logs.push_back(line);
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_edits_the_focused_input_and_clears_the_outcome() {
        let mut state = AppState::new("Bulbasaur", "Squirtle");
        state.outcome = Some(Outcome::Error("x".into()));
        state.toggle_focus();
        assert!(state.pop_char());
        assert!(state.push_char('E'));
        assert_eq!(state.p2_input, "SquirtlE");
        assert_eq!(state.p1_input, "Bulbasaur");
        assert!(state.outcome.is_none());
        assert!(!state.push_char('\n'));
    }

    #[test]
    fn clear_focused_reports_no_change_when_empty() {
        let mut state = AppState::new("", "Squirtle");
        assert!(!state.clear_focused());
        assert!(!state.pop_char());
    }

    #[test]
    fn logs_are_bounded() {
        let mut state = AppState::new("a", "b");
        for i in 0..(MAX_LOGS + 10) {
            state.push_log(format!("[INFO] {i}"));
        }
        assert_eq!(state.logs.len(), MAX_LOGS);
        assert!(state.logs.back().unwrap().ends_with(&format!("[INFO] {}", MAX_LOGS + 9)));
    }
}
