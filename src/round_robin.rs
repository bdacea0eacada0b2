use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::Serialize;

use crate::arena::{Arena, BattleError, PredictionResult, Side};
use crate::classifier::Classifier;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub name: String,
    pub battles: usize,
    pub wins: usize,
    pub mean_win_prob: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundRobinReport {
    pub battles: Vec<PredictionResult>,
    pub standings: Vec<Standing>,
}

/// Battles every ordered pair of distinct roster entries, each side taking a
/// turn as the first mover. All names must resolve before anything runs.
pub fn round_robin<C>(arena: &Arena<C>, names: &[String]) -> Result<RoundRobinReport, BattleError>
where
    C: Classifier + Sync,
{
    let mut missing = Vec::new();
    let mut roster = Vec::with_capacity(names.len());
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        match arena.dex().find_by_name(name) {
            Some(record) => {
                if seen.insert(record.name.clone()) {
                    roster.push(record.name.clone());
                }
            }
            None => missing.push(name.trim().to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(BattleError::NotFound { missing });
    }

    let pairs = (0..roster.len())
        .flat_map(|a| (0..roster.len()).filter(move |b| *b != a).map(move |b| (a, b)))
        .collect::<Vec<_>>();

    let battles = pairs
        .par_iter()
        .map(|&(a, b)| arena.battle(&roster[a], &roster[b]))
        .collect::<Result<Vec<_>, _>>()?;

    let standings = compute_standings(&roster, &battles);
    Ok(RoundRobinReport { battles, standings })
}

fn compute_standings(roster: &[String], battles: &[PredictionResult]) -> Vec<Standing> {
    let mut acc: HashMap<&str, (usize, usize, f64)> = roster
        .iter()
        .map(|name| (name.as_str(), (0, 0, 0.0)))
        .collect();

    for battle in battles {
        let sides = [
            (battle.first.display_name.as_str(), battle.p_first, Side::First),
            (battle.second.display_name.as_str(), battle.p_second, Side::Second),
        ];
        for (name, p, side) in sides {
            let Some(entry) = acc.get_mut(name) else {
                continue;
            };
            entry.0 += 1;
            if battle.winner == side {
                entry.1 += 1;
            }
            entry.2 += p;
        }
    }

    let mut out = acc
        .into_iter()
        .map(|(name, (battles, wins, p_sum))| Standing {
            name: name.to_string(),
            battles,
            wins,
            mean_win_prob: if battles > 0 {
                p_sum / battles as f64
            } else {
                0.0
            },
        })
        .collect::<Vec<_>>();
    out.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| b.mean_win_prob.total_cmp(&a.mean_win_prob))
            .then_with(|| a.name.cmp(&b.name))
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn every_ordered_pair_is_battled_once() {
        let arena = Arena::embedded().unwrap();
        let report =
            round_robin(&arena, &names(&["Bulbasaur", "Charmander", "Squirtle"])).unwrap();
        assert_eq!(report.battles.len(), 6);
        assert_eq!(report.standings.len(), 3);
        assert!(report.standings.iter().all(|s| s.battles == 4));
        let total_wins: usize = report.standings.iter().map(|s| s.wins).sum();
        assert_eq!(total_wins, 6);
    }

    #[test]
    fn duplicates_and_case_collapse_to_one_entry() {
        let arena = Arena::embedded().unwrap();
        let report = round_robin(&arena, &names(&["pikachu", "Pikachu ", "Gengar"])).unwrap();
        assert_eq!(report.battles.len(), 2);
        assert_eq!(report.battles[0].first.display_name, "Pikachu");
    }

    #[test]
    fn unknown_names_abort_the_run() {
        let arena = Arena::embedded().unwrap();
        let err = round_robin(&arena, &names(&["Pikachu", "Agumon", "Gabumon"])).unwrap_err();
        assert_eq!(
            err,
            BattleError::NotFound {
                missing: names(&["Agumon", "Gabumon"])
            }
        );
    }

    #[test]
    fn strongest_entry_tops_the_standings() {
        let arena = Arena::embedded().unwrap();
        let report = round_robin(&arena, &names(&["Mewtwo", "Mime Jr.", "Flabébé"])).unwrap();
        assert_eq!(report.standings[0].name, "Mewtwo");
        assert_eq!(report.standings[0].wins, 4);
    }

    #[test]
    fn standings_only_cover_the_roster() {
        let arena = Arena::embedded().unwrap();
        let battles = vec![
            arena.battle("Pikachu", "Gengar").unwrap(),
            arena.battle("Gengar", "Pikachu").unwrap(),
        ];
        let standings = compute_standings(&names(&["Pikachu", "Mew"]), &battles);
        assert_eq!(standings.len(), 2);

        let pikachu = standings.iter().find(|s| s.name == "Pikachu").unwrap();
        assert_eq!(pikachu.battles, 2);
        let expected = (battles[0].p_first + battles[1].p_second) / 2.0;
        assert!((pikachu.mean_win_prob - expected).abs() < 1e-12);

        let mew = standings.iter().find(|s| s.name == "Mew").unwrap();
        assert_eq!((mew.battles, mew.wins, mew.mean_win_prob), (0, 0, 0.0));
    }
}
