use std::path::PathBuf;

use anyhow::{Result, bail};

use poke_sight::arena::{Arena, format_percent};
use poke_sight::config::{self, Settings};
use poke_sight::report_export::export_round_robin;
use poke_sight::round_robin::round_robin;

#[derive(Debug, Default)]
struct Args {
    names: Vec<String>,
    all: bool,
    xlsx: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let raw = std::env::args().skip(1).collect::<Vec<_>>();
    let mut args = Args::default();
    let mut idx = 0;
    while idx < raw.len() {
        let arg = &raw[idx];
        if arg == "--all" {
            args.all = true;
        } else if let Some(path) = arg.strip_prefix("--xlsx=") {
            args.xlsx = Some(PathBuf::from(path));
        } else if arg == "--xlsx" {
            let Some(next) = raw.get(idx + 1) else {
                bail!("--xlsx needs a path");
            };
            args.xlsx = Some(PathBuf::from(next));
            idx += 1;
        } else {
            args.names.push(arg.clone());
        }
        idx += 1;
    }
    Ok(args)
}

fn main() -> Result<()> {
    config::load_dotenv();
    let args = parse_args()?;
    let settings = Settings::from_env();
    let arena = Arena::from_settings(&settings)?;

    let roster = if args.all {
        arena.dex().names().map(str::to_string).collect::<Vec<_>>()
    } else {
        args.names
    };
    if roster.len() < 2 {
        bail!("usage: round_robin [--all | <name> <name> ...] [--xlsx <path>]");
    }

    let report = round_robin(&arena, &roster)?;
    println!(
        "{:>4}  {:<28} {:>7} {:>5} {:>11}",
        "Rank", "Pokemon", "Battles", "Wins", "Mean Win %"
    );
    for (idx, s) in report.standings.iter().enumerate() {
        println!(
            "{:>4}  {:<28} {:>7} {:>5} {:>11}",
            idx + 1,
            s.name,
            s.battles,
            s.wins,
            format_percent(s.mean_win_prob)
        );
    }

    if let Some(path) = args.xlsx {
        let summary = export_round_robin(&path, &report)?;
        println!(
            "Wrote {} standings and {} battles to {}",
            summary.standings,
            summary.battles,
            path.display()
        );
    }
    Ok(())
}
