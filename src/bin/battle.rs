use anyhow::{Result, bail};

use poke_sight::arena::Arena;
use poke_sight::config::{self, Settings};

struct Args {
    p1: String,
    p2: String,
    json: bool,
}

fn parse_args() -> Result<Args> {
    let mut json = false;
    let mut names = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
            continue;
        }
        names.push(arg);
    }

    let mut names = names.into_iter();
    match (names.next(), names.next(), names.next()) {
        (Some(p1), Some(p2), None) => Ok(Args { p1, p2, json }),
        _ => bail!("usage: battle [--json] <first pokemon> <second pokemon>"),
    }
}

fn main() -> Result<()> {
    config::load_dotenv();
    let args = parse_args()?;
    let settings = Settings::from_env();
    let arena = Arena::from_settings(&settings)?;

    let result = arena.battle(&args.p1, &args.p2)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let [first_line, second_line] = result.probability_lines();
    println!("{}", result.winner_text());
    println!("Prediction Probabilities:");
    println!("- {first_line}");
    println!("- {second_line}");
    println!("{}: {}", result.first.display_name, result.first.image_url);
    println!("{}: {}", result.second.display_name, result.second.image_url);
    Ok(())
}
