use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use xega_bench::{BenchError, BenchmarkFile, default_extract_path, extract_game};

use super::{load_benchmark, to_json_indented, write_output};

#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// Benchmark results JSON file
    pub benchmark: PathBuf,

    /// Game name to extract; omit to list the available games
    #[arg(long)]
    pub game: Option<String>,

    /// Map seed to extract; omit to list the game's seeds
    #[arg(long)]
    pub seed: Option<String>,

    /// Destination file (defaults to <benchmark dir>/<benchmark stem>/<game>_<seed>.json)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &ExtractArgs) -> Result<()> {
    let benchmark = load_benchmark(&args.benchmark)?;
    let (game, seed) = choose_group(&benchmark, args.game.as_deref(), args.seed.as_deref())?;
    let records = extract_game(&benchmark, game, seed)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_extract_path(&args.benchmark, game, seed));
    if output.exists() {
        println!("File {} already exists, skipping", output.display());
    } else {
        write_output(&output, &to_json_indented(&records, b" ")?)?;
        log::info!("extracted {} entries for {game}_{seed}", records.len());
    }
    println!("Saved data to {}", output.display().to_string().green());
    Ok(())
}

/// Resolve the requested (game, seed), listing the choices when one is missing.
fn choose_group<'a>(
    benchmark: &BenchmarkFile,
    game: Option<&'a str>,
    seed: Option<&'a str>,
) -> Result<(&'a str, &'a str)> {
    let Some(game) = game else {
        print_choices("Available games:", benchmark.game_names());
        bail!("no game selected; pass --game");
    };
    let Some(seed) = seed else {
        let games = benchmark.game_names();
        if !games.contains(game) {
            return Err(BenchError::GameNotFound {
                game: game.to_string(),
                available: games.into_iter().map(str::to_string).collect(),
            }
            .into());
        }
        print_choices(&format!("Available seeds for {game}:"), benchmark.seeds_for(game));
        bail!("no seed selected; pass --seed");
    };
    Ok((game, seed))
}

fn print_choices<'a>(title: &str, choices: impl IntoIterator<Item = &'a str>) {
    println!("{}", title.bold());
    for choice in choices {
        println!("  {choice}");
    }
}
