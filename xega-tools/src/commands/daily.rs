use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::Args;
use colored::Colorize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use xega_bench::daily::DEFAULT_ROTATION_SEED;
use xega_bench::{
    BenchError, DailyGame, days_in_month, load_candidates, plan_month, rotation_rng,
    shuffle_candidates, write_game_file, write_month_file,
};

use super::load_benchmark;

#[derive(Debug, Clone, Args)]
pub struct DailyArgs {
    /// Benchmark results JSON file
    #[arg(long, default_value = "../xega/results/benchmarkResults.json")]
    pub benchmark_file: PathBuf,

    /// Directory receiving the YYYY-MM.json month files
    #[arg(long, default_value = "public/daily")]
    pub output_dir: PathBuf,

    /// Directory receiving the per-game files
    #[arg(long, default_value = "public/games")]
    pub games_dir: PathBuf,

    /// Year to generate (defaults to the current UTC year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Month to generate, 1-12 (defaults to the current UTC month)
    #[arg(long)]
    pub month: Option<u32>,

    /// Random seed for a reproducible rotation
    #[arg(long, default_value_t = DEFAULT_ROTATION_SEED)]
    pub seed: u64,
}

pub fn run(args: &DailyArgs) -> Result<()> {
    let today = Utc::now().date_naive();
    let year = args.year.unwrap_or_else(|| today.year());
    let month = args.month.unwrap_or_else(|| today.month());
    days_in_month(year, month)?;
    let mut rng = rotation_rng(args.seed);

    println!("Loading benchmark data from {}", args.benchmark_file.display());
    let benchmark = load_benchmark(&args.benchmark_file)?;
    let candidates = load_candidates(&benchmark.game_results);
    if candidates.is_empty() {
        return Err(BenchError::NoCandidates.into());
    }
    println!("Found {} games in benchmark", candidates.len());

    ensure_dir(&args.output_dir)?;
    ensure_dir(&args.games_dir)?;

    let mut games: Vec<DailyGame> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if let Some(path) = write_game_file(&args.games_dir, &candidate)? {
            println!("Extracted {}", path.display());
        }
        let game = candidate.game;
        println!(
            "Loaded {} - {} (best: {}, score: {:.2})",
            game.game_id.bold(),
            game.game_type,
            game.best_model,
            game.best_score
        );
        games.push(game);
    }
    println!("Successfully processed {} games", games.len());

    shuffle_candidates(&mut games, &mut rng);
    let mut used = BTreeSet::new();
    let schedule = plan_month(year, month, &games, &mut used)?;
    let path = write_month_file(&args.output_dir, year, month, &schedule)?;
    println!("Generated {} with {} days", path.display(), schedule.len());
    println!("{}", "Daily games generation completed!".green());
    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))
}
