use anyhow::Result;
use clap::Args;
use std::io::{Write, stdout};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use xega_bench::switches::{DEFAULT_TOP_K, DEFAULT_TOP_N};
use xega_bench::{BenchmarkFile, find_switchiest};

use super::{load_benchmark, write_output};
use crate::reports::write_switchiest_table;

#[derive(Debug, Clone, Args)]
pub struct SwitchiestArgs {
    /// Benchmark results JSON file
    #[arg(long, default_value = "results/benchmarkResults.json")]
    pub game_data: PathBuf,

    /// Top-N frontier to evaluate rank improvements
    #[arg(long, default_value_t = DEFAULT_TOP_N, value_parser = positive)]
    pub top_n: usize,

    /// How many (game, seed) groups to select for output
    #[arg(long, default_value_t = DEFAULT_TOP_K, value_parser = positive)]
    pub top_k: usize,

    /// Only include these game names (repeatable)
    #[arg(long)]
    pub games: Vec<String>,

    /// Output JSON file containing only the selected game entries
    #[arg(long)]
    pub output: PathBuf,
}

pub fn run(args: &SwitchiestArgs) -> Result<()> {
    let benchmark = load_benchmark(&args.game_data)?;
    let mut report = find_switchiest(&benchmark.game_results, &args.games, args.top_n, args.top_k);

    let filtered = BenchmarkFile::from_records(std::mem::take(&mut report.records));
    write_output(&args.output, &serde_json::to_vec(&filtered)?)?;
    log::info!(
        "wrote {} entries to {}",
        filtered.game_results.len(),
        args.output.display()
    );

    let mut out = stdout().lock();
    write_switchiest_table(&mut out, &report)?;
    out.flush()?;
    Ok(())
}

fn positive(value: &str) -> Result<usize, String> {
    NonZeroUsize::from_str(value)
        .map(NonZeroUsize::get)
        .map_err(|_| format!("expected an integer >= 1, got {value}"))
}
