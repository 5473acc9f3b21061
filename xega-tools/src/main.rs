mod commands;
mod reports;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use commands::{barrace, daily, extract, switchiest};

#[derive(Debug, Parser)]
#[command(name = "xega-tools", version = "0.1.0")]
#[command(
    about = "Offline tools for xega benchmark results - extracts, switchiness, bar races and daily rotations"
)]
struct Cli {
    /// Log at debug level (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Save every entry of one (game, seed) to its own JSON file
    Extract(extract::ExtractArgs),
    /// Rank (game, seed) groups by how often the top-N leaderboard changes
    Switchiest(switchiest::SwitchiestArgs),
    /// Export a bar-race dataset for one (game, seed) as CSV or JSON
    BarRace(barrace::BarRaceArgs),
    /// Build the month's daily game rotation from a benchmark file
    Daily(daily::DailyArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Extract(args) => extract::run(&args),
        Command::Switchiest(args) => switchiest::run(&args),
        Command::BarRace(args) => barrace::run(&args),
        Command::Daily(args) => {
            announce_banner();
            daily::run(&args)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn announce_banner() {
    println!("{}", "📅 xega daily rotation".bright_cyan().bold());
    println!("{}", "======================".cyan());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbose_is_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "xega-tools",
            "bar-race",
            "--game-data",
            "bench.json",
            "--game-name",
            "Condense",
            "--seed",
            "3",
            "--output",
            "out.csv",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::BarRace(_)));
    }

    #[test]
    fn switchiest_rejects_zero_top_n() {
        let err = Cli::try_parse_from([
            "xega-tools",
            "switchiest",
            "--top-n",
            "0",
            "--output",
            "out.json",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
