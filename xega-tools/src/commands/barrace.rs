use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use xega_bench::{PresentationConfig, Presenter, RaceTimeline, select_group};

use super::{load_benchmark, write_output};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// One row per model with cumulative-best scores per round
    Csv,
    /// Versioned rounds of raw scores, moves and token scores
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct BarRaceArgs {
    /// Benchmark results JSON file
    #[arg(long)]
    pub game_data: PathBuf,

    /// Game name to export
    #[arg(long)]
    pub game_name: String,

    /// Map seed to export
    #[arg(long)]
    pub seed: String,

    /// Destination file
    #[arg(long)]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    /// JSON file extending the built-in nice-name and logo tables
    #[arg(long)]
    pub lookups: Option<PathBuf>,
}

pub fn run(args: &BarRaceArgs) -> Result<()> {
    let presenter = load_presenter(args)?;
    let benchmark = load_benchmark(&args.game_data)?;
    let records = select_group(&benchmark.game_results, &args.game_name, &args.seed)?;
    let timeline = RaceTimeline::from_records(&records);
    log::debug!(
        "{} records -> {} models over {} rounds",
        records.len(),
        timeline.models.len(),
        timeline.rounds
    );

    let target = format!(
        "{} for game={}, seed={}",
        args.output.display(),
        args.game_name,
        args.seed
    );
    match args.format {
        ExportFormat::Csv => {
            let mut buf = Vec::new();
            timeline.write_csv(&presenter, &mut buf)?;
            write_output(&args.output, &buf)?;
            println!(
                "Wrote {} models, {} rounds to {target}.",
                timeline.models.len(),
                timeline.rounds
            );
        }
        ExportFormat::Json => {
            let dataset = timeline.to_dataset(&presenter);
            write_output(&args.output, dataset.to_json_pretty()?.as_bytes())?;
            println!(
                "Wrote JSON with {} rounds x {} models to {target}.",
                dataset.rounds.len(),
                timeline.models.len()
            );
        }
    }
    Ok(())
}

fn load_presenter(args: &BarRaceArgs) -> Result<Presenter> {
    let Some(path) = &args.lookups else {
        return Ok(Presenter::default());
    };
    let config = PresentationConfig::load_with_overrides(path)
        .with_context(|| format!("loading lookups from {}", path.display()))?;
    Ok(Presenter::from_config(&config))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{fixture_path, temp_path};
    use super::*;
    use std::fs;
    use xega_bench::{BarRaceDataset, bar_race_frames};

    fn args(format: ExportFormat, output: PathBuf) -> BarRaceArgs {
        BarRaceArgs {
            game_data: fixture_path(),
            game_name: "Condense".to_string(),
            seed: "11".to_string(),
            output,
            format,
            lookups: None,
        }
    }

    #[test]
    fn csv_export_has_one_row_per_model() {
        let output = temp_path("barrace").join("race.csv");
        run(&args(ExportFormat::Csv, output.clone())).unwrap();
        let text = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("Round 5,Round 6"));
        assert!(lines[2].starts_with("gpt-4o,GPT-4o,OpenAI,"));
        assert!(lines[2].ends_with(",1.00,4.00,4.00,7.00,7.00,10.00"));
        assert!(lines[3].starts_with("mystery-model,mystery-model,Unknown,,"));
        assert!(lines[3].ends_with(",0.50,0.50,0.75,0.75,0.75,0.75"));
    }

    #[test]
    fn json_export_feeds_frames() {
        let output = temp_path("barrace-json");
        run(&args(ExportFormat::Json, output.clone())).unwrap();
        let dataset: BarRaceDataset =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(dataset.version, "1");
        let frames = bar_race_frames(&dataset).unwrap();
        assert_eq!(frames.len(), 6);
        assert_eq!(frames[5]["gpt-4o"].best_round_index, 5);
        assert_eq!(frames[5]["mystery-model"].best_round_index, 2);
    }

    #[test]
    fn lookups_override_display_names() {
        let lookups = temp_path("lookups");
        fs::write(&lookups, r#"{"nice_names": {"mystery-model": "Mystery"}}"#).unwrap();
        let output = temp_path("barrace-lookups");
        let mut args = args(ExportFormat::Csv, output.clone());
        args.lookups = Some(lookups);
        run(&args).unwrap();
        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("mystery-model,Mystery,Unknown,"));
        assert!(text.contains("gpt-4o,GPT-4o,"));
    }

    #[test]
    fn unknown_group_fails_without_writing() {
        let output = temp_path("barrace-missing");
        let mut args = args(ExportFormat::Csv, output.clone());
        args.seed = "999".to_string();
        assert!(run(&args).is_err());
        assert!(!output.exists());
    }
}
