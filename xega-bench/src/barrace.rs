//! Bar-race chart datasets: aligned per-model timelines rendered as CSV or versioned JSON.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

use crate::error::{BenchError, Result};
use crate::lookup::Presenter;
use crate::record::{GameResultRecord, TokenScores};
use crate::series::{align_series, cumulative_max, pad_with};

pub const DATASET_VERSION: &str = "1";

/// Per-model timelines of one group, all padded to the same number of rounds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RaceTimeline {
    /// Model ids in ascending order.
    pub models: Vec<String>,
    pub rounds: usize,
    pub cumulative: BTreeMap<String, Vec<f64>>,
    pub scores: BTreeMap<String, Vec<f64>>,
    pub moves: BTreeMap<String, Vec<String>>,
    pub token_scores: BTreeMap<String, Vec<Option<TokenScores>>>,
}

impl RaceTimeline {
    /// Later records for the same model replace earlier ones.
    #[must_use]
    pub fn from_records(records: &[&GameResultRecord]) -> Self {
        let mut timeline = Self::default();
        for record in records {
            let scores = record.run_scores();
            timeline
                .cumulative
                .insert(record.model.clone(), cumulative_max(&scores));
            timeline.scores.insert(record.model.clone(), scores);
            timeline.moves.insert(
                record.model.clone(),
                record.runs.iter().map(|run| run.response.clone()).collect(),
            );
            timeline.token_scores.insert(
                record.model.clone(),
                record.runs.iter().map(|run| run.token_scores.clone()).collect(),
            );
        }

        let rounds = timeline.cumulative.values().map(Vec::len).max().unwrap_or(0);
        timeline.rounds = rounds;
        for series in timeline.cumulative.values_mut() {
            *series = align_series(series, rounds);
        }
        for series in timeline.scores.values_mut() {
            *series = align_series(series, rounds);
        }
        for moves in timeline.moves.values_mut() {
            *moves = pad_with(std::mem::take(moves), rounds, String::new());
        }
        for pairs in timeline.token_scores.values_mut() {
            *pairs = pad_with(std::mem::take(pairs), rounds, None);
        }
        timeline.models = timeline.cumulative.keys().cloned().collect();
        timeline
    }

    /// Write `model, nice_model, company, logo, Round 1..T` rows of cumulative-best
    /// scores with two decimals.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV cannot be written.
    pub fn write_csv<W: Write>(&self, presenter: &Presenter, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let mut header: Vec<String> = ["model", "nice_model", "company", "logo"]
            .iter()
            .map(ToString::to_string)
            .collect();
        header.extend((1..=self.rounds).map(|round| format!("Round {round}")));
        csv.write_record(&header)?;

        for model in &self.models {
            let shown = presenter.present(model, true);
            let mut row = vec![shown.model, shown.nice_model, shown.company, shown.logo];
            if let Some(series) = self.cumulative.get(model) {
                row.extend(series.iter().map(|value| format!("{value:.2}")));
            }
            csv.write_record(&row)?;
        }
        csv.flush().map_err(|source| BenchError::Csv(source.into()))?;
        Ok(())
    }

    /// Round-by-round dataset of raw scores, moves and token detail.
    #[must_use]
    pub fn to_dataset(&self, presenter: &Presenter) -> BarRaceDataset {
        let shown: Vec<_> = self
            .models
            .iter()
            .map(|model| presenter.present(model, false))
            .collect();

        let rounds = (0..self.rounds)
            .map(|t| {
                shown
                    .iter()
                    .map(|presentation| {
                        let model = &presentation.model;
                        RoundModel {
                            model: model.clone(),
                            nice_model: presentation.nice_model.clone(),
                            company: presentation.company.clone(),
                            logo: presentation.logo.clone(),
                            score: self.scores.get(model).and_then(|s| s.get(t)).copied().unwrap_or(0.0),
                            move_text: self
                                .moves
                                .get(model)
                                .and_then(|m| m.get(t))
                                .cloned()
                                .unwrap_or_default(),
                            token_scores: self
                                .token_scores
                                .get(model)
                                .and_then(|p| p.get(t))
                                .cloned()
                                .flatten(),
                        }
                    })
                    .collect()
            })
            .collect();

        BarRaceDataset {
            version: DATASET_VERSION.to_string(),
            rounds,
        }
    }
}

/// One model's entry in one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundModel {
    pub model: String,
    pub nice_model: String,
    pub company: String,
    #[serde(default)]
    pub logo: String,
    pub score: f64,
    #[serde(rename = "move")]
    pub move_text: String,
    pub token_scores: Option<TokenScores>,
}

/// `{"version": "1", "rounds": [[RoundModel, ...], ...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarRaceDataset {
    pub version: String,
    pub rounds: Vec<Vec<RoundModel>>,
}

impl BarRaceDataset {
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be encoded.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A round entry augmented with the model's best round so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameEntry {
    #[serde(flatten)]
    pub current: RoundModel,
    pub best_round_index: usize,
    pub best_score: f64,
    pub best_move: String,
    pub best_token_scores: Option<TokenScores>,
}

pub type BarRaceFrame = BTreeMap<String, FrameEntry>;

/// Running-best frames for every round. Only a strictly higher score replaces
/// the running best, so ties keep the earliest round.
///
/// # Errors
///
/// Returns [`BenchError::MissingModel`] when a model of the first round is
/// absent from a later one.
pub fn bar_race_frames(dataset: &BarRaceDataset) -> Result<Vec<BarRaceFrame>> {
    let Some(first) = dataset.rounds.first() else {
        return Ok(Vec::new());
    };
    let models: Vec<&str> = first.iter().map(|entry| entry.model.as_str()).collect();
    let mut best: BTreeMap<&str, (usize, &RoundModel)> = BTreeMap::new();
    let mut frames = Vec::with_capacity(dataset.rounds.len());

    for (index, round) in dataset.rounds.iter().enumerate() {
        let mut frame = BarRaceFrame::new();
        for &model in &models {
            let current = round
                .iter()
                .find(|entry| entry.model == model)
                .ok_or_else(|| BenchError::MissingModel {
                    model: model.to_string(),
                    round: index,
                })?;

            let (best_index, best_entry) = match best.get(model) {
                Some(&(prev_index, prev)) if current.score <= prev.score => (prev_index, prev),
                _ => (index, current),
            };
            best.insert(model, (best_index, best_entry));

            frame.insert(
                model.to_string(),
                FrameEntry {
                    current: current.clone(),
                    best_round_index: best_index,
                    best_score: best_entry.score,
                    best_move: best_entry.move_text.clone(),
                    best_token_scores: best_entry.token_scores.clone(),
                },
            );
        }
        frames.push(frame);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(model: &str, runs: serde_json::Value) -> GameResultRecord {
        GameResultRecord::from_value(json!({
            "game": {
                "game": {"name": "Condense", "map_seed": "1"},
                "players": [{"options": {"model": model}}]
            },
            "game_results": runs
        }))
    }

    fn sample() -> Vec<GameResultRecord> {
        vec![
            record(
                "gpt-4o",
                json!([
                    {"scores": {"black": 1.0}, "xrt_history": [{"type": "elicit_response", "response": "hello"}]},
                    {"scores": {"black": 4.5}},
                    {"scores": {"black": 2.0}}
                ]),
            ),
            record("claude-opus-4-20250514", json!([{"scores": {"black": 3.25}}])),
        ]
    }

    #[test]
    fn timeline_pads_every_model() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let timeline = RaceTimeline::from_records(&refs);
        assert_eq!(timeline.rounds, 3);
        assert_eq!(timeline.models, vec!["claude-opus-4-20250514", "gpt-4o"]);
        assert_eq!(timeline.cumulative["gpt-4o"], vec![1.0, 4.5, 4.5]);
        assert_eq!(timeline.scores["gpt-4o"], vec![1.0, 4.5, 2.0]);
        assert_eq!(timeline.scores["claude-opus-4-20250514"], vec![3.25; 3]);
        assert_eq!(timeline.moves["gpt-4o"], vec!["hello", "", ""]);
        assert_eq!(timeline.moves["claude-opus-4-20250514"], vec!["", "", ""]);
        assert_eq!(timeline.token_scores["gpt-4o"], vec![None, None, None]);
    }

    #[test]
    fn csv_has_round_columns_with_two_decimals() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let timeline = RaceTimeline::from_records(&refs);
        let mut out = Vec::new();
        timeline.write_csv(&Presenter::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "model,nice_model,company,logo,Round 1,Round 2,Round 3");
        assert!(lines[1].starts_with("claude-opus-4-20250514,Opus 4,Anthropic,"));
        assert!(lines[1].ends_with(",3.25,3.25,3.25"));
        assert!(lines[2].ends_with(",1.00,4.50,4.50"));
    }

    #[test]
    fn dataset_carries_raw_scores_per_round() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let dataset = RaceTimeline::from_records(&refs).to_dataset(&Presenter::default());
        assert_eq!(dataset.version, "1");
        assert_eq!(dataset.rounds.len(), 3);
        let last = &dataset.rounds[2];
        assert_eq!(last[1].model, "gpt-4o");
        assert!((last[1].score - 2.0).abs() < f64::EPSILON);
        assert_eq!(dataset.rounds[0][1].move_text, "hello");

        let value: serde_json::Value = serde_json::from_str(&dataset.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["rounds"][0][1]["move"], "hello");
        assert!(value["rounds"][0][1]["token_scores"].is_null());
    }

    #[test]
    fn frames_track_running_best() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let dataset = RaceTimeline::from_records(&refs).to_dataset(&Presenter::default());
        let frames = bar_race_frames(&dataset).unwrap();
        assert_eq!(frames.len(), 3);
        let gpt = &frames[2]["gpt-4o"];
        assert_eq!(gpt.best_round_index, 1);
        assert!((gpt.best_score - 4.5).abs() < f64::EPSILON);
        assert!((gpt.current.score - 2.0).abs() < f64::EPSILON);
        let claude = &frames[2]["claude-opus-4-20250514"];
        assert_eq!(claude.best_round_index, 0);
    }

    #[test]
    fn frames_reject_missing_models() {
        let records = sample();
        let refs: Vec<_> = records.iter().collect();
        let mut dataset = RaceTimeline::from_records(&refs).to_dataset(&Presenter::default());
        dataset.rounds[1].pop();
        let err = bar_race_frames(&dataset).unwrap_err();
        assert!(matches!(err, BenchError::MissingModel { round: 1, .. }));
    }

    #[test]
    fn empty_dataset_has_no_frames() {
        let dataset = BarRaceDataset {
            version: DATASET_VERSION.to_string(),
            rounds: Vec::new(),
        };
        assert!(bar_race_frames(&dataset).unwrap().is_empty());
    }
}
