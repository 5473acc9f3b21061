//! Benchmark documents and best-effort accessors over their result records.
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{BenchError, Result};

/// Placeholder used whenever a record lacks a textual field.
pub const SENTINEL: &str = "-";

/// Per-token score detail attached to a run, as `(token, score)` pairs.
pub type TokenScores = Vec<(String, f64)>;

/// One attempt inside a benchmark entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunResult {
    /// Black-side score; absent or non-numeric scores read as `0.0`.
    pub score: f64,
    /// First elicited response text, empty when the run never answered.
    pub response: String,
    pub token_scores: Option<TokenScores>,
}

impl RunResult {
    #[must_use]
    pub fn from_value(run: &Value) -> Self {
        let score = run.pointer("/scores/black").map_or(0.0, score_value);
        let mut response = String::new();
        let mut token_scores = None;

        let events = run
            .get("xrt_history")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice);
        for event in events {
            match event.get("type").and_then(Value::as_str) {
                Some("elicit_response") if response.is_empty() => {
                    response = event
                        .get("response")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string();
                }
                Some("reward") => {
                    if let Some(value) = event.get("value")
                        && is_truthy(value.get("__TokenXentList__"))
                    {
                        token_scores = value.get("pairs").and_then(parse_token_pairs);
                    }
                }
                _ => {}
            }
        }

        Self {
            score,
            response,
            token_scores,
        }
    }
}

/// A single benchmark entry: one model playing one (game, seed) several times.
///
/// The input JSON is retained so filtered outputs reproduce entries verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct GameResultRecord {
    pub game_name: String,
    pub seed: String,
    pub model: String,
    pub runs: Vec<RunResult>,
    /// Entry-level black score, used to pick the best model of a group.
    pub overall_score: Option<f64>,
    raw: Value,
}

impl GameResultRecord {
    #[must_use]
    pub fn from_value(raw: Value) -> Self {
        let game_name = text_field(raw.pointer("/game/game/name"));
        let seed = text_field(
            raw.pointer("/game/game/map_seed")
                .or_else(|| raw.pointer("/game/map_seed")),
        );
        let model = text_field(raw.pointer("/game/players/0/options/model"));
        let runs = raw
            .get("game_results")
            .and_then(Value::as_array)
            .map(|runs| runs.iter().map(RunResult::from_value).collect())
            .unwrap_or_default();
        let overall_score = raw.pointer("/scores/black").and_then(Value::as_f64);

        Self {
            game_name,
            seed,
            model,
            runs,
            overall_score,
            raw,
        }
    }

    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.raw
    }

    #[must_use]
    pub fn into_raw(self) -> Value {
        self.raw
    }

    /// Raw per-run scores in attempt order.
    #[must_use]
    pub fn run_scores(&self) -> Vec<f64> {
        self.runs.iter().map(|run| run.score).collect()
    }

    /// Whether the entry carries both game metadata and an entry-level score block.
    #[must_use]
    pub fn is_scored(&self) -> bool {
        self.raw.get("game").is_some() && self.raw.get("scores").is_some()
    }
}

impl Serialize for GameResultRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameResultRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// Top-level benchmark document: `{"game_results": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkFile {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub game_results: Vec<GameResultRecord>,
}

impl BenchmarkFile {
    #[must_use]
    pub const fn from_records(game_results: Vec<GameResultRecord>) -> Self {
        Self { game_results }
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a benchmark document.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| BenchError::io(path, source))?;
        Self::from_json(&text).map_err(|source| BenchError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a benchmark document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn game_names(&self) -> BTreeSet<&str> {
        self.game_results
            .iter()
            .map(|record| record.game_name.as_str())
            .collect()
    }

    #[must_use]
    pub fn seeds_for(&self, game: &str) -> BTreeSet<&str> {
        self.game_results
            .iter()
            .filter(|record| record.game_name == game)
            .map(|record| record.seed.as_str())
            .collect()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<GameResultRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<GameResultRecord>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn text_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => SENTINEL.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn score_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

fn parse_token_pairs(pairs: &Value) -> Option<TokenScores> {
    match serde_json::from_value(pairs.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            log::debug!("ignoring malformed token score pairs: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_nested_fields() {
        let record = GameResultRecord::from_value(json!({
            "game": {
                "game": {"name": "Condense", "map_seed": 42},
                "players": [{"options": {"model": "gpt-4o"}}]
            },
            "game_results": [
                {"scores": {"black": 1.5}},
                {"scores": {"black": null}},
                {"scores": {}}
            ]
        }));
        assert_eq!(record.game_name, "Condense");
        assert_eq!(record.seed, "42");
        assert_eq!(record.model, "gpt-4o");
        assert_eq!(record.run_scores(), vec![1.5, 0.0, 0.0]);
        assert_eq!(record.overall_score, None);
        assert!(!record.is_scored());
    }

    #[test]
    fn missing_fields_degrade_to_sentinels() {
        let record = GameResultRecord::from_value(json!({"game": {"players": []}}));
        assert_eq!(record.game_name, SENTINEL);
        assert_eq!(record.seed, SENTINEL);
        assert_eq!(record.model, SENTINEL);
        assert!(record.runs.is_empty());
    }

    #[test]
    fn seed_falls_back_to_outer_game_block() {
        let record = GameResultRecord::from_value(json!({
            "game": {"game": {"name": "Synthesize"}, "map_seed": "abc"}
        }));
        assert_eq!(record.seed, "abc");
    }

    #[test]
    fn run_extracts_first_response_and_token_pairs() {
        let run = RunResult::from_value(&json!({
            "scores": {"black": 3},
            "xrt_history": [
                {"type": "elicit_response", "response": "first"},
                {"type": "elicit_response", "response": "second"},
                {"type": "reward", "value": {"__TokenXentList__": true, "pairs": [["a", 0.5], ["b", -1.0]]}}
            ]
        }));
        assert!((run.score - 3.0).abs() < f64::EPSILON);
        assert_eq!(run.response, "first");
        assert_eq!(
            run.token_scores,
            Some(vec![("a".to_string(), 0.5), ("b".to_string(), -1.0)])
        );
    }

    #[test]
    fn reward_without_token_marker_is_ignored() {
        let run = RunResult::from_value(&json!({
            "xrt_history": [{"type": "reward", "value": {"pairs": [["a", 1.0]]}}]
        }));
        assert!(run.token_scores.is_none());
        assert!(run.response.is_empty());
    }

    #[test]
    fn benchmark_roundtrips_raw_entries() {
        let text = r#"{"game_results":[{"game":{"game":{"name":"G","map_seed":"1"}},"extra":true}]}"#;
        let file = BenchmarkFile::from_json(text).unwrap();
        assert_eq!(file.game_results.len(), 1);
        assert_eq!(serde_json::to_string(&file).unwrap(), text);
    }

    #[test]
    fn null_results_read_as_empty() {
        let file = BenchmarkFile::from_json(r#"{"game_results": null}"#).unwrap();
        assert!(file.game_results.is_empty());
        let file = BenchmarkFile::from_json("{}").unwrap();
        assert!(file.game_results.is_empty());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = BenchmarkFile::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, BenchError::Io { .. }));
    }
}
