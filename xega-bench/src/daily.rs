//! Daily game rotation: best-model summaries per game and month schedules.
use chrono::{Datelike, NaiveDate};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BenchError, Result};
use crate::record::{GameResultRecord, SENTINEL};

/// Seed used when the caller does not pick one.
pub const DEFAULT_ROTATION_SEED: u64 = 42;

/// One day's game as published in a month file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyGame {
    pub game_id: String,
    pub game_url: String,
    pub game_type: String,
    pub best_model: String,
    pub best_score: f64,
}

/// A playable (game, seed) with its summary and the records behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyCandidate {
    pub game: DailyGame,
    pub seed: String,
    pub records: Vec<GameResultRecord>,
}

impl DailyCandidate {
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}_{}.json", self.game.game_type, self.seed)
    }
}

/// Dates (`YYYY-MM-DD`) mapped to their game, in date order.
pub type MonthSchedule = BTreeMap<String, DailyGame>;

/// Summarize every (game, seed) group, in order of first appearance.
///
/// Entries without game metadata or an entry-level score block are skipped, as
/// are groups where no model has a numeric black score.
#[must_use]
pub fn load_candidates(records: &[GameResultRecord]) -> Vec<DailyCandidate> {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut grouped: HashMap<(String, String), Vec<GameResultRecord>> = HashMap::new();
    for record in records.iter().filter(|record| record.is_scored()) {
        let key = (record.game_name.clone(), record.seed.clone());
        let entries = grouped.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Vec::new()
        });
        entries.push(record.clone());
    }

    order
        .into_iter()
        .filter_map(|key| {
            let records = grouped.remove(&key)?;
            let (game_type, seed) = key;
            let Some((best_model, best_score)) = best_model(&records) else {
                log::warn!("Could not find valid model data for {game_type}_{seed}");
                return None;
            };
            Some(DailyCandidate {
                game: DailyGame {
                    game_id: format!("{}_{seed}", game_type.to_lowercase()),
                    game_url: format!("/games/{game_type}_{seed}.json"),
                    game_type,
                    best_model,
                    best_score,
                },
                seed,
                records,
            })
        })
        .collect()
}

/// First model reaching the strictly highest entry-level score.
fn best_model(records: &[GameResultRecord]) -> Option<(String, f64)> {
    let mut best_score = f64::NEG_INFINITY;
    let mut best_model = None;
    for record in records {
        let Some(score) = record.overall_score else {
            continue;
        };
        if score > best_score {
            best_score = score;
            if record.model != SENTINEL {
                best_model = Some(record.model.clone());
            }
        }
    }
    best_model.map(|model| (model, best_score))
}

/// Deterministic generator for a rotation seed.
#[must_use]
pub fn rotation_rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

/// Shuffle candidates with the caller's generator.
pub fn shuffle_candidates<T, R>(candidates: &mut [T], rng: &mut R)
where
    R: rand::Rng + ?Sized,
{
    candidates.shuffle(rng);
}

/// Every date of the month.
///
/// # Errors
///
/// Returns [`BenchError::InvalidMonth`] when `month` is outside 1..=12.
pub fn days_in_month(year: i32, month: u32) -> Result<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(BenchError::InvalidMonth(month))?;
    Ok(first
        .iter_days()
        .take_while(|day| day.month() == month)
        .collect())
}

/// Assign unused games to the month's days in order, marking them used.
///
/// When there are fewer unused games than days, only the leading days get one.
///
/// # Errors
///
/// Returns [`BenchError::InvalidMonth`] when `month` is outside 1..=12.
pub fn plan_month(
    year: i32,
    month: u32,
    games: &[DailyGame],
    used: &mut BTreeSet<String>,
) -> Result<MonthSchedule> {
    let days = days_in_month(year, month)?;
    let unused: Vec<&DailyGame> = games
        .iter()
        .filter(|game| !used.contains(&game.game_id))
        .collect();
    if unused.len() < days.len() {
        log::warn!(
            "Not enough unused games for {} days (have {}, need {})",
            days.len(),
            unused.len(),
            days.len()
        );
    }

    let mut schedule = MonthSchedule::new();
    for (day, game) in days.iter().zip(unused) {
        schedule.insert(day.format("%Y-%m-%d").to_string(), game.clone());
        used.insert(game.game_id.clone());
    }
    Ok(schedule)
}

/// Round every floating-point number to three decimals; integers are untouched.
#[must_use]
pub fn round_floats(value: Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .and_then(|x| Number::from_f64((x * 1000.0).round() / 1000.0))
            .map_or(Value::Number(n), Value::Number),
        Value::Array(items) => Value::Array(items.into_iter().map(round_floats).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, round_floats(value)))
                .collect(),
        ),
        other => other,
    }
}

/// Write the candidate's records (floats rounded) unless the file already exists.
///
/// Returns the written path, or `None` when an existing file was kept.
///
/// # Errors
///
/// Returns an error if the file cannot be encoded or written.
pub fn write_game_file(games_dir: &Path, candidate: &DailyCandidate) -> Result<Option<PathBuf>> {
    let path = games_dir.join(candidate.file_name());
    if path.exists() {
        return Ok(None);
    }
    let records: Vec<Value> = candidate
        .records
        .iter()
        .map(|record| round_floats(record.raw().clone()))
        .collect();
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    fs::write(&path, buf).map_err(|source| BenchError::io(&path, source))?;
    Ok(Some(path))
}

/// `YYYY-MM.json` inside `output_dir`.
#[must_use]
pub fn month_file_path(output_dir: &Path, year: i32, month: u32) -> PathBuf {
    output_dir.join(format!("{year:04}-{month:02}.json"))
}

/// Write the schedule through a temporary file renamed into place.
///
/// # Errors
///
/// Returns an error if the schedule cannot be encoded, written or renamed.
pub fn write_month_file(
    output_dir: &Path,
    year: i32,
    month: u32,
    schedule: &MonthSchedule,
) -> Result<PathBuf> {
    let path = month_file_path(output_dir, year, month);
    write_atomic(&path, serde_json::to_string(schedule)?.as_bytes())?;
    Ok(path)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp = path.with_extension("tmp");
    fs::write(&temp, bytes).map_err(|source| BenchError::io(&temp, source))?;
    fs::rename(&temp, path).map_err(|source| BenchError::io(path, source))
}
