//! Selection of the records belonging to one (game, seed) pair.
use std::path::{Path, PathBuf};

use crate::error::{BenchError, Result};
use crate::grouping::GroupKey;
use crate::record::{BenchmarkFile, GameResultRecord};

/// Records matching `game` and `seed` exactly, in input order.
///
/// # Errors
///
/// Returns [`BenchError::NoMatchingData`] when nothing matches.
pub fn select_group<'a>(
    records: &'a [GameResultRecord],
    game: &str,
    seed: &str,
) -> Result<Vec<&'a GameResultRecord>> {
    let key = GroupKey::new(game, seed);
    let selected: Vec<_> = records.iter().filter(|record| key.matches(record)).collect();
    if selected.is_empty() {
        return Err(BenchError::NoMatchingData {
            game: game.to_string(),
            seed: seed.to_string(),
        });
    }
    Ok(selected)
}

/// Like [`select_group`], but distinguishes an unknown game from an unknown seed
/// and lists what the benchmark does contain.
///
/// # Errors
///
/// Returns [`BenchError::GameNotFound`] or [`BenchError::SeedNotFound`].
pub fn extract_game<'a>(
    benchmark: &'a BenchmarkFile,
    game: &str,
    seed: &str,
) -> Result<Vec<&'a GameResultRecord>> {
    let games = benchmark.game_names();
    if !games.contains(game) {
        return Err(BenchError::GameNotFound {
            game: game.to_string(),
            available: games.into_iter().map(str::to_string).collect(),
        });
    }
    let seeds = benchmark.seeds_for(game);
    if !seeds.contains(seed) {
        return Err(BenchError::SeedNotFound {
            game: game.to_string(),
            seed: seed.to_string(),
            available: seeds.into_iter().map(str::to_string).collect(),
        });
    }
    select_group(&benchmark.game_results, game, seed)
}

/// `<parent>/<stem>/<game>_<seed>.json` next to the benchmark file.
#[must_use]
pub fn default_extract_path(benchmark: &Path, game: &str, seed: &str) -> PathBuf {
    let parent = benchmark.parent().unwrap_or_else(|| Path::new(""));
    let stem = benchmark
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    parent.join(stem).join(format!("{game}_{seed}.json"))
}
