//! Error taxonomy for benchmark transformations.
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or transforming benchmark results.
///
/// Malformed records never surface here: missing nested fields degrade to
/// sentinel values (`"-"`, `0.0`) instead.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {} as benchmark JSON", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no entries found for game={game:?}, seed={seed:?}")]
    NoMatchingData { game: String, seed: String },
    #[error("game {game:?} not found in benchmark (available: {})", available.join(", "))]
    GameNotFound {
        game: String,
        available: Vec<String>,
    },
    #[error(
        "seed {seed:?} for game {game:?} not found in benchmark (available: {})",
        available.join(", ")
    )]
    SeedNotFound {
        game: String,
        seed: String,
        available: Vec<String>,
    },
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
    #[error("no valid games could be loaded from benchmark")]
    NoCandidates,
    #[error("dataset validation error: missing model {model:?} at round index {round}")]
    MissingModel { model: String, round: usize },
    #[error("failed to encode JSON output")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write CSV output")]
    Csv(#[from] csv::Error),
}

impl BenchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = BenchError> = std::result::Result<T, E>;
