//! xega benchmark transformations
//!
//! Pure, in-memory transformations over benchmark result files: grouping game
//! records by (game, seed), cumulative-best score series, per-timestep rank
//! tracking, switchiness scoring, and the artifacts built on top of them
//! (extracts, bar-race datasets and daily rotation schedules).

pub mod barrace;
pub mod daily;
pub mod error;
pub mod extract;
pub mod grouping;
pub mod lookup;
pub mod ranking;
pub mod record;
pub mod series;
pub mod switches;

// Re-export commonly used types
pub use barrace::{BarRaceDataset, BarRaceFrame, FrameEntry, RaceTimeline, RoundModel, bar_race_frames};
pub use daily::{
    DailyCandidate, DailyGame, MonthSchedule, days_in_month, load_candidates, plan_month,
    rotation_rng, shuffle_candidates, write_game_file, write_month_file,
};
pub use error::{BenchError, Result};
pub use extract::{default_extract_path, extract_game, select_group};
pub use grouping::{GroupKey, Groups, filter_games, group_records};
pub use lookup::{
    CompanyClassifier, LogoTable, ModelLookup, ModelPresentation, NiceNames, PresentationConfig,
    Presenter,
};
pub use ranking::{RankSnapshot, rank_snapshot, rank_timeline};
pub use record::{BenchmarkFile, GameResultRecord, RunResult, SENTINEL, TokenScores};
pub use series::{align_series, cumulative_max};
pub use switches::{
    GroupScore, Switchiness, SwitchinessReport, count_switches, find_switchiest,
    group_switchiness, score_groups,
};
