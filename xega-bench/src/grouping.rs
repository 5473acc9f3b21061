//! Partitioning of benchmark records by (game, seed) and by model.
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::record::GameResultRecord;

/// Identity of a group: one game played on one map seed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GroupKey {
    pub game: String,
    pub seed: String,
}

impl GroupKey {
    #[must_use]
    pub fn new(game: impl Into<String>, seed: impl Into<String>) -> Self {
        Self {
            game: game.into(),
            seed: seed.into(),
        }
    }

    #[must_use]
    pub fn of(record: &GameResultRecord) -> Self {
        Self::new(record.game_name.as_str(), record.seed.as_str())
    }

    #[must_use]
    pub fn matches(&self, record: &GameResultRecord) -> bool {
        record.game_name == self.game && record.seed == self.seed
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.game, self.seed)
    }
}

pub type Groups<'a> = BTreeMap<GroupKey, Vec<&'a GameResultRecord>>;

/// Keep only records whose game is in `games`; an empty allow-list keeps everything.
#[must_use]
pub fn filter_games<'a>(records: &'a [GameResultRecord], games: &[String]) -> Vec<&'a GameResultRecord> {
    if games.is_empty() {
        return records.iter().collect();
    }
    let allowed: BTreeSet<&str> = games.iter().map(String::as_str).collect();
    records
        .iter()
        .filter(|record| allowed.contains(record.game_name.as_str()))
        .collect()
}

/// Group records by (game, seed), preserving input order inside each group.
#[must_use]
pub fn group_records<'a, I>(records: I) -> Groups<'a>
where
    I: IntoIterator<Item = &'a GameResultRecord>,
{
    let mut groups = Groups::new();
    for record in records {
        groups.entry(GroupKey::of(record)).or_default().push(record);
    }
    groups
}

/// Raw run scores keyed by model. A later record for the same model replaces earlier ones.
#[must_use]
pub fn scores_by_model(records: &[&GameResultRecord]) -> BTreeMap<String, Vec<f64>> {
    records
        .iter()
        .map(|record| (record.model.clone(), record.run_scores()))
        .collect()
}

#[must_use]
pub fn distinct_models(records: &[&GameResultRecord]) -> usize {
    records
        .iter()
        .map(|record| record.model.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}
