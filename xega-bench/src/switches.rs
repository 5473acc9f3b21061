//! Switchiness: rank improvements into the top-N frontier, and group selection by it.
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::grouping::{GroupKey, Groups, distinct_models, filter_games, group_records, scores_by_model};
use crate::ranking::{RankSnapshot, rank_timeline};
use crate::record::GameResultRecord;
use crate::series::{cumulative_by_model, timeline_len};

/// Default frontier size used by the switchiness report.
pub const DEFAULT_TOP_N: usize = 5;
/// Default number of groups kept by the switchiness report.
pub const DEFAULT_TOP_K: usize = 10;

/// Count models that strictly improve their rank and land inside the top `top_n`,
/// comparing each timestep with the one immediately before it.
///
/// A model without a rank at the previous timestep counts as one place worse than last.
#[must_use]
pub fn count_switches(snapshots: &[RankSnapshot], top_n: usize) -> u64 {
    snapshots
        .windows(2)
        .map(|pair| {
            let (previous, current) = (&pair[0], &pair[1]);
            let unranked = current.len() + 1;
            let improved = current
                .iter()
                .filter(|&(model, new_rank)| {
                    let old_rank = previous.rank_of(model).unwrap_or(unranked);
                    new_rank <= top_n && new_rank < old_rank
                })
                .count();
            u64::try_from(improved).unwrap_or(u64::MAX)
        })
        .sum()
}

/// Switch count and timeline length of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Switchiness {
    pub switches: u64,
    pub timeline: usize,
}

/// Switchiness of one (game, seed) group over cumulative-best scores.
#[must_use]
pub fn group_switchiness(records: &[&GameResultRecord], top_n: usize) -> Switchiness {
    let cumulative = cumulative_by_model(&scores_by_model(records));
    let timeline = timeline_len(&cumulative);
    if timeline <= 1 || cumulative.len() <= 1 {
        return Switchiness {
            switches: 0,
            timeline,
        };
    }

    let snapshots = rank_timeline(&cumulative, timeline);
    Switchiness {
        switches: count_switches(&snapshots, top_n),
        timeline,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupScore {
    pub key: GroupKey,
    pub switches: u64,
    pub models: usize,
    pub timeline: usize,
}

/// Score every group and order them: switches, model count and timeline length
/// descending, then game and seed ascending.
#[must_use]
pub fn score_groups(groups: &Groups<'_>, top_n: usize) -> Vec<GroupScore> {
    let mut scored: Vec<GroupScore> = groups
        .iter()
        .map(|(key, records)| {
            let Switchiness { switches, timeline } = group_switchiness(records, top_n);
            GroupScore {
                key: key.clone(),
                switches,
                models: distinct_models(records),
                timeline,
            }
        })
        .collect();
    scored.sort_by(|a, b| {
        (Reverse(a.switches), Reverse(a.models), Reverse(a.timeline), &a.key).cmp(&(
            Reverse(b.switches),
            Reverse(b.models),
            Reverse(b.timeline),
            &b.key,
        ))
    });
    scored
}

/// Outcome of a switchiness analysis over a whole benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchinessReport {
    pub analyzed_groups: usize,
    pub top_n: usize,
    /// Best `top_k` groups in rank order.
    pub selected: Vec<GroupScore>,
    /// Every record of a selected group, in input order.
    pub records: Vec<GameResultRecord>,
}

/// Rank all (game, seed) groups by switchiness and keep the best `top_k`.
///
/// `games` is an optional allow-list of game names; empty keeps all games.
#[must_use]
pub fn find_switchiest(
    records: &[GameResultRecord],
    games: &[String],
    top_n: usize,
    top_k: usize,
) -> SwitchinessReport {
    let kept = filter_games(records, games);
    let groups = group_records(kept.iter().copied());
    let mut scored = score_groups(&groups, top_n);
    scored.truncate(top_k);
    log::debug!(
        "scored {} groups, keeping {} with top-n {top_n}",
        groups.len(),
        scored.len()
    );

    let chosen: BTreeSet<&GroupKey> = scored.iter().map(|score| &score.key).collect();
    let selected_records = kept
        .into_iter()
        .filter(|record| chosen.contains(&GroupKey::of(record)))
        .cloned()
        .collect();

    SwitchinessReport {
        analyzed_groups: groups.len(),
        top_n,
        selected: scored,
        records: selected_records,
    }
}
