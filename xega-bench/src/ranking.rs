//! Per-timestep rank positions over cumulative-best series.
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Rank of every model at one timestep; 1 is best.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct RankSnapshot {
    ranks: BTreeMap<String, usize>,
}

impl RankSnapshot {
    #[must_use]
    pub fn rank_of(&self, model: &str) -> Option<usize> {
        self.ranks.get(model).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.ranks.iter().map(|(model, rank)| (model.as_str(), *rank))
    }

    /// Models in rank order, best first.
    #[must_use]
    pub fn ordered(&self) -> Vec<&str> {
        let mut models: Vec<(&str, usize)> = self.iter().collect();
        models.sort_by_key(|&(_, rank)| rank);
        models.into_iter().map(|(model, _)| model).collect()
    }
}

/// Score of a series at timestep `t`, holding its last value past the end.
/// Models that never played score negative infinity.
#[must_use]
pub fn value_at(series: &[f64], t: usize) -> f64 {
    series
        .get(t.min(series.len().saturating_sub(1)))
        .copied()
        .unwrap_or(f64::NEG_INFINITY)
}

/// Rank models at timestep `t` by score descending, then model id ascending.
#[must_use]
pub fn rank_snapshot<V: AsRef<[f64]>>(series: &BTreeMap<String, V>, t: usize) -> RankSnapshot {
    let mut standings: Vec<(&str, f64)> = series
        .iter()
        .map(|(model, values)| (model.as_str(), value_at(values.as_ref(), t)))
        .collect();
    standings.sort_by(|a, b| compare_standing(*a, *b));

    let ranks = standings
        .into_iter()
        .enumerate()
        .map(|(index, (model, _))| (model.to_string(), index + 1))
        .collect();
    RankSnapshot { ranks }
}

/// Snapshots for timesteps `0..timeline`.
#[must_use]
pub fn rank_timeline<V: AsRef<[f64]>>(
    series: &BTreeMap<String, V>,
    timeline: usize,
) -> Vec<RankSnapshot> {
    (0..timeline).map(|t| rank_snapshot(series, t)).collect()
}

fn compare_standing(a: (&str, f64), b: (&str, f64)) -> Ordering {
    // total_cmp only breaks NaN ties so -0.0 and 0.0 still compare equal
    b.1.partial_cmp(&a.1)
        .unwrap_or_else(|| b.1.total_cmp(&a.1))
        .then_with(|| a.0.cmp(b.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(entries: &[(&str, &[f64])]) -> BTreeMap<String, Vec<f64>> {
        entries
            .iter()
            .map(|(model, values)| ((*model).to_string(), values.to_vec()))
            .collect()
    }

    #[test]
    fn ranks_by_score_then_model_id() {
        let map = series(&[("zeta", &[2.0]), ("alpha", &[2.0]), ("mid", &[5.0])]);
        let snap = rank_snapshot(&map, 0);
        assert_eq!(snap.rank_of("mid"), Some(1));
        assert_eq!(snap.rank_of("alpha"), Some(2));
        assert_eq!(snap.rank_of("zeta"), Some(3));
        assert_eq!(snap.ordered(), vec!["mid", "alpha", "zeta"]);
    }

    #[test]
    fn snapshot_is_a_bijection() {
        let map = series(&[
            ("a", &[1.0, 4.0]),
            ("b", &[3.0]),
            ("c", &[]),
            ("d", &[3.0, 3.0, 0.5]),
        ]);
        for t in 0..4 {
            let snap = rank_snapshot(&map, t);
            let mut ranks: Vec<usize> = snap.iter().map(|(_, r)| r).collect();
            ranks.sort_unstable();
            assert_eq!(ranks, vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn empty_series_ranks_last_and_short_series_hold_value() {
        let map = series(&[("a", &[]), ("b", &[-10.0]), ("c", &[1.0, 2.0, 3.0])]);
        let snap = rank_snapshot(&map, 2);
        assert_eq!(snap.rank_of("a"), Some(3));
        assert_eq!(snap.rank_of("b"), Some(2));
        assert!((value_at(&[5.0, 6.0], 10) - 6.0).abs() < f64::EPSILON);
        assert!(value_at(&[], 0).is_infinite());
    }

    #[test]
    fn identical_inputs_yield_identical_snapshots() {
        let map = series(&[("x", &[1.0, 1.0]), ("y", &[1.0, 1.0]), ("z", &[0.0, 2.0])]);
        let first = serde_json::to_string(&rank_timeline(&map, 2)).unwrap();
        let second = serde_json::to_string(&rank_timeline(&map, 2)).unwrap();
        assert_eq!(first, second);
    }
}
