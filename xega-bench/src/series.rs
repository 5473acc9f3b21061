//! Score series: cumulative-best normalization and timeline alignment.
use std::collections::BTreeMap;

/// Best score observed up to and including each attempt.
#[must_use]
pub fn cumulative_max(scores: &[f64]) -> Vec<f64> {
    let mut best = f64::NEG_INFINITY;
    scores
        .iter()
        .map(|&score| {
            if score > best {
                best = score;
            }
            best
        })
        .collect()
}

/// Extend `series` to `len` by repeating its last value.
///
/// A model that stopped playing keeps its last known score; an empty series
/// becomes all zeros. Series already at or beyond `len` are returned as-is.
#[must_use]
pub fn align_series(series: &[f64], len: usize) -> Vec<f64> {
    let fill = series.last().copied().unwrap_or(0.0);
    pad_with(series.to_vec(), len, fill)
}

/// Extend `items` to `len` with copies of `fill`.
#[must_use]
pub fn pad_with<T: Clone>(mut items: Vec<T>, len: usize, fill: T) -> Vec<T> {
    if items.len() < len {
        items.resize(len, fill);
    }
    items
}

/// Longest series length across models (the group's timeline length T).
#[must_use]
pub fn timeline_len<V: AsRef<[f64]>>(series: &BTreeMap<String, V>) -> usize {
    series
        .values()
        .map(|values| values.as_ref().len())
        .max()
        .unwrap_or(0)
}

/// Cumulative-max series for every model, computed independently.
#[must_use]
pub fn cumulative_by_model(raw: &BTreeMap<String, Vec<f64>>) -> BTreeMap<String, Vec<f64>> {
    raw.iter()
        .map(|(model, scores)| (model.clone(), cumulative_max(scores)))
        .collect()
}

/// Align every model's series to `len`.
#[must_use]
pub fn align_all(series: &BTreeMap<String, Vec<f64>>, len: usize) -> BTreeMap<String, Vec<f64>> {
    series
        .iter()
        .map(|(model, values)| (model.clone(), align_series(values, len)))
        .collect()
}
