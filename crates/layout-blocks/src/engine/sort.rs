//! Rank arithmetic for placing blocks within an area.

use crate::SortStorage;

use serde_json::Value;

/// Where a moved block goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Write this rank to the moved block only.
    At(f64),

    /// No usable rank exists between the neighbours; renumber the whole
    /// area densely.
    Renumber,
}

/// Rank for a block appended to an area: one past the highest rank, or 0
/// for an empty area.
pub fn next_sort(sorts: impl IntoIterator<Item = f64>) -> f64 {
    sorts
        .into_iter()
        .reduce(f64::max)
        .map_or(0.0, |max| max + 1.0)
}

/// Rank for a block inserted at `index` among `neighbors`, the ranks of the
/// area's other blocks in ascending order.
///
/// The midpoint of the two neighbours is used; one below the first or one
/// above the last at the edges; 0 in an empty area. When the midpoint
/// cannot be stored (fractional with integer storage) or does not fall
/// strictly between its neighbours, the area must be renumbered.
pub fn place(neighbors: &[f64], index: usize, storage: SortStorage) -> Placement {
    let index = index.min(neighbors.len());
    let prev = index.checked_sub(1).map(|i| neighbors[i]);
    let next = neighbors.get(index).copied();

    let (rank, between) = match (prev, next) {
        (Some(prev), Some(next)) => {
            let mid = prev + (next - prev) / 2.0;
            (mid, prev < mid && mid < next)
        }
        (None, Some(next)) => (next - 1.0, true),
        (Some(prev), None) => (prev + 1.0, true),
        (None, None) => (0.0, true),
    };

    let storable = rank.is_finite() && (!storage.is_integer() || rank.fract() == 0.0);

    if between && storable {
        Placement::At(rank)
    } else {
        Placement::Renumber
    }
}

/// JSON value for a rank. Whole ranks are written as integers.
pub fn sort_value(rank: f64) -> Value {
    if rank.fract() == 0.0 && rank.abs() < i64::MAX as f64 {
        Value::from(rank as i64)
    } else {
        Value::from(rank)
    }
}
