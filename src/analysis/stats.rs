//! Small order-statistics helpers shared across the analysis modules.

use ordered_float::OrderedFloat;

/// Sort a copy of `values` into total order.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by_key(|v| OrderedFloat(*v));
    out
}

/// Sample median: mean of the two middle order statistics for even sizes.
/// Returns `None` for an empty sample.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Value at the `pct`-th percentile of an ascending-sorted sample, using
/// linear interpolation between the two nearest order statistics.
///
/// `pct` is clamped to [0, 100]. The sample must be non-empty.
pub fn percentile_of_sorted(sorted: &[f64], pct: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pct = pct.clamp(0.0, 100.0);
    if pct >= 100.0 {
        return sorted[sorted.len() - 1];
    }
    let rank = (pct / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor();
    let fraction = rank - lower;
    let index = lower as usize;
    let lo = sorted[index];
    let hi = sorted[index + 1];
    lo + (hi - lo) * fraction
}
