//! Quantile bin assignment.
//!
//! Rows are ranked along an ordering key and the rank sequence is cut into K
//! as-equal-as-possible groups. The boundary rule matches linear-interpolation
//! quantile edges over the rank sequence and is load-bearing: it decides which
//! rows a bin's detail plot shows, so it must not change. Ties in the ordering
//! key keep their original order (stable "first" tiebreak).

use std::collections::HashMap;

use ordered_float::OrderedFloat;

use super::AnalysisError;

/// Bin id for the 1-based `rank` among `n` rows cut into `k` quantile groups.
///
/// Edges sit at the interpolated quantiles of the rank sequence, so a rank
/// r > 1 lands in bin ceil((r-1)·k/(n-1)); rank 1 is always in bin 1. Bin
/// sizes differ by at most one, and for n < k exactly n distinct ids occur.
fn bin_for_rank(rank: usize, n: usize, k: usize) -> u32 {
    debug_assert!(rank >= 1 && rank <= n);
    if n <= 1 {
        return 1;
    }
    let bin = ((rank - 1) * k).div_ceil(n - 1);
    bin.max(1) as u32
}

/// Assign quantile bins to `rows` ordered by the parallel `values` slice.
///
/// Returns a map from row id to bin id in [1, k]. Fails for `k < 1` or an
/// empty subset.
pub fn assign_value_bins(
    rows: &[usize],
    values: &[f64],
    k: usize,
) -> Result<HashMap<usize, u32>, AnalysisError> {
    if k < 1 {
        return Err(AnalysisError::InvalidBinCount(k));
    }
    if rows.is_empty() {
        return Err(AnalysisError::EmptySample);
    }
    debug_assert_eq!(rows.len(), values.len());

    let mut order: Vec<usize> = (0..rows.len()).collect();
    // Stable sort: equal values keep subset order, the "first" tiebreak.
    order.sort_by_key(|&i| OrderedFloat(values[i]));

    let n = rows.len();
    let mut bins = HashMap::with_capacity(n);
    for (rank0, &i) in order.iter().enumerate() {
        bins.insert(rows[i], bin_for_rank(rank0 + 1, n, k));
    }
    Ok(bins)
}

/// Assign quantile bins by 0-based position within each group, every group
/// cut independently using its own size.
///
/// `groups` holds row ids per group, in within-group time-step order. Fails
/// for `k < 1` or when no group has any rows.
pub fn assign_position_bins(
    groups: &[Vec<usize>],
    k: usize,
) -> Result<HashMap<usize, u32>, AnalysisError> {
    if k < 1 {
        return Err(AnalysisError::InvalidBinCount(k));
    }
    if groups.iter().all(|group| group.is_empty()) {
        return Err(AnalysisError::EmptySample);
    }
    let mut bins = HashMap::new();
    for group in groups {
        let n = group.len();
        for (position, &row) in group.iter().enumerate() {
            bins.insert(row, bin_for_rank(position + 1, n, k));
        }
    }
    Ok(bins)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin_sizes(bins: &HashMap<usize, u32>, k: usize) -> Vec<usize> {
        let mut sizes = vec![0usize; k];
        for &bin in bins.values() {
            sizes[(bin - 1) as usize] += 1;
        }
        sizes
    }

    #[test]
    fn hundred_rows_ten_bins_split_evenly() {
        let rows: Vec<usize> = (0..100).collect();
        let values: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        let bins = assign_value_bins(&rows, &values, 10).unwrap();
        assert_eq!(bin_sizes(&bins, 10), vec![10; 10]);
        // Bin 1 holds exactly the ten smallest targets.
        for row in 0..10 {
            assert_eq!(bins[&row], 1, "target {} should be in bin 1", row + 1);
        }
        assert_eq!(bins[&10], 2);
    }

    #[test]
    fn uneven_split_differs_by_at_most_one() {
        let rows: Vec<usize> = (0..8).collect();
        let values: Vec<f64> = (0..8).map(|v| v as f64).collect();
        let bins = assign_value_bins(&rows, &values, 3).unwrap();
        // Interpolated edges over ranks 1..=8 give the 3-2-3 split.
        assert_eq!(bin_sizes(&bins, 3), vec![3, 2, 3]);
    }

    #[test]
    fn every_row_gets_exactly_one_bin_in_range() {
        for n in 1..40usize {
            for k in 1..12usize {
                let rows: Vec<usize> = (0..n).collect();
                let values: Vec<f64> = (0..n).map(|v| (v as f64).sin()).collect();
                let bins = assign_value_bins(&rows, &values, k).unwrap();
                assert_eq!(bins.len(), n);
                let sizes = bin_sizes(&bins, k);
                let occupied: Vec<usize> =
                    sizes.iter().copied().filter(|&s| s > 0).collect();
                assert_eq!(occupied.len(), n.min(k), "n={n} k={k}");
                let max = occupied.iter().copied().max().unwrap();
                let min = occupied.iter().copied().min().unwrap();
                assert!(max - min <= 1, "n={n} k={k} sizes={sizes:?}");
            }
        }
    }

    #[test]
    fn tied_values_bin_in_original_order() {
        let rows: Vec<usize> = (0..4).collect();
        let values = [5.0, 5.0, 5.0, 5.0];
        let bins = assign_value_bins(&rows, &values, 2).unwrap();
        // Stable rank: the first two tied rows land in bin 1.
        assert_eq!(bins[&0], 1);
        assert_eq!(bins[&1], 1);
        assert_eq!(bins[&2], 2);
        assert_eq!(bins[&3], 2);
    }

    #[test]
    fn fewer_rows_than_bins_occupy_row_count_bins() {
        let rows = [7usize, 9];
        let values = [1.0, 2.0];
        let bins = assign_value_bins(&rows, &values, 3).unwrap();
        assert_eq!(bins[&7], 1);
        assert_eq!(bins[&9], 3);
    }

    #[test]
    fn grouped_bins_use_each_groups_own_size() {
        let groups = vec![vec![0usize, 1, 2, 3], vec![4usize, 5]];
        let bins = assign_position_bins(&groups, 2).unwrap();
        assert_eq!(bins[&0], 1);
        assert_eq!(bins[&1], 1);
        assert_eq!(bins[&2], 2);
        assert_eq!(bins[&3], 2);
        assert_eq!(bins[&4], 1);
        assert_eq!(bins[&5], 2);
    }

    #[test]
    fn zero_bins_is_a_usage_error() {
        assert_eq!(
            assign_value_bins(&[0], &[1.0], 0),
            Err(AnalysisError::InvalidBinCount(0))
        );
    }

    #[test]
    fn empty_subset_is_a_usage_error() {
        assert_eq!(
            assign_value_bins(&[], &[], 4),
            Err(AnalysisError::EmptySample)
        );
        assert_eq!(
            assign_position_bins(&[Vec::new()], 4),
            Err(AnalysisError::EmptySample)
        );
    }
}
