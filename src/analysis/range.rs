//! Range windowing of the active subset.
//!
//! The window's meaning depends on the display mode: record positions in
//! `timesteps` mode (applied per individual when the data is grouped) or
//! target-value bounds in `target` mode.

use crate::dataset::{Dataset, DatasetError};

/// What the summary/detail pair plots along the range axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Range bounds are target values.
    #[default]
    Target,
    /// Range bounds are record positions (per individual when grouped).
    Timesteps,
}

/// A resolved window over the subset. Unbounded sides are `None`.
#[derive(Clone, Debug, PartialEq)]
pub enum RangeWindow {
    /// No restriction.
    All,
    /// Inclusive bounds on the target value, dataset-wide.
    Target { lo: Option<f64>, hi: Option<f64> },
    /// Bounds on 0-based record positions. Ungrouped, both present ends are
    /// inclusive; grouped, a two-sided window is the positional slice
    /// [lo, hi) inside each group, one-sided windows take the first `hi`
    /// rows or the rows from `lo` on.
    Positions { lo: Option<usize>, hi: Option<usize> },
}

/// Restrict `rows` to the window. `rows` must be in load order; the output
/// preserves that order. `group_ids` are per-row ids over the full dataset
/// (see [`Dataset::group_ids`]); `None` means the data is ungrouped.
pub fn select_range(
    dataset: &Dataset,
    rows: &[usize],
    window: &RangeWindow,
    target: &str,
    group_ids: Option<&[u32]>,
) -> Result<Vec<usize>, DatasetError> {
    match window {
        RangeWindow::All => Ok(rows.to_vec()),
        RangeWindow::Target { lo, hi } => {
            let values = dataset.numeric(target)?;
            Ok(rows
                .iter()
                .copied()
                .filter(|&row| {
                    let v = values[row];
                    lo.is_none_or(|lo| v >= lo) && hi.is_none_or(|hi| v <= hi)
                })
                .collect())
        }
        RangeWindow::Positions { lo, hi } => match group_ids {
            None => Ok(positions_ungrouped(rows, *lo, *hi)),
            Some(ids) => Ok(positions_grouped(rows, ids, *lo, *hi)),
        },
    }
}

fn positions_ungrouped(rows: &[usize], lo: Option<usize>, hi: Option<usize>) -> Vec<usize> {
    rows.iter()
        .copied()
        .enumerate()
        .filter(|(position, _)| {
            lo.is_none_or(|lo| *position >= lo) && hi.is_none_or(|hi| *position <= hi)
        })
        .map(|(_, row)| row)
        .collect()
}

/// Per-individual windowing: "time step 0..N" means the Nth observation of
/// each individual, not a global row slice. Positions count within the
/// subset, per group, in load order.
fn positions_grouped(
    rows: &[usize],
    group_ids: &[u32],
    lo: Option<usize>,
    hi: Option<usize>,
) -> Vec<usize> {
    use std::collections::HashMap;
    let mut counters: HashMap<u32, usize> = HashMap::new();
    rows.iter()
        .copied()
        .filter(|&row| {
            let counter = counters.entry(group_ids[row]).or_insert(0);
            let position = *counter;
            *counter += 1;
            match (lo, hi) {
                (None, None) => true,
                (None, Some(hi)) => position < hi,
                (Some(lo), None) => position >= lo,
                (Some(lo), Some(hi)) => position >= lo && position < hi,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, ColumnData};

    fn grouped_dataset() -> Dataset {
        // Two individuals with group sizes [3, 7], interleaved at the start
        // so per-group positions differ from global positions.
        let sites = ["a", "b", "a", "b", "a", "b", "b", "b", "b", "b"];
        Dataset::new(vec![
            Column {
                name: "load".into(),
                data: ColumnData::Numeric((1..=10).map(|v| v as f64).collect()),
            },
            Column {
                name: "site".into(),
                data: ColumnData::Categorical(sites.iter().map(|s| s.to_string()).collect()),
            },
        ])
        .unwrap()
    }

    #[test]
    fn unbounded_window_is_identity() {
        let dataset = grouped_dataset();
        let rows: Vec<usize> = (0..10).collect();
        let out = select_range(&dataset, &rows, &RangeWindow::All, "load", None).unwrap();
        assert_eq!(out, rows);
    }

    #[test]
    fn target_bounds_are_inclusive_dataset_wide() {
        let dataset = grouped_dataset();
        let rows: Vec<usize> = (0..10).collect();
        let window = RangeWindow::Target {
            lo: Some(3.0),
            hi: Some(5.0),
        };
        let out = select_range(&dataset, &rows, &window, "load", None).unwrap();
        assert_eq!(out, vec![2, 3, 4]);
    }

    #[test]
    fn ungrouped_positions_include_both_ends() {
        let dataset = grouped_dataset();
        let rows: Vec<usize> = (0..10).collect();
        let window = RangeWindow::Positions {
            lo: Some(2),
            hi: Some(4),
        };
        let out = select_range(&dataset, &rows, &window, "load", None).unwrap();
        assert_eq!(out, vec![2, 3, 4]);
    }

    #[test]
    fn grouped_window_takes_first_rows_of_each_group() {
        let dataset = grouped_dataset();
        let rows: Vec<usize> = (0..10).collect();
        let ids = dataset.group_ids("site").unwrap();
        let window = RangeWindow::Positions {
            lo: None,
            hi: Some(2),
        };
        let out = select_range(&dataset, &rows, &window, "load", Some(&ids)).unwrap();
        // First two of individual "a" (rows 0, 2) and of "b" (rows 1, 3),
        // regardless of the interleaved overall order.
        assert_eq!(out, vec![0, 1, 2, 3]);
    }

    #[test]
    fn grouped_two_sided_window_is_half_open() {
        let dataset = grouped_dataset();
        let rows: Vec<usize> = (0..10).collect();
        let ids = dataset.group_ids("site").unwrap();
        let window = RangeWindow::Positions {
            lo: Some(0),
            hi: Some(2),
        };
        let out = select_range(&dataset, &rows, &window, "load", Some(&ids)).unwrap();
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn grouped_lower_bound_keeps_tail_of_each_group() {
        let dataset = grouped_dataset();
        let rows: Vec<usize> = (0..10).collect();
        let ids = dataset.group_ids("site").unwrap();
        let window = RangeWindow::Positions {
            lo: Some(2),
            hi: None,
        };
        let out = select_range(&dataset, &rows, &window, "load", Some(&ids)).unwrap();
        // "a" has 3 rows -> its last one; "b" has 7 -> its last five.
        assert_eq!(out, vec![4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn grouped_positions_count_within_the_given_subset() {
        let dataset = grouped_dataset();
        // Subset with the first row of "a" already filtered out.
        let rows: Vec<usize> = (1..10).collect();
        let ids = dataset.group_ids("site").unwrap();
        let window = RangeWindow::Positions {
            lo: None,
            hi: Some(1),
        };
        let out = select_range(&dataset, &rows, &window, "load", Some(&ids)).unwrap();
        // First remaining row of each group: row 2 for "a", row 1 for "b".
        assert_eq!(out, vec![1, 2]);
    }
}
