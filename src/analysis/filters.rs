//! Per-column filter state and total recomputation of the active subset.

use std::collections::{BTreeMap, BTreeSet};

use time::Date;

use crate::dataset::{Dataset, DatasetError};

/// Bounds for a numeric filter; an absent side is unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NumericBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Bounds for a datetime filter; an absent side is unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DateBounds {
    pub start: Option<Date>,
    pub end: Option<Date>,
}

/// Which family a filter belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    Numeric,
    Categorical,
    DateTime,
}

/// Independent predicate sets per column. The active subset is the
/// intersection of every constraint; absence of an entry means the column is
/// unconstrained.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterState {
    pub numeric: BTreeMap<String, NumericBounds>,
    pub categorical: BTreeMap<String, BTreeSet<String>>,
    pub datetime: BTreeMap<String, DateBounds>,
}

/// One row of the live filter summary list.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterSummaryRow {
    pub column: String,
    pub kind: FilterKind,
    pub label: String,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.numeric.is_empty() && self.categorical.is_empty() && self.datetime.is_empty()
    }

    pub fn clear(&mut self) {
        self.numeric.clear();
        self.categorical.clear();
        self.datetime.clear();
    }

    /// Drop the constraint on one column.
    pub fn remove(&mut self, kind: FilterKind, column: &str) {
        match kind {
            FilterKind::Numeric => {
                self.numeric.remove(column);
            }
            FilterKind::Categorical => {
                self.categorical.remove(column);
            }
            FilterKind::DateTime => {
                self.datetime.remove(column);
            }
        }
    }

    /// Human-readable rows for the summary list. An empty categorical set is
    /// not shown since it applies no constraint.
    pub fn summary(&self) -> Vec<FilterSummaryRow> {
        let mut rows = Vec::new();
        for (column, bounds) in &self.numeric {
            rows.push(FilterSummaryRow {
                column: column.clone(),
                kind: FilterKind::Numeric,
                label: format!(
                    "Min: {}, Max: {}",
                    bound_text(bounds.min),
                    bound_text(bounds.max)
                ),
            });
        }
        for (column, bounds) in &self.datetime {
            rows.push(FilterSummaryRow {
                column: column.clone(),
                kind: FilterKind::DateTime,
                label: format!(
                    "Start: {}, End: {}",
                    date_text(bounds.start),
                    date_text(bounds.end)
                ),
            });
        }
        for (column, included) in &self.categorical {
            if included.is_empty() {
                continue;
            }
            let mut values: Vec<&str> = included.iter().map(String::as_str).collect();
            values.sort_unstable();
            rows.push(FilterSummaryRow {
                column: column.clone(),
                kind: FilterKind::Categorical,
                label: format!("Categories: {}", values.join(", ")),
            });
        }
        rows
    }
}

fn bound_text(bound: Option<f64>) -> String {
    bound.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

fn date_text(bound: Option<Date>) -> String {
    bound.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
}

/// Apply every active filter to the dataset, returning surviving row ids in
/// load order. Recomputation is total: the subset is rebuilt from the full
/// dataset on every call.
pub fn apply(dataset: &Dataset, filters: &FilterState) -> Result<Vec<usize>, DatasetError> {
    let mut rows: Vec<usize> = (0..dataset.row_count()).collect();

    for (column, bounds) in &filters.numeric {
        let values = dataset.numeric(column)?;
        rows.retain(|&row| {
            let v = values[row];
            bounds.min.is_none_or(|min| v >= min) && bounds.max.is_none_or(|max| v <= max)
        });
    }

    for (column, included) in &filters.categorical {
        if included.is_empty() {
            // Deliberate policy: an empty selection filters nothing.
            continue;
        }
        let data = dataset
            .column(column)
            .ok_or_else(|| DatasetError::MissingColumn(column.clone()))?;
        let values = data.data.as_categorical().ok_or_else(|| {
            DatasetError::WrongColumnKind {
                name: column.clone(),
                expected: crate::dataset::ColumnKind::Categorical,
                actual: data.data.kind(),
            }
        })?;
        rows.retain(|&row| included.contains(&values[row]));
    }

    for (column, bounds) in &filters.datetime {
        let data = dataset
            .column(column)
            .ok_or_else(|| DatasetError::MissingColumn(column.clone()))?;
        let values = data.data.as_datetime().ok_or_else(|| {
            DatasetError::WrongColumnKind {
                name: column.clone(),
                expected: crate::dataset::ColumnKind::DateTime,
                actual: data.data.kind(),
            }
        })?;
        rows.retain(|&row| {
            let v = values[row];
            bounds.start.is_none_or(|start| v >= start)
                && bounds.end.is_none_or(|end| v <= end)
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, ColumnData};
    use time::macros::date;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column {
                name: "load".into(),
                data: ColumnData::Numeric(vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            },
            Column {
                name: "site".into(),
                data: ColumnData::Categorical(
                    ["a", "b", "a", "c", "b"].iter().map(|s| s.to_string()).collect(),
                ),
            },
            Column {
                name: "day".into(),
                data: ColumnData::DateTime(vec![
                    date!(2026 - 01 - 01),
                    date!(2026 - 01 - 02),
                    date!(2026 - 01 - 03),
                    date!(2026 - 01 - 04),
                    date!(2026 - 01 - 05),
                ]),
            },
        ])
        .unwrap()
    }

    #[test]
    fn no_filters_keep_every_row() {
        let rows = apply(&sample(), &FilterState::default()).unwrap();
        assert_eq!(rows, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn numeric_bounds_are_inclusive() {
        let mut filters = FilterState::default();
        filters.numeric.insert(
            "load".into(),
            NumericBounds {
                min: Some(2.0),
                max: Some(4.0),
            },
        );
        assert_eq!(apply(&sample(), &filters).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn one_sided_numeric_bound_applies_alone() {
        let mut filters = FilterState::default();
        filters.numeric.insert(
            "load".into(),
            NumericBounds {
                min: None,
                max: Some(2.0),
            },
        );
        assert_eq!(apply(&sample(), &filters).unwrap(), vec![0, 1]);
    }

    #[test]
    fn empty_category_set_filters_nothing() {
        let mut filters = FilterState::default();
        filters.categorical.insert("site".into(), BTreeSet::new());
        assert_eq!(apply(&sample(), &filters).unwrap().len(), 5);
    }

    #[test]
    fn category_membership_intersects_with_numeric() {
        let mut filters = FilterState::default();
        filters
            .categorical
            .insert("site".into(), BTreeSet::from(["a".to_string(), "b".to_string()]));
        filters.numeric.insert(
            "load".into(),
            NumericBounds {
                min: Some(2.0),
                max: None,
            },
        );
        assert_eq!(apply(&sample(), &filters).unwrap(), vec![1, 2, 4]);
    }

    #[test]
    fn datetime_bounds_are_inclusive() {
        let mut filters = FilterState::default();
        filters.datetime.insert(
            "day".into(),
            DateBounds {
                start: Some(date!(2026 - 01 - 02)),
                end: Some(date!(2026 - 01 - 04)),
            },
        );
        assert_eq!(apply(&sample(), &filters).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let mut filters = FilterState::default();
        filters.numeric.insert(
            "load".into(),
            NumericBounds {
                min: Some(2.0),
                max: Some(5.0),
            },
        );
        let dataset = sample();
        let once = apply(&dataset, &filters).unwrap();
        let twice = apply(&dataset, &filters).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn adding_a_bound_never_grows_the_subset() {
        let dataset = sample();
        let mut filters = FilterState::default();
        let unbounded = apply(&dataset, &filters).unwrap().len();
        filters.numeric.insert(
            "load".into(),
            NumericBounds {
                min: Some(3.0),
                max: None,
            },
        );
        let bounded = apply(&dataset, &filters).unwrap().len();
        assert!(bounded <= unbounded);
        filters.numeric.insert(
            "load".into(),
            NumericBounds {
                min: Some(3.0),
                max: Some(4.0),
            },
        );
        let tighter = apply(&dataset, &filters).unwrap().len();
        assert!(tighter <= bounded);
    }

    #[test]
    fn summary_lists_active_filters_with_removal_keys() {
        let mut filters = FilterState::default();
        filters.numeric.insert(
            "load".into(),
            NumericBounds {
                min: Some(1.0),
                max: None,
            },
        );
        filters
            .categorical
            .insert("site".into(), BTreeSet::from(["a".to_string()]));
        let summary = filters.summary();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].label, "Min: 1, Max: -");

        filters.remove(summary[0].kind, &summary[0].column);
        filters.remove(summary[1].kind, &summary[1].column);
        assert!(filters.is_empty());
    }
}
