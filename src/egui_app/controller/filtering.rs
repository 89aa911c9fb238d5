//! Filter window wiring: per-column editors, the live summary list, and
//! total recomputation of the filtered subset.

use std::collections::BTreeSet;

use crate::analysis::filters::{DateBounds, FilterKind, NumericBounds};
use crate::dataset::ColumnKind;
use crate::egui_app::state::*;

use super::EguiController;

impl EguiController {
    /// Open the per-column filter window for the loaded dataset.
    pub fn open_filter_panel(&mut self) {
        let Some(session) = &self.session else { return };
        let panel = &mut self.ui.filters;
        panel.numeric_columns.clear();
        panel.categorical_columns.clear();
        panel.datetime_columns.clear();
        for column in session.dataset.attribute_columns(&session.columns) {
            let list = match column.data.kind() {
                ColumnKind::Numeric => &mut panel.numeric_columns,
                ColumnKind::Categorical => &mut panel.categorical_columns,
                ColumnKind::DateTime => &mut panel.datetime_columns,
            };
            list.push(column.name.clone());
        }
        if panel.numeric_columns.is_empty()
            && panel.categorical_columns.is_empty()
            && panel.datetime_columns.is_empty()
        {
            self.set_status("No variables to filter on", StatusTone::Warning);
            return;
        }
        panel.open = true;
        panel.editor = None;
        self.refresh_filter_summary();
    }

    pub fn close_filter_panel(&mut self) {
        self.ui.filters.open = false;
        self.ui.filters.editor = None;
    }

    /// Show the editor for one column, seeded from the active filter or the
    /// column's own span.
    pub fn edit_filter_column(&mut self, kind: FilterKind, column: &str) {
        let Some(session) = &self.session else { return };
        let dataset = &session.dataset;
        let editor = match kind {
            FilterKind::Numeric => {
                let Ok(values) = dataset.numeric(column) else { return };
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let bounds = session.filters.numeric.get(column).copied().unwrap_or_default();
                let lo = bounds.min.unwrap_or(min);
                let hi = bounds.max.unwrap_or(max);
                FilterEditor::Numeric(NumericFilterEditor {
                    column: column.to_string(),
                    min_limit: min,
                    max_limit: max,
                    lo,
                    hi,
                    lo_entry: format_bound(lo),
                    hi_entry: format_bound(hi),
                })
            }
            FilterKind::Categorical => {
                let Some(data) = dataset.column(column) else { return };
                let Some(values) = data.data.as_categorical() else { return };
                let included = session.filters.categorical.get(column);
                let mut seen = BTreeSet::new();
                for value in values {
                    seen.insert(value.clone());
                }
                let choices = seen
                    .into_iter()
                    .map(|value| {
                        let picked = included.is_some_and(|set| set.contains(&value));
                        (value, picked)
                    })
                    .collect();
                FilterEditor::Categorical(CategoricalFilterEditor {
                    column: column.to_string(),
                    choices,
                })
            }
            FilterKind::DateTime => {
                let Some(data) = dataset.column(column) else { return };
                let Some(values) = data.data.as_datetime() else { return };
                let min = values.iter().min().copied();
                let max = values.iter().max().copied();
                let bounds = session.filters.datetime.get(column).copied().unwrap_or_default();
                let start = bounds.start.or(min);
                let end = bounds.end.or(max);
                FilterEditor::DateTime(DateTimeFilterEditor {
                    column: column.to_string(),
                    min_limit: min.map(|d| d.to_string()).unwrap_or_default(),
                    max_limit: max.map(|d| d.to_string()).unwrap_or_default(),
                    start_entry: start.map(|d| d.to_string()).unwrap_or_default(),
                    end_entry: end.map(|d| d.to_string()).unwrap_or_default(),
                    parse_error: None,
                })
            }
        };
        self.ui.filters.editor = Some(editor);
    }

    /// Commit the numeric editor's window as that column's filter.
    pub fn commit_numeric_filter(&mut self) {
        let Some(FilterEditor::Numeric(editor)) = self.ui.filters.editor.clone() else {
            return;
        };
        let lo = editor.lo_entry.trim().parse::<f64>().unwrap_or(editor.lo);
        let hi = editor.hi_entry.trim().parse::<f64>().unwrap_or(editor.hi);
        let lo = lo.clamp(editor.min_limit, editor.max_limit);
        let hi = hi.clamp(editor.min_limit, editor.max_limit);
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        if let Some(FilterEditor::Numeric(editor)) = self.ui.filters.editor.as_mut() {
            editor.lo = lo;
            editor.hi = hi;
            editor.lo_entry = format_bound(lo);
            editor.hi_entry = format_bound(hi);
        }
        let Some(session) = self.session.as_mut() else { return };
        session.filters.numeric.insert(
            editor.column.clone(),
            NumericBounds {
                min: Some(lo),
                max: Some(hi),
            },
        );
        self.apply_filters_and_refresh();
    }

    /// Toggle one category in the categorical editor.
    pub fn toggle_category(&mut self, column: &str, category: &str, included: bool) {
        let Some(session) = self.session.as_mut() else { return };
        let set = session
            .filters
            .categorical
            .entry(column.to_string())
            .or_default();
        if included {
            set.insert(category.to_string());
        } else {
            set.remove(category);
        }
        if set.is_empty() {
            // An empty selection constrains nothing; drop the entry so the
            // summary list does not show a no-op filter.
            session.filters.categorical.remove(column);
        }
        if let Some(FilterEditor::Categorical(editor)) = self.ui.filters.editor.as_mut() {
            if editor.column == column {
                if let Some(choice) = editor.choices.iter_mut().find(|(name, _)| name == category)
                {
                    choice.1 = included;
                }
            }
        }
        self.apply_filters_and_refresh();
    }

    /// Commit the datetime editor's entries as that column's filter.
    pub fn commit_datetime_filter(&mut self) {
        let Some(FilterEditor::DateTime(editor)) = self.ui.filters.editor.clone() else {
            return;
        };
        let start = crate::dataset::parse_cell_date(&editor.start_entry);
        let end = crate::dataset::parse_cell_date(&editor.end_entry);
        if (start.is_none() && !editor.start_entry.trim().is_empty())
            || (end.is_none() && !editor.end_entry.trim().is_empty())
        {
            if let Some(FilterEditor::DateTime(editor)) = self.ui.filters.editor.as_mut() {
                editor.parse_error = Some("Dates must be YYYY-MM-DD".into());
            }
            return;
        }
        if let Some(FilterEditor::DateTime(editor)) = self.ui.filters.editor.as_mut() {
            editor.parse_error = None;
        }
        let Some(session) = self.session.as_mut() else { return };
        if start.is_none() && end.is_none() {
            session.filters.datetime.remove(&editor.column);
        } else {
            session
                .filters
                .datetime
                .insert(editor.column.clone(), DateBounds { start, end });
        }
        self.apply_filters_and_refresh();
    }

    /// Remove one filter from the live summary list.
    pub fn remove_filter(&mut self, index: usize) {
        let Some(row) = self.ui.filters.summary.get(index).cloned() else {
            return;
        };
        let Some(session) = self.session.as_mut() else { return };
        session.filters.remove(row.kind, &row.column);
        // Re-seed an open editor for that column so it shows the full span.
        let editing_same = match &self.ui.filters.editor {
            Some(FilterEditor::Numeric(editor)) => editor.column == row.column,
            Some(FilterEditor::Categorical(editor)) => editor.column == row.column,
            Some(FilterEditor::DateTime(editor)) => editor.column == row.column,
            None => false,
        };
        if editing_same {
            self.edit_filter_column(row.kind, &row.column);
        }
        self.apply_filters_and_refresh();
    }

    /// Recompute the subset and both plots after any filter change.
    pub(crate) fn apply_filters_and_refresh(&mut self) {
        if self.controls_locked() {
            tracing::warn!("Ignoring filter change while replay is running");
            return;
        }
        self.rebuild_all();
        self.refresh_filter_summary();
        let counts = self
            .session
            .as_ref()
            .map(|session| (session.filtered_rows.len(), session.dataset.row_count()));
        if let Some((kept, total)) = counts {
            self.set_status(
                format!("{kept} of {total} rows match the active filters"),
                StatusTone::Info,
            );
        }
    }

    pub(crate) fn refresh_filter_summary(&mut self) {
        if let Some(session) = &self.session {
            self.ui.filters.summary = session.filters.summary();
        }
    }

    pub(crate) fn reset_filter_panel(&mut self) {
        self.ui.filters = FilterPanelState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use super::*;
    use crate::dataset::{Column, ColumnData, Dataset, SelectedColumns};

    fn controller_with_site() -> EguiController {
        let dataset = Dataset::new(vec![
            Column {
                name: "load".into(),
                data: ColumnData::Numeric((1..=10).map(|v| v as f64).collect()),
            },
            Column {
                name: "error_ridge".into(),
                data: ColumnData::Numeric((0..10).map(|v| (v as f64).sin()).collect()),
            },
            Column {
                name: "error_forest".into(),
                data: ColumnData::Numeric((0..10).map(|v| (v as f64).cos()).collect()),
            },
            Column {
                name: "temp".into(),
                data: ColumnData::Numeric((0..10).map(|v| v as f64 * 2.0).collect()),
            },
            Column {
                name: "site".into(),
                data: ColumnData::Categorical(
                    ["n", "s", "n", "s", "n", "s", "n", "s", "n", "s"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                ),
            },
        ])
        .unwrap();
        let columns = SelectedColumns {
            target: "load".into(),
            individual: None,
            models: ["ridge".into(), "forest".into()],
        };
        test_support::controller_with(dataset, columns)
    }

    #[test]
    fn filter_panel_sorts_columns_by_kind() {
        let mut controller = controller_with_site();
        controller.open_filter_panel();
        let panel = &controller.ui.filters;
        assert!(panel.open);
        assert_eq!(panel.numeric_columns, vec!["temp".to_string()]);
        assert_eq!(panel.categorical_columns, vec!["site".to_string()]);
        assert!(panel.datetime_columns.is_empty());
    }

    #[test]
    fn numeric_filter_commit_narrows_the_subset() {
        let mut controller = controller_with_site();
        controller.open_filter_panel();
        controller.edit_filter_column(FilterKind::Numeric, "temp");
        if let Some(FilterEditor::Numeric(editor)) = controller.ui.filters.editor.as_mut() {
            editor.lo_entry = "4".into();
            editor.hi_entry = "10".into();
        }
        controller.commit_numeric_filter();
        let session = controller.session_ref().unwrap();
        assert_eq!(session.filtered_rows, vec![2, 3, 4, 5]);
        assert_eq!(controller.ui.filters.summary.len(), 1);
    }

    #[test]
    fn deselecting_every_category_drops_the_constraint() {
        let mut controller = controller_with_site();
        controller.open_filter_panel();
        controller.toggle_category("site", "n", true);
        assert_eq!(controller.session_ref().unwrap().filtered_rows.len(), 5);
        controller.toggle_category("site", "n", false);
        assert_eq!(controller.session_ref().unwrap().filtered_rows.len(), 10);
        assert!(controller.ui.filters.summary.is_empty());
    }

    #[test]
    fn removing_a_summary_row_restores_rows() {
        let mut controller = controller_with_site();
        controller.open_filter_panel();
        controller.edit_filter_column(FilterKind::Numeric, "temp");
        if let Some(FilterEditor::Numeric(editor)) = controller.ui.filters.editor.as_mut() {
            editor.lo_entry = "6".into();
            editor.hi_entry = "18".into();
        }
        controller.commit_numeric_filter();
        assert!(controller.session_ref().unwrap().filtered_rows.len() < 10);

        controller.remove_filter(0);
        assert_eq!(controller.session_ref().unwrap().filtered_rows.len(), 10);
        assert!(controller.ui.filters.summary.is_empty());
    }
}
