//! The recompute pipeline: filtered subset → range window → quantile bins →
//! outlier ranking → view models.
//!
//! Every state change runs this pipeline to completion; the renderer reads
//! the resulting views on the same cycle.

use std::collections::HashMap;

use crate::analysis::range::{DisplayMode, RangeWindow, select_range};
use crate::analysis::{AnalysisError, binning, filters, hull, outlier};
use crate::dataset::DatasetError;
use crate::egui_app::state::{SelectionState, StatusTone, format_bound};
use crate::egui_app::view_model;

use super::{EguiController, Session};

impl EguiController {
    /// Recompute the filtered subset and rebuild both plots.
    pub(crate) fn rebuild_all(&mut self) {
        let failed = match self.session.as_mut() {
            Some(session) => match filters::apply(&session.dataset, &session.filters) {
                Ok(rows) => {
                    session.filtered_rows = rows;
                    None
                }
                Err(err) => Some(err),
            },
            None => None,
        };
        if let Some(err) = failed {
            self.set_status(format!("Failed to apply filters: {err}"), StatusTone::Error);
            return;
        }
        self.rebuild_plots();
    }

    /// Rebuild the summary and detail views from the current subset.
    pub(crate) fn rebuild_plots(&mut self) {
        let Some(session) = &self.session else {
            self.ui.summary = None;
            self.ui.detail = None;
            return;
        };

        match build_views(session) {
            Ok((summary, detail)) => {
                self.ui.summary = Some(summary);
                self.ui.detail = Some(detail);
                self.ui.detail_notice = None;
            }
            Err(BuildError::Detail { summary, reason }) => {
                // The summary survived; only the detail render is skipped,
                // with a diagnostic instead of a wrong plot.
                self.ui.summary = summary.map(|s| *s);
                self.ui.detail = None;
                self.ui.detail_notice = Some(reason.clone());
                self.set_status(reason, StatusTone::Error);
            }
            Err(BuildError::Whole(reason)) => {
                self.ui.summary = None;
                self.ui.detail = None;
                self.ui.detail_notice = Some(reason.clone());
                self.set_status(reason, StatusTone::Error);
            }
        }
    }
}

/// Why a rebuild could not produce both views.
enum BuildError {
    /// Nothing could be plotted at all.
    Whole(String),
    /// The summary is fine but the detail render was skipped.
    Detail {
        summary: Option<Box<view_model::SummaryPlotView>>,
        reason: String,
    },
}

impl From<DatasetError> for BuildError {
    fn from(err: DatasetError) -> Self {
        BuildError::Whole(err.to_string())
    }
}

fn build_views(
    session: &Session,
) -> Result<(view_model::SummaryPlotView, view_model::DetailPlotView), BuildError> {
    let dataset = &session.dataset;
    let selection = &session.selection;
    let target = dataset.numeric(&session.columns.target)?;
    let group_ids = match &session.columns.individual {
        Some(name) => Some(dataset.group_ids(name)?),
        None => None,
    };

    let window = range_window(selection, target);
    let ranged = select_range(
        dataset,
        &session.filtered_rows,
        &window,
        &session.columns.target,
        group_ids.as_deref(),
    )?;
    if ranged.is_empty() {
        return Err(BuildError::Whole(
            "No rows remain after filtering; relax the filters or the range".into(),
        ));
    }

    let bins = assign_bins(&ranged, target, group_ids.as_deref(), selection.bin_count)
        .map_err(|err| BuildError::Whole(err.to_string()))?;

    let summary = build_summary(session, &ranged, &bins)?;
    match build_detail(session, &ranged, &bins, &window) {
        Ok(detail) => Ok((summary, detail)),
        Err(reason) => Err(BuildError::Detail {
            summary: Some(Box::new(summary)),
            reason,
        }),
    }
}

/// Translate selection bounds into a core range window. In target mode the
/// controls always span the full target range, so covering bounds mean "no
/// restriction"; in timesteps mode negative bounds mean an unbounded side.
fn range_window(selection: &SelectionState, target: &[f64]) -> RangeWindow {
    match selection.mode {
        DisplayMode::Target => {
            let min = target.iter().copied().fold(f64::INFINITY, f64::min);
            let max = target.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let lo = selection.range_lo;
            let hi = selection.range_hi;
            if lo <= min && hi >= max {
                RangeWindow::All
            } else {
                RangeWindow::Target {
                    lo: Some(lo),
                    hi: Some(hi),
                }
            }
        }
        DisplayMode::Timesteps => {
            let lo = (selection.range_lo >= 0.0).then(|| selection.range_lo.round() as usize);
            let hi = (selection.range_hi >= 0.0).then(|| selection.range_hi.round() as usize);
            match (lo, hi) {
                (None, None) => RangeWindow::All,
                (lo, hi) => RangeWindow::Positions { lo, hi },
            }
        }
    }
}

/// Bin the ranged subset: by target rank when ungrouped, by within-group
/// position when an individual column is set.
fn assign_bins(
    ranged: &[usize],
    target: &[f64],
    group_ids: Option<&[u32]>,
    bin_count: u32,
) -> Result<HashMap<usize, u32>, AnalysisError> {
    let k = bin_count as usize;
    match group_ids {
        None => {
            let values: Vec<f64> = ranged.iter().map(|&row| target[row]).collect();
            binning::assign_value_bins(ranged, &values, k)
        }
        Some(ids) => {
            let groups = collect_groups(ranged, ids);
            binning::assign_position_bins(&groups, k)
        }
    }
}

/// Split subset rows into per-group id lists, first-seen group order,
/// preserving within-group load order.
fn collect_groups(rows: &[usize], group_ids: &[u32]) -> Vec<Vec<usize>> {
    let mut order: HashMap<u32, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for &row in rows {
        let id = group_ids[row];
        let index = *order.entry(id).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[index].push(row);
    }
    groups
}

fn build_summary(
    session: &Session,
    ranged: &[usize],
    bins: &HashMap<usize, u32>,
) -> Result<view_model::SummaryPlotView, BuildError> {
    let [first_name, second_name] = session.columns.error_columns();
    let first = session.dataset.numeric(&first_name)?;
    let second = session.dataset.numeric(&second_name)?;
    let k = session.selection.bin_count;

    let mut per_bin: Vec<(Vec<f64>, Vec<f64>)> = vec![Default::default(); k as usize];
    for &row in ranged {
        let Some(&bin) = bins.get(&row) else { continue };
        let slot = &mut per_bin[(bin - 1) as usize];
        slot.0.push(first[row]);
        slot.1.push(second[row]);
    }

    Ok(view_model::summary_view(
        k,
        &per_bin,
        session.columns.models.clone(),
        session.selection.selected_bin,
    ))
}

fn build_detail(
    session: &Session,
    ranged: &[usize],
    bins: &HashMap<usize, u32>,
    window: &RangeWindow,
) -> Result<view_model::DetailPlotView, String> {
    let [first_name, second_name] = session.columns.error_columns();
    let dataset = &session.dataset;
    let first = dataset.numeric(&first_name).map_err(|e| e.to_string())?;
    let second = dataset.numeric(&second_name).map_err(|e| e.to_string())?;
    let target = dataset
        .numeric(&session.columns.target)
        .map_err(|e| e.to_string())?;
    let selection = &session.selection;

    let shown: Vec<usize> = if selection.selected_bin > 0 {
        ranged
            .iter()
            .copied()
            .filter(|row| bins.get(row) == Some(&selection.selected_bin))
            .collect()
    } else {
        ranged.to_vec()
    };
    if shown.is_empty() {
        return Err(format!(
            "Quantile {} holds no rows under the current filters",
            selection.selected_bin
        ));
    }

    let points: Vec<outlier::ErrorPoint> = shown
        .iter()
        .map(|&row| outlier::ErrorPoint::new(first[row], second[row]))
        .collect();
    let ranking = outlier::rank(&points).map_err(|err| match err {
        AnalysisError::DegenerateCovariance => format!(
            "Cannot rank this subset: {err}; widen the selection or relax the filters"
        ),
        other => other.to_string(),
    })?;

    let retained =
        outlier::retained_for_boundary(&points, &ranking.distances, selection.hull_retention);
    let edges = hull::hull_edges(&retained);

    let background: Vec<(f64, f64)> = (0..dataset.row_count())
        .map(|row| (first[row], second[row]))
        .collect();
    let extent = dataset
        .error_extent(&session.columns)
        .map_err(|e| e.to_string())?;

    let (title, subtitle) = detail_titles(selection, window, target, &shown);
    Ok(view_model::detail_view(
        extent,
        background,
        &points,
        &ranking,
        &edges,
        session.columns.models.clone(),
        title,
        subtitle,
    ))
}

/// Title and subtitle describing the drilled bin or the active window.
fn detail_titles(
    selection: &SelectionState,
    window: &RangeWindow,
    target: &[f64],
    shown: &[usize],
) -> (String, Option<String>) {
    if selection.selected_bin > 0 {
        let lo = shown
            .iter()
            .map(|&row| target[row])
            .fold(f64::INFINITY, f64::min);
        let hi = shown
            .iter()
            .map(|&row| target[row])
            .fold(f64::NEG_INFINITY, f64::max);
        return (
            format!("Errors for quantile {}", selection.selected_bin),
            Some(format!(
                "Values between {} and {}",
                format_bound(lo),
                format_bound(hi)
            )),
        );
    }
    match window {
        RangeWindow::All => ("Errors for all observations".into(), None),
        RangeWindow::Target { .. } => (
            format!(
                "Errors for target range {} to {}",
                format_bound(selection.range_lo),
                format_bound(selection.range_hi)
            ),
            None,
        ),
        RangeWindow::Positions { .. } => (
            format!(
                "Errors from time steps {} to {}",
                format_bound(selection.range_lo),
                format_bound(selection.range_hi)
            ),
            None,
        ),
    }
}
