//! Selection updates: bin count, display mode, range bounds, hull
//! retention, and bin drill-down.

use crate::analysis::range::DisplayMode;
use crate::egui_app::state::{StatusTone, format_bound};

use super::{EguiController, PickPhase};

impl EguiController {
    /// Change the number of quantile bins, clamped to [1, 100].
    pub fn set_bin_count(&mut self, bin_count: u32) {
        if self.controls_locked() {
            tracing::warn!("Ignoring bin count change while replay is running");
            return;
        }
        let bin_count = bin_count.clamp(1, 100);
        let Some(session) = self.session.as_mut() else { return };
        if session.selection.bin_count == bin_count {
            return;
        }
        session.selection.bin_count = bin_count;
        // A different partition invalidates the drilled-in bin.
        session.selection.selected_bin = 0;
        self.ui.controls.bin_count = bin_count;
        self.ui.controls.bin_entry = bin_count.to_string();
        self.rebuild_plots();
    }

    /// Commit the bin-count text entry, restoring it on a parse failure.
    pub fn commit_bin_entry(&mut self) {
        let entry = self.ui.controls.bin_entry.trim().to_string();
        match entry.parse::<u32>() {
            Ok(value) => self.set_bin_count(value),
            Err(_) => {
                let current = self.ui.controls.bin_count;
                self.ui.controls.bin_entry = current.to_string();
            }
        }
    }

    /// Change the hull retention percentage.
    pub fn set_hull_retention(&mut self, percentage: u8) {
        let Some(session) = self.session.as_mut() else { return };
        let percentage = percentage.min(100);
        if session.selection.hull_retention == percentage {
            return;
        }
        session.selection.hull_retention = percentage;
        self.ui.controls.hull_retention = percentage;
        self.rebuild_plots();
    }

    /// Toggle between target-value and time-step windowing. Resets the
    /// range controls to the new mode's full span.
    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        if self.controls_locked() {
            tracing::warn!("Ignoring display mode change while replay is running");
            return;
        }
        let Some(session) = self.session.as_mut() else { return };
        if session.selection.mode == mode {
            return;
        }
        if mode == DisplayMode::Timesteps && session.columns.individual.is_none() {
            self.set_status(
                "Time-step mode needs an individual column",
                StatusTone::Warning,
            );
            return;
        }
        session.selection.mode = mode;
        session.selection.selected_bin = 0;

        let (min, max, label) = match mode {
            DisplayMode::Target => {
                let target = session
                    .dataset
                    .numeric(&session.columns.target)
                    .unwrap_or(&[]);
                let min = target.iter().copied().fold(f64::INFINITY, f64::min);
                let max = target.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                (min, max, format!("{} range", session.columns.target))
            }
            DisplayMode::Timesteps => {
                let max = session
                    .dataset
                    .max_timesteps(session.columns.individual.as_deref())
                    .unwrap_or(0);
                (0.0, max as f64, "Number of time steps".into())
            }
        };
        session.selection.range_lo = min;
        session.selection.range_hi = max;
        self.ui.controls.mode = mode;
        self.ui.controls.range.reset(min, max);
        self.ui.controls.range.label = label;
        self.rebuild_plots();
    }

    /// Move the range window. Bounds are clamped to the control span and
    /// kept ordered.
    pub fn set_range(&mut self, lo: f64, hi: f64) {
        if self.controls_locked() {
            tracing::warn!("Ignoring range change while replay is running");
            return;
        }
        let Some(session) = self.session.as_mut() else { return };
        let span = &self.ui.controls.range;
        let lo = lo.clamp(span.min, span.max);
        let hi = hi.clamp(span.min, span.max);
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        if session.selection.range_lo == lo && session.selection.range_hi == hi {
            return;
        }
        session.selection.range_lo = lo;
        session.selection.range_hi = hi;
        session.selection.selected_bin = 0;
        let range = &mut self.ui.controls.range;
        range.lo = lo;
        range.hi = hi;
        range.lo_entry = format_bound(lo);
        range.hi_entry = format_bound(hi);
        self.rebuild_plots();
    }

    /// Commit the two range text entries, restoring them on parse failure
    /// or when they cross.
    pub fn commit_range_entries(&mut self) {
        let range = &self.ui.controls.range;
        let parsed = (
            range.lo_entry.trim().parse::<f64>(),
            range.hi_entry.trim().parse::<f64>(),
        );
        match parsed {
            (Ok(lo), Ok(hi)) if lo <= hi => self.set_range(lo, hi),
            _ => {
                let range = &mut self.ui.controls.range;
                range.lo_entry = format_bound(range.lo);
                range.hi_entry = format_bound(range.hi);
            }
        }
    }

    /// Drill into a bin picked on the summary plot. Picks are guarded: one
    /// arriving while a previous pick is still rebuilding is dropped.
    pub fn pick_bin(&mut self, bin: u32) {
        if self.controls_locked() {
            tracing::warn!("Ignoring bin pick while replay is running");
            return;
        }
        if self.pick == PickPhase::Rebuilding {
            tracing::debug!("Dropping bin pick; a previous pick is still rebuilding");
            return;
        }
        self.pick = PickPhase::Rebuilding;
        self.select_bin_effect(bin);
        self.pick = PickPhase::Ready;
    }

    /// Clear the drill-down, returning the detail view to the whole window.
    pub fn clear_bin_selection(&mut self) {
        let Some(session) = self.session.as_mut() else { return };
        if session.selection.selected_bin == 0 {
            return;
        }
        session.selection.selected_bin = 0;
        self.rebuild_plots();
    }

    /// The selection effect shared by manual picks and replay steps.
    /// The previous highlight is cleared before the new one is applied so a
    /// rebuild can never show two highlighted bins.
    pub(crate) fn select_bin_effect(&mut self, bin: u32) {
        let Some(session) = self.session.as_mut() else { return };
        let k = session.selection.bin_count;
        if bin < 1 || bin > k {
            return;
        }
        if session.selection.selected_bin != 0 {
            session.selection.selected_bin = 0;
            if let Some(summary) = self.ui.summary.as_mut() {
                summary.selected_bin = 0;
            }
        }
        let Some(session) = self.session.as_mut() else { return };
        session.selection.selected_bin = bin;
        self.rebuild_plots();
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use super::*;

    #[test]
    fn picking_a_bin_restricts_the_detail_view() {
        let mut controller = test_support::controller_with(
            test_support::dataset_linear(100),
            test_support::selected_columns(),
        );
        let full = controller.ui.detail.as_ref().unwrap().points.len();
        assert_eq!(full, 100);

        controller.pick_bin(1);
        let detail = controller.ui.detail.as_ref().unwrap();
        assert_eq!(detail.points.len(), 10);
        assert_eq!(detail.title, "Errors for quantile 1");
        assert_eq!(
            detail.subtitle.as_deref(),
            Some("Values between 1 and 10")
        );
        let summary = controller.ui.summary.as_ref().unwrap();
        assert_eq!(summary.selected_bin, 1);
    }

    #[test]
    fn repicking_switches_the_highlight() {
        let mut controller = test_support::controller_with(
            test_support::dataset_linear(100),
            test_support::selected_columns(),
        );
        controller.pick_bin(2);
        controller.pick_bin(5);
        assert_eq!(controller.ui.summary.as_ref().unwrap().selected_bin, 5);
    }

    #[test]
    fn out_of_range_picks_are_ignored() {
        let mut controller = test_support::controller_with(
            test_support::dataset_linear(100),
            test_support::selected_columns(),
        );
        controller.pick_bin(0);
        controller.pick_bin(11);
        assert_eq!(controller.ui.summary.as_ref().unwrap().selected_bin, 0);
    }

    #[test]
    fn changing_bin_count_clears_the_drill_down() {
        let mut controller = test_support::controller_with(
            test_support::dataset_linear(100),
            test_support::selected_columns(),
        );
        controller.pick_bin(3);
        controller.set_bin_count(4);
        assert_eq!(controller.ui.summary.as_ref().unwrap().selected_bin, 0);
        assert_eq!(controller.ui.summary.as_ref().unwrap().groups.len(), 4);
    }

    #[test]
    fn bin_entry_commits_parse_and_restore() {
        let mut controller = test_support::controller_with(
            test_support::dataset_linear(100),
            test_support::selected_columns(),
        );
        controller.ui.controls.bin_entry = "17".into();
        controller.commit_bin_entry();
        assert_eq!(controller.ui.controls.bin_count, 17);

        controller.ui.controls.bin_entry = "not a number".into();
        controller.commit_bin_entry();
        assert_eq!(controller.ui.controls.bin_entry, "17");
    }

    #[test]
    fn range_narrows_the_detail_subset() {
        let mut controller = test_support::controller_with(
            test_support::dataset_linear(100),
            test_support::selected_columns(),
        );
        controller.set_range(11.0, 30.0);
        let detail = controller.ui.detail.as_ref().unwrap();
        assert_eq!(detail.points.len(), 20);
        assert!(detail.title.contains("target range 11 to 30"));
    }

    #[test]
    fn crossed_range_entries_are_restored() {
        let mut controller = test_support::controller_with(
            test_support::dataset_linear(100),
            test_support::selected_columns(),
        );
        controller.set_range(10.0, 20.0);
        controller.ui.controls.range.lo_entry = "50".into();
        controller.ui.controls.range.hi_entry = "40".into();
        controller.commit_range_entries();
        assert_eq!(controller.ui.controls.range.lo_entry, "10");
        assert_eq!(controller.ui.controls.range.hi_entry, "20");
    }

    #[test]
    fn timesteps_mode_requires_individual_column() {
        let mut controller = test_support::controller_with(
            test_support::dataset_linear(100),
            test_support::selected_columns(),
        );
        controller.set_display_mode(DisplayMode::Timesteps);
        assert_eq!(controller.display_mode(), DisplayMode::Target);
        assert_eq!(controller.ui.status.badge_label, "Warning");
    }
}
