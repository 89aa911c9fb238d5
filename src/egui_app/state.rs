//! Shared state types for the egui UI.

use std::path::PathBuf;

use egui::Color32;

use crate::analysis::filters::FilterSummaryRow;
use crate::analysis::range::DisplayMode;
use crate::dataset::CsvPreview;
use crate::egui_app::ui::style;
use crate::egui_app::view_model::{DetailPlotView, SummaryPlotView};

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    pub status: StatusBarState,
    pub controls: ControlsState,
    pub filters: FilterPanelState,
    /// Import wizard window, present while a new file is being configured.
    pub import: Option<ImportWizardState>,
    /// Model-pair picker window.
    pub model_pick: Option<ModelPickState>,
    /// Target-variable picker window.
    pub target_pick: Option<TargetPickState>,
    pub summary: Option<SummaryPlotView>,
    pub detail: Option<DetailPlotView>,
    /// Diagnostic shown in place of the detail plot when its render was
    /// skipped (degenerate covariance, empty bin).
    pub detail_notice: Option<String>,
    /// Menu labels for the recent-files list, most recent first.
    pub recent_labels: Vec<String>,
    pub window_title: String,
    /// Mirrored replay flag the renderer uses to disable manual controls.
    pub replay_running: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
            controls: ControlsState::default(),
            filters: FilterPanelState::default(),
            import: None,
            model_pick: None,
            target_pick: None,
            summary: None,
            detail: None,
            detail_notice: None,
            recent_labels: Vec::new(),
            window_title: "ErrLens".into(),
            replay_running: false,
        }
    }
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub badge_label: String,
    pub badge_color: Color32,
}

impl StatusBarState {
    pub fn idle() -> Self {
        Self {
            text: "Open a file to start comparing model errors".into(),
            badge_label: "Idle".into(),
            badge_color: style::status_badge_color(StatusTone::Idle),
        }
    }
}

/// Tone of a status message, mapped to a badge color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Info,
    Warning,
    Error,
}

/// Explicit selection state driving what gets rendered. Core operations
/// receive it and updates flow back through controller methods only.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionState {
    /// Number of quantile bins, 1..=100.
    pub bin_count: u32,
    /// Drilled-in bin id; 0 means no drill-down.
    pub selected_bin: u32,
    pub mode: DisplayMode,
    /// Range bounds; interpretation depends on `mode`.
    pub range_lo: f64,
    pub range_hi: f64,
    /// Convex hull retention percentage, 0..=100.
    pub hull_retention: u8,
}

/// Main control surface: bin count, display mode, hull retention, range.
#[derive(Clone, Debug, Default)]
pub struct ControlsState {
    /// False until a file and model pair are confirmed.
    pub enabled: bool,
    pub bin_count: u32,
    /// Text entry kept in sync with the bin slider.
    pub bin_entry: String,
    pub hull_retention: u8,
    pub mode: DisplayMode,
    /// Whether the `timesteps` mode is offered (needs an individual column).
    pub timesteps_available: bool,
    pub range: RangeControlState,
}

/// Dual-handle range control plus its synced entries.
#[derive(Clone, Debug, Default)]
pub struct RangeControlState {
    pub lo: f64,
    pub hi: f64,
    pub min: f64,
    pub max: f64,
    pub lo_entry: String,
    pub hi_entry: String,
    /// Axis label, e.g. "load range" or "Number of time steps".
    pub label: String,
}

impl RangeControlState {
    /// Reset the window to the full span.
    pub fn reset(&mut self, min: f64, max: f64) {
        self.min = min;
        self.max = max;
        self.lo = min;
        self.hi = max;
        self.lo_entry = format_bound(min);
        self.hi_entry = format_bound(max);
    }
}

/// Compact bound formatting for the range entries.
pub fn format_bound(value: f64) -> String {
    if (value.fract()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{value:.3}")
    }
}

/// Editor shown for the column picked in the filter window.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterEditor {
    Numeric(NumericFilterEditor),
    Categorical(CategoricalFilterEditor),
    DateTime(DateTimeFilterEditor),
}

/// Editor state for a numeric column filter.
#[derive(Clone, Debug, PartialEq)]
pub struct NumericFilterEditor {
    pub column: String,
    pub min_limit: f64,
    pub max_limit: f64,
    pub lo: f64,
    pub hi: f64,
    pub lo_entry: String,
    pub hi_entry: String,
}

/// Editor state for a categorical column filter.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoricalFilterEditor {
    pub column: String,
    /// Category label and whether it is currently included.
    pub choices: Vec<(String, bool)>,
}

/// Editor state for a datetime column filter.
#[derive(Clone, Debug, PartialEq)]
pub struct DateTimeFilterEditor {
    pub column: String,
    pub min_limit: String,
    pub max_limit: String,
    pub start_entry: String,
    pub end_entry: String,
    pub parse_error: Option<String>,
}

/// The per-column filter window.
#[derive(Clone, Debug, Default)]
pub struct FilterPanelState {
    pub open: bool,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub datetime_columns: Vec<String>,
    pub editor: Option<FilterEditor>,
    /// Live summary of active filters with per-row removal.
    pub summary: Vec<FilterSummaryRow>,
}

/// Import wizard: separator, index toggle, preview, column designation.
#[derive(Clone, Debug)]
pub struct ImportWizardState {
    pub path: PathBuf,
    pub separator_entry: String,
    pub has_index: bool,
    pub preview: CsvPreview,
    pub error: Option<String>,
    /// Index into `individual_choices`; 0 is "None".
    pub individual_index: usize,
    /// Index into `preview.headers`.
    pub target_index: usize,
}

impl ImportWizardState {
    pub fn individual_choices(&self) -> Vec<String> {
        let mut choices = vec!["None".to_string()];
        choices.extend(self.preview.headers.iter().cloned());
        choices
    }

    pub fn chosen_individual(&self) -> Option<String> {
        if self.individual_index == 0 {
            None
        } else {
            self.preview
                .headers
                .get(self.individual_index - 1)
                .cloned()
        }
    }

    pub fn chosen_target(&self) -> Option<String> {
        self.preview.headers.get(self.target_index).cloned()
    }
}

/// Model-pair picker: exactly two must be checked to confirm.
#[derive(Clone, Debug)]
pub struct ModelPickState {
    pub available: Vec<String>,
    pub picked: Vec<bool>,
}

impl ModelPickState {
    pub fn new(available: Vec<String>) -> Self {
        let picked = vec![false; available.len()];
        Self { available, picked }
    }

    pub fn picked_count(&self) -> usize {
        self.picked.iter().filter(|&&p| p).count()
    }

    pub fn picked_models(&self) -> Vec<String> {
        self.available
            .iter()
            .zip(&self.picked)
            .filter(|&(_, &picked)| picked)
            .map(|(model, _)| model.clone())
            .collect()
    }
}

/// Target-variable picker used after a dataset is already loaded.
#[derive(Clone, Debug)]
pub struct TargetPickState {
    pub columns: Vec<String>,
    pub chosen: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_pick_counts_checked_entries() {
        let mut pick = ModelPickState::new(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(pick.picked_count(), 0);
        pick.picked[0] = true;
        pick.picked[2] = true;
        assert_eq!(pick.picked_count(), 2);
        assert_eq!(pick.picked_models(), vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn import_wizard_resolves_choices() {
        let state = ImportWizardState {
            path: PathBuf::from("data.csv"),
            separator_entry: ",".into(),
            has_index: false,
            preview: CsvPreview {
                headers: vec!["load".into(), "site".into()],
                rows: Vec::new(),
            },
            error: None,
            individual_index: 2,
            target_index: 0,
        };
        assert_eq!(state.chosen_individual(), Some("site".into()));
        assert_eq!(state.chosen_target(), Some("load".into()));
    }

    #[test]
    fn bound_formatting_drops_trailing_zeroes_for_integers() {
        assert_eq!(format_bound(10.0), "10");
        assert_eq!(format_bound(1.25), "1.250");
    }
}
