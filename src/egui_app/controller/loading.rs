//! File opening, the import wizard, model selection, and recent files.

use std::path::PathBuf;

use rfd::FileDialog;

use crate::analysis::filters::FilterState;
use crate::analysis::range::DisplayMode;
use crate::dataset::{
    self, Dataset, LoadOptions, SelectedColumns, detect_models, load_csv, preview_csv,
};
use crate::egui_app::state::*;
use crate::recent::{self, RecentEntry};

use super::{EguiController, PickPhase, ReplayPhase, Session};

/// Rows shown in the import preview table.
const PREVIEW_ROWS: usize = 5;

impl EguiController {
    /// Open a file picker and start the import wizard for the chosen file.
    pub fn open_file_via_dialog(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("CSV files", &["csv"])
            .pick_file()
        else {
            return;
        };
        self.begin_import(path);
    }

    /// Start the import wizard for `path` with default options.
    pub fn begin_import(&mut self, path: PathBuf) {
        let mut wizard = ImportWizardState {
            path,
            separator_entry: ",".into(),
            has_index: false,
            preview: Default::default(),
            error: None,
            individual_index: 0,
            target_index: 0,
        };
        refresh_preview(&mut wizard);
        self.ui.import = Some(wizard);
    }

    /// Re-read the preview after the separator or index toggle changed.
    pub fn refresh_import_preview(&mut self) {
        if let Some(wizard) = self.ui.import.as_mut() {
            refresh_preview(wizard);
        }
    }

    /// Confirm the wizard: load the full file, detect models, and open the
    /// model picker. Failures leave the wizard open with a message.
    pub fn confirm_import(&mut self) {
        let Some(wizard) = self.ui.import.as_mut() else {
            return;
        };
        let Some(options) = parse_options(&wizard.separator_entry, wizard.has_index) else {
            wizard.error = Some("Separator must be a single character".into());
            return;
        };
        let Some(target) = wizard.chosen_target() else {
            wizard.error = Some("Please select a target column".into());
            return;
        };
        let individual = wizard.chosen_individual();
        let path = wizard.path.clone();

        let dataset = match load_csv(&path, &options) {
            Ok(dataset) => dataset,
            Err(err) => {
                wizard.error = Some(format!("Failed to read file: {err}"));
                return;
            }
        };
        let models = detect_models(&dataset);
        if models.len() < 2 {
            wizard.error = Some(
                "The file does not contain enough models or is in the wrong format".into(),
            );
            return;
        }
        if dataset.numeric(&target).is_err() {
            wizard.error = Some(format!("Target column {target} is not numeric"));
            return;
        }
        // The individual column is optional; silently drop a stale choice.
        let individual = individual.filter(|name| dataset.has_column(name));

        self.ui.import = None;
        self.pending_session = Some(PendingSession {
            path,
            load: options,
            dataset,
            target,
            individual,
        });
        self.ui.model_pick = Some(ModelPickState::new(models));
    }

    /// Confirm the model picker; requires exactly two models checked.
    pub fn confirm_models(&mut self) {
        let Some(pick) = self.ui.model_pick.as_ref() else {
            return;
        };
        let picked = pick.picked_models();
        if picked.len() != 2 {
            self.set_status("Please select exactly two models", StatusTone::Error);
            return;
        }
        let models = [picked[0].clone(), picked[1].clone()];
        self.ui.model_pick = None;

        if let Some(pending) = self.pending_session.take() {
            let columns = SelectedColumns {
                target: pending.target.clone(),
                individual: pending.individual.clone(),
                models,
            };
            self.attach_session(pending.path, pending.load, pending.dataset, columns);
            self.remember_current_session();
        } else if let Some(session) = self.session.take() {
            // Re-pairing models over the already loaded dataset.
            let columns = SelectedColumns {
                models,
                ..session.columns.clone()
            };
            self.attach_session(session.path, session.load, session.dataset, columns);
            self.remember_current_session();
        }
    }

    /// Attach a loaded dataset with validated column selections, resetting
    /// filter and selection state and rebuilding both plots.
    pub fn attach_session(
        &mut self,
        path: PathBuf,
        load: LoadOptions,
        dataset: Dataset,
        columns: SelectedColumns,
    ) {
        if let Err(err) = dataset.validate_selection(&columns) {
            self.set_status(format!("Cannot open file: {err}"), StatusTone::Error);
            return;
        }
        let filtered_rows: Vec<usize> = (0..dataset.row_count()).collect();
        let selection = SelectionState {
            bin_count: self.settings.default_bin_count.clamp(1, 100),
            selected_bin: 0,
            mode: DisplayMode::Target,
            range_lo: f64::NEG_INFINITY,
            range_hi: f64::INFINITY,
            hull_retention: self.settings.default_hull_retention.min(100),
        };
        self.replay = ReplayPhase::Idle;
        self.pick = PickPhase::Ready;
        self.ui.replay_running = false;
        self.session = Some(Session {
            path,
            load,
            dataset,
            columns,
            filters: FilterState::default(),
            filtered_rows,
            selection,
        });
        self.reset_controls_for_session();
        self.reset_filter_panel();
        self.rebuild_all();
        let Some(session) = &self.session else { return };
        self.ui.window_title = format!(
            "ErrLens - {} - {} vs {}",
            session.path.display(),
            session.columns.models[0],
            session.columns.models[1]
        );
        tracing::info!(
            "Opened {} comparing {} vs {}",
            session.path.display(),
            session.columns.models[0],
            session.columns.models[1]
        );
    }

    /// Seed the control surface from the attached session.
    fn reset_controls_for_session(&mut self) {
        let Some(session) = &self.session else { return };
        let controls = &mut self.ui.controls;
        controls.enabled = true;
        controls.bin_count = session.selection.bin_count;
        controls.bin_entry = session.selection.bin_count.to_string();
        controls.hull_retention = session.selection.hull_retention;
        controls.mode = DisplayMode::Target;
        controls.timesteps_available = session.columns.individual.is_some();
        let target = session
            .dataset
            .numeric(&session.columns.target)
            .unwrap_or(&[]);
        let min = target.iter().copied().fold(f64::INFINITY, f64::min);
        let max = target.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        controls.range.reset(min, max);
        controls.range.label = format!("{} range", session.columns.target);
    }

    /// Open a remembered file, restoring its separator and column choices.
    pub fn open_recent(&mut self, index: usize) {
        let Some(entry) = self.recent.get(index).cloned() else {
            self.set_status(
                "That recent entry is no longer available, please reopen the file",
                StatusTone::Warning,
            );
            return;
        };
        let options = LoadOptions {
            separator: entry.separator,
            has_index: entry.has_index,
        };
        let dataset = match load_csv(&entry.file_path, &options) {
            Ok(dataset) => dataset,
            Err(err) => {
                self.set_status(format!("Failed to reopen file: {err}"), StatusTone::Error);
                return;
            }
        };
        let columns = SelectedColumns {
            target: entry.target.clone(),
            individual: entry.individual.clone(),
            models: entry.models.clone(),
        };
        if dataset.validate_selection(&columns).is_err() {
            // The file changed shape since it was remembered; fall back to
            // the import wizard instead of opening a broken session.
            self.set_status(
                "The file no longer matches its remembered columns, please re-select them",
                StatusTone::Warning,
            );
            self.begin_import(entry.file_path.clone());
            return;
        }
        self.attach_session(entry.file_path.clone(), options, dataset, columns);
        self.remember_current_session();
    }

    /// Record the active session at the front of the recent-files store.
    pub(crate) fn remember_current_session(&mut self) {
        let Some(session) = &self.session else { return };
        let entry = RecentEntry {
            file_path: session.path.clone(),
            separator: session.load.separator,
            has_index: session.load.has_index,
            models: session.columns.models.clone(),
            individual: session.columns.individual.clone(),
            target: session.columns.target.clone(),
            opened_at: recent::timestamp_now(),
        };
        recent::record(&mut self.recent, entry);
        self.refresh_recent_labels();
        if let Err(err) = recent::save(&self.recent) {
            tracing::warn!("Failed to save recent files: {err}");
            self.set_status(format!("Failed to save recent files: {err}"), StatusTone::Warning);
        }
    }

    /// Offer the target-variable picker for the loaded dataset.
    pub fn open_target_pick(&mut self) {
        let Some(session) = &self.session else { return };
        let columns: Vec<String> = session
            .dataset
            .columns()
            .iter()
            .filter(|column| column.data.as_numeric().is_some())
            .map(|column| column.name.clone())
            .collect();
        let chosen = columns
            .iter()
            .position(|name| *name == session.columns.target)
            .unwrap_or(0);
        self.ui.target_pick = Some(TargetPickState { columns, chosen });
    }

    /// Apply the target picker choice, rebuilding the session wholesale.
    pub fn confirm_target_pick(&mut self) {
        let Some(pick) = self.ui.target_pick.take() else {
            return;
        };
        let Some(target) = pick.columns.get(pick.chosen).cloned() else {
            return;
        };
        if let Some(session) = self.session.take() {
            let columns = SelectedColumns {
                target,
                ..session.columns.clone()
            };
            self.attach_session(session.path, session.load, session.dataset, columns);
            self.remember_current_session();
        }
    }

    /// Re-open the model picker for the loaded dataset.
    pub fn open_model_pick(&mut self) {
        let Some(session) = &self.session else { return };
        let models = detect_models(&session.dataset);
        if models.len() < 2 {
            self.set_status(
                "The file does not contain enough models or is in the wrong format",
                StatusTone::Error,
            );
            return;
        }
        self.ui.model_pick = Some(ModelPickState::new(models));
    }
}

/// Dataset loaded by the wizard, waiting for the model pair.
#[derive(Clone, Debug)]
pub(crate) struct PendingSession {
    pub path: PathBuf,
    pub load: LoadOptions,
    pub dataset: Dataset,
    pub target: String,
    pub individual: Option<String>,
}

fn parse_options(separator_entry: &str, has_index: bool) -> Option<LoadOptions> {
    let mut chars = separator_entry.chars();
    let separator = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(LoadOptions {
        separator,
        has_index,
    })
}

fn refresh_preview(wizard: &mut ImportWizardState) {
    let Some(options) = parse_options(&wizard.separator_entry, wizard.has_index) else {
        wizard.error = Some("Separator must be a single character".into());
        return;
    };
    match preview_csv(&wizard.path, &options, PREVIEW_ROWS) {
        Ok(preview) => {
            wizard.error = None;
            // Clamp stale column choices when the header set changes.
            if wizard.target_index >= preview.headers.len() {
                wizard.target_index = 0;
            }
            if wizard.individual_index > preview.headers.len() {
                wizard.individual_index = 0;
            }
            wizard.preview = preview;
        }
        Err(err @ dataset::DatasetError::BadSeparator) => {
            wizard.error = Some(err.to_string());
        }
        Err(err) => {
            wizard.error = Some(format!("Failed to read file: {err}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use super::*;

    #[test]
    fn attach_session_enables_controls_and_builds_views() {
        let controller = test_support::controller_with(
            test_support::dataset_linear(50),
            test_support::selected_columns(),
        );
        assert!(controller.ui.controls.enabled);
        assert!(controller.ui.summary.is_some());
        assert!(controller.ui.detail.is_some());
        assert_eq!(controller.ui.controls.range.min, 1.0);
        assert_eq!(controller.ui.controls.range.max, 50.0);
        assert!(controller.ui.window_title.contains("ridge vs forest"));
    }

    #[test]
    fn attach_session_rejects_missing_error_columns() {
        let mut controller = EguiController::new();
        let dataset = test_support::dataset_linear(10);
        let columns = SelectedColumns {
            target: "load".into(),
            individual: None,
            models: ["ridge".into(), "missing".into()],
        };
        controller.attach_session(PathBuf::from("x.csv"), LoadOptions::default(), dataset, columns);
        assert!(controller.session_ref().is_none());
        assert_eq!(controller.ui.status.badge_label, "Error");
    }

    #[test]
    fn separator_entry_must_be_single_character() {
        assert!(parse_options("", false).is_none());
        assert!(parse_options(";;", false).is_none());
        assert_eq!(parse_options("\t", true).unwrap().separator, '\t');
    }
}
