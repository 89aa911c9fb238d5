//! Maintains app state and bridges the analysis core to the egui UI.
//!
//! All mutation of the selection, filter, and dataset state happens through
//! the methods on [`EguiController`]; each UI event runs one full
//! recompute-and-render cycle to completion before the next is processed.

mod exporting;
mod filtering;
mod loading;
mod recompute;
mod replay;
mod selection;

use std::path::PathBuf;

use crate::analysis::filters::FilterState;
use crate::analysis::range::DisplayMode;
use crate::dataset::{Dataset, LoadOptions, SelectedColumns};
use crate::egui_app::state::*;
use crate::egui_app::ui::style;
use crate::recent::{self, RecentEntry};
use crate::settings::{self, Settings};

pub(crate) use loading::PendingSession;
pub(crate) use replay::ReplayPhase;

/// Everything tied to the currently open file.
#[derive(Clone, Debug)]
pub(crate) struct Session {
    pub path: PathBuf,
    pub load: LoadOptions,
    pub dataset: Dataset,
    pub columns: SelectedColumns,
    pub filters: FilterState,
    /// Rows surviving the active filters, in load order.
    pub filtered_rows: Vec<usize>,
    pub selection: SelectionState,
}

/// Guard for bin-pick events: picks arriving while a previous pick's
/// recompute cycle is still rebuilding are dropped, never queued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum PickPhase {
    #[default]
    Ready,
    Rebuilding,
}

/// Maintains app state and bridges core logic to the egui UI.
pub struct EguiController {
    pub ui: UiState,
    pub(crate) session: Option<Session>,
    /// Dataset loaded by the import wizard, awaiting the model pair.
    pub(crate) pending_session: Option<PendingSession>,
    pub(crate) recent: Vec<RecentEntry>,
    pub(crate) settings: Settings,
    pub(crate) replay: ReplayPhase,
    pub(crate) pick: PickPhase,
}

impl Default for EguiController {
    fn default() -> Self {
        Self::new()
    }
}

impl EguiController {
    pub fn new() -> Self {
        Self {
            ui: UiState::default(),
            session: None,
            pending_session: None,
            recent: Vec::new(),
            settings: Settings::default(),
            replay: ReplayPhase::Idle,
            pick: PickPhase::Ready,
        }
    }

    /// Load persisted settings and the recent-files store, degrading to
    /// defaults with a status message when either fails.
    pub fn load_persisted(&mut self) {
        match settings::load_or_default() {
            Ok(settings) => self.settings = settings,
            Err(err) => {
                tracing::warn!("Falling back to default settings: {err}");
                self.set_status(format!("Using default settings: {err}"), StatusTone::Warning);
            }
        }
        match recent::load() {
            Ok(entries) => {
                self.recent = entries;
                self.refresh_recent_labels();
            }
            Err(err) => {
                tracing::warn!("Recent files unavailable: {err}");
                self.set_status(format!("Recent files unavailable: {err}"), StatusTone::Warning);
            }
        }
    }

    /// Whether manual range/bin/filter controls are locked by replay.
    pub fn controls_locked(&self) -> bool {
        self.replay.is_running()
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status.text = text.into();
        self.ui.status.badge_label = match tone {
            StatusTone::Idle => "Idle",
            StatusTone::Info => "Info",
            StatusTone::Warning => "Warning",
            StatusTone::Error => "Error",
        }
        .into();
        self.ui.status.badge_color = style::status_badge_color(tone);
    }

    pub(crate) fn refresh_recent_labels(&mut self) {
        self.ui.recent_labels = self.recent.iter().map(RecentEntry::menu_label).collect();
    }

    /// Display mode of the active session, defaulting to target.
    pub fn display_mode(&self) -> DisplayMode {
        self.session
            .as_ref()
            .map(|session| session.selection.mode)
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn session_ref(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}
