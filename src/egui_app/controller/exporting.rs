//! Saving the currently displayed charts as a light-background image.

use std::path::PathBuf;

use rfd::FileDialog;

use crate::egui_app::state::StatusTone;
use crate::export;

use super::EguiController;

impl EguiController {
    /// Ask for a destination and export the current charts as a PNG.
    pub fn save_plot_via_dialog(&mut self) {
        if self.ui.summary.is_none() && self.ui.detail.is_none() {
            self.set_status("Nothing to export yet", StatusTone::Warning);
            return;
        }
        let suggested = self
            .session
            .as_ref()
            .and_then(|session| session.path.file_stem())
            .and_then(|stem| stem.to_str())
            .map(|stem| format!("{stem}_errors.png"))
            .unwrap_or_else(|| "errors.png".into());
        let Some(path) = FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name(suggested)
            .save_file()
        else {
            return;
        };
        self.save_plot_to(path);
    }

    /// Export the current charts to `path`.
    pub fn save_plot_to(&mut self, path: PathBuf) {
        let result = export::save_plots_png(
            &path,
            self.ui.summary.as_ref(),
            self.ui.detail.as_ref(),
        );
        match result {
            Ok(()) => {
                tracing::info!("Saved plot image to {}", path.display());
                self.set_status(format!("Saved plot to {}", path.display()), StatusTone::Info);
            }
            Err(err) => {
                tracing::warn!("Plot export failed: {err}");
                self.set_status(format!("Failed to save plot: {err}"), StatusTone::Error);
            }
        }
    }
}
