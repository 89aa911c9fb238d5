//! Control strips above the two plot panels.

use std::time::Instant;

use eframe::egui::{self, RichText, Slider, Ui};

use crate::analysis::range::DisplayMode;

use super::EguiApp;
use super::range_slider;
use super::style;

impl EguiApp {
    /// Bin-count controls and the replay button, above the summary plot.
    pub(super) fn render_summary_controls(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        let enabled = self.controller.ui.controls.enabled;
        let locked = self.controller.controls_locked();

        ui.horizontal(|ui| {
            ui.label(RichText::new("Number of quantiles").color(palette.text_primary));

            let mut entry = self.controller.ui.controls.bin_entry.clone();
            let entry_response = ui.add_enabled(
                enabled && !locked,
                egui::TextEdit::singleline(&mut entry).desired_width(42.0),
            );
            self.controller.ui.controls.bin_entry = entry;
            if entry_response.lost_focus() {
                self.controller.commit_bin_entry();
            }

            let mut bin_count = self.controller.ui.controls.bin_count;
            let slider = ui.add_enabled(
                enabled && !locked,
                Slider::new(&mut bin_count, 1..=100).show_value(false),
            );
            if slider.changed() {
                // Track the drag visually; recompute once the drag ends.
                self.controller.ui.controls.bin_count = bin_count;
                self.controller.ui.controls.bin_entry = bin_count.to_string();
            }
            if slider.drag_stopped() || (slider.changed() && !slider.dragged()) {
                self.controller.set_bin_count(bin_count);
            }

            let replaying = self.controller.replay_running();
            let label = if replaying { "Stop scrolling" } else { "Auto-scroll" };
            let button = egui::Button::new(
                RichText::new(label).color(if replaying {
                    palette.highlight
                } else {
                    palette.text_primary
                }),
            );
            if ui.add_enabled(enabled, button).clicked() {
                if replaying {
                    self.controller.cancel_replay();
                } else {
                    self.controller.start_replay(Instant::now());
                }
            }
        });
    }

    /// Display mode, hull retention, and the range window controls, above
    /// the detail plot.
    pub(super) fn render_detail_controls(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        let enabled = self.controller.ui.controls.enabled;
        let locked = self.controller.controls_locked();

        ui.horizontal(|ui| {
            ui.label(RichText::new("Display mode").color(palette.text_primary));
            let mode = self.controller.display_mode();
            let mut chosen = mode;
            ui.add_enabled_ui(enabled && !locked, |ui| {
                ui.radio_value(&mut chosen, DisplayMode::Target, "Target");
                ui.add_enabled_ui(self.controller.ui.controls.timesteps_available, |ui| {
                    ui.radio_value(&mut chosen, DisplayMode::Timesteps, "Time steps");
                });
            });
            if chosen != mode {
                self.controller.set_display_mode(chosen);
            }

            ui.separator();
            ui.label(RichText::new("Convex hull %").color(palette.text_primary));
            let mut retention = u32::from(self.controller.ui.controls.hull_retention);
            let drag = ui.add_enabled(
                enabled,
                egui::DragValue::new(&mut retention).range(0..=100),
            );
            if drag.changed() {
                self.controller.set_hull_retention(retention.min(100) as u8);
            }
        });

        ui.horizontal(|ui| {
            let label = self.controller.ui.controls.range.label.clone();
            ui.label(RichText::new(label).color(palette.text_primary));

            let mut lo_entry = self.controller.ui.controls.range.lo_entry.clone();
            let lo_response = ui.add_enabled(
                enabled && !locked,
                egui::TextEdit::singleline(&mut lo_entry).desired_width(56.0),
            );
            self.controller.ui.controls.range.lo_entry = lo_entry;

            let range = self.controller.ui.controls.range.clone();
            let slider = range_slider::range_slider(
                ui,
                enabled && !locked,
                range.min,
                range.max,
                range.lo,
                range.hi,
            );

            let mut hi_entry = self.controller.ui.controls.range.hi_entry.clone();
            let hi_response = ui.add_enabled(
                enabled && !locked,
                egui::TextEdit::singleline(&mut hi_entry).desired_width(56.0),
            );
            self.controller.ui.controls.range.hi_entry = hi_entry;

            if lo_response.lost_focus() || hi_response.lost_focus() {
                self.controller.commit_range_entries();
            }
            if let Some((lo, hi)) = slider.changed {
                self.controller.set_range(lo, hi);
            }
        });
    }
}
