//! Import wizard, model-pair picker, and target picker windows.

use eframe::egui::{self, Context, Grid, RichText};

use super::EguiApp;
use super::style;

impl EguiApp {
    pub(super) fn render_import_window(&mut self, ctx: &Context) {
        let Some(wizard) = self.controller.ui.import.clone() else {
            return;
        };
        let palette = style::palette();
        let mut open = true;
        let mut confirm = false;
        let mut options_changed = false;
        egui::Window::new(format!("Preview of {}", wizard.path.display()))
            .open(&mut open)
            .default_width(760.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Separator").color(palette.text_primary));
                    let mut separator = wizard.separator_entry.clone();
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut separator).desired_width(28.0),
                    );
                    if response.changed() {
                        options_changed = true;
                    }
                    let mut has_index = wizard.has_index;
                    if ui
                        .checkbox(&mut has_index, "Contains an index column")
                        .changed()
                    {
                        options_changed = true;
                    }
                    if let Some(live) = self.controller.ui.import.as_mut() {
                        live.separator_entry = separator;
                        live.has_index = has_index;
                    }
                });

                ui.horizontal(|ui| {
                    ui.label(RichText::new("Individual").color(palette.text_primary));
                    let choices = wizard.individual_choices();
                    let mut individual_index = wizard.individual_index;
                    egui::ComboBox::from_id_salt("import_individual")
                        .selected_text(choices[individual_index.min(choices.len() - 1)].clone())
                        .show_ui(ui, |ui| {
                            for (index, choice) in choices.iter().enumerate() {
                                ui.selectable_value(&mut individual_index, index, choice);
                            }
                        });

                    ui.label(RichText::new("Target").color(palette.text_primary));
                    let mut target_index = wizard.target_index;
                    let target_text = wizard
                        .preview
                        .headers
                        .get(target_index)
                        .cloned()
                        .unwrap_or_default();
                    egui::ComboBox::from_id_salt("import_target")
                        .selected_text(target_text)
                        .show_ui(ui, |ui| {
                            for (index, header) in wizard.preview.headers.iter().enumerate() {
                                ui.selectable_value(&mut target_index, index, header);
                            }
                        });
                    if let Some(live) = self.controller.ui.import.as_mut() {
                        live.individual_index = individual_index;
                        live.target_index = target_index;
                    }
                });

                if let Some(error) = &wizard.error {
                    ui.colored_label(palette.warning, error);
                }

                egui::ScrollArea::horizontal()
                    .id_salt("import_preview")
                    .show(ui, |ui| {
                        Grid::new("import_preview_grid").striped(true).show(ui, |ui| {
                            for header in &wizard.preview.headers {
                                ui.label(
                                    RichText::new(header).color(palette.text_primary).strong(),
                                );
                            }
                            ui.end_row();
                            for row in &wizard.preview.rows {
                                for cell in row {
                                    ui.label(RichText::new(cell).color(palette.text_muted));
                                }
                                ui.end_row();
                            }
                        });
                    });

                if ui.button("Confirm").clicked() {
                    confirm = true;
                }
            });
        if options_changed {
            self.controller.refresh_import_preview();
        }
        if confirm {
            self.controller.confirm_import();
        } else if !open {
            self.controller.ui.import = None;
        }
    }

    pub(super) fn render_model_pick_window(&mut self, ctx: &Context) {
        let Some(pick) = self.controller.ui.model_pick.clone() else {
            return;
        };
        let mut open = true;
        let mut confirm = false;
        egui::Window::new("Select the models to compare")
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label("Select two models to compare:");
                let count = pick.picked_count();
                for (index, model) in pick.available.iter().enumerate() {
                    let mut checked = pick.picked[index];
                    // Cap the selection at two by freezing the rest.
                    let selectable = checked || count < 2;
                    ui.add_enabled_ui(selectable, |ui| {
                        if ui.checkbox(&mut checked, model).changed() {
                            if let Some(live) = self.controller.ui.model_pick.as_mut() {
                                live.picked[index] = checked;
                            }
                        }
                    });
                }
                let ready = self
                    .controller
                    .ui
                    .model_pick
                    .as_ref()
                    .is_some_and(|p| p.picked_count() == 2);
                if ui.add_enabled(ready, egui::Button::new("OK")).clicked() {
                    confirm = true;
                }
            });
        if confirm {
            self.controller.confirm_models();
        } else if !open {
            self.controller.ui.model_pick = None;
        }
    }

    pub(super) fn render_target_pick_window(&mut self, ctx: &Context) {
        let Some(pick) = self.controller.ui.target_pick.clone() else {
            return;
        };
        let mut open = true;
        let mut confirm = false;
        egui::Window::new("Change target variable")
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label("Select a new target variable:");
                let mut chosen = pick.chosen;
                let current = pick.columns.get(chosen).cloned().unwrap_or_default();
                egui::ComboBox::from_id_salt("target_pick")
                    .selected_text(current)
                    .show_ui(ui, |ui| {
                        for (index, column) in pick.columns.iter().enumerate() {
                            ui.selectable_value(&mut chosen, index, column);
                        }
                    });
                if let Some(live) = self.controller.ui.target_pick.as_mut() {
                    live.chosen = chosen;
                }
                if ui.button("Confirm").clicked() {
                    confirm = true;
                }
            });
        if confirm {
            self.controller.confirm_target_pick();
        } else if !open {
            self.controller.ui.target_pick = None;
        }
    }
}
