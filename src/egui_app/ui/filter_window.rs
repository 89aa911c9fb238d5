//! The per-column filter window: kind-sorted column lists, one editor, and
//! the live summary list with per-filter removal.

use eframe::egui::{self, Context, RichText, Ui};

use crate::analysis::filters::FilterKind;
use crate::egui_app::state::{FilterEditor, format_bound};

use super::EguiApp;
use super::range_slider;
use super::style;

impl EguiApp {
    pub(super) fn render_filter_window(&mut self, ctx: &Context) {
        if !self.controller.ui.filters.open {
            return;
        }
        let mut open = true;
        let unlocked = !self.controller.controls_locked();
        egui::Window::new("Select the variables to filter")
            .open(&mut open)
            .default_width(640.0)
            .show(ctx, |ui| {
                // Filter edits are locked out while replay runs.
                ui.add_enabled_ui(unlocked, |ui| {
                    ui.columns(3, |columns| {
                        self.render_column_lists(&mut columns[0]);
                        self.render_editor(&mut columns[1]);
                        self.render_summary_list(&mut columns[2]);
                    });
                });
            });
        if !open {
            self.controller.close_filter_panel();
        }
    }

    fn render_column_lists(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        let panel = self.controller.ui.filters.clone();
        let selected_column = match &panel.editor {
            Some(FilterEditor::Numeric(editor)) => Some(editor.column.clone()),
            Some(FilterEditor::Categorical(editor)) => Some(editor.column.clone()),
            Some(FilterEditor::DateTime(editor)) => Some(editor.column.clone()),
            None => None,
        };
        let sections = [
            ("Numerical variables", FilterKind::Numeric, &panel.numeric_columns),
            ("Categorical variables", FilterKind::Categorical, &panel.categorical_columns),
            ("Datetime variables", FilterKind::DateTime, &panel.datetime_columns),
        ];
        egui::ScrollArea::vertical()
            .id_salt("filter_columns")
            .show(ui, |ui| {
                for (title, kind, columns) in sections {
                    if columns.is_empty() {
                        continue;
                    }
                    ui.label(RichText::new(title).color(palette.text_primary));
                    for column in columns {
                        let is_selected = selected_column.as_deref() == Some(column.as_str());
                        if ui.selectable_label(is_selected, column).clicked() {
                            self.controller.edit_filter_column(kind, column);
                        }
                    }
                    ui.add_space(8.0);
                }
            });
    }

    fn render_editor(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        match self.controller.ui.filters.editor.clone() {
            None => {
                ui.label(RichText::new("Pick a variable to filter").color(palette.text_muted));
            }
            Some(FilterEditor::Numeric(editor)) => {
                ui.label(RichText::new(&editor.column).color(palette.text_primary));
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Min").color(palette.text_muted));
                    let mut lo_entry = editor.lo_entry.clone();
                    let lo_response = ui.add(
                        egui::TextEdit::singleline(&mut lo_entry).desired_width(56.0),
                    );
                    let mut hi_entry = editor.hi_entry.clone();
                    let hi_response = ui.add(
                        egui::TextEdit::singleline(&mut hi_entry).desired_width(56.0),
                    );
                    ui.label(RichText::new("Max").color(palette.text_muted));
                    if let Some(FilterEditor::Numeric(live)) =
                        self.controller.ui.filters.editor.as_mut()
                    {
                        live.lo_entry = lo_entry;
                        live.hi_entry = hi_entry;
                    }
                    if lo_response.lost_focus() || hi_response.lost_focus() {
                        self.controller.commit_numeric_filter();
                    }
                });
                let slider = range_slider::range_slider(
                    ui,
                    true,
                    editor.min_limit,
                    editor.max_limit,
                    editor.lo,
                    editor.hi,
                );
                if let Some((lo, hi)) = slider.changed {
                    if let Some(FilterEditor::Numeric(live)) =
                        self.controller.ui.filters.editor.as_mut()
                    {
                        live.lo = lo;
                        live.hi = hi;
                        live.lo_entry = format_bound(lo);
                        live.hi_entry = format_bound(hi);
                    }
                }
                if slider.released {
                    self.controller.commit_numeric_filter();
                }
            }
            Some(FilterEditor::Categorical(editor)) => {
                ui.label(RichText::new(&editor.column).color(palette.text_primary));
                egui::ScrollArea::vertical()
                    .id_salt("category_choices")
                    .show(ui, |ui| {
                        for (category, included) in &editor.choices {
                            let mut checked = *included;
                            if ui.checkbox(&mut checked, category).changed() {
                                self.controller.toggle_category(
                                    &editor.column,
                                    category,
                                    checked,
                                );
                            }
                        }
                    });
            }
            Some(FilterEditor::DateTime(editor)) => {
                ui.label(RichText::new(&editor.column).color(palette.text_primary));
                ui.label(
                    RichText::new(format!(
                        "Between {} and {}",
                        editor.min_limit, editor.max_limit
                    ))
                    .color(palette.text_muted),
                );
                let mut start = editor.start_entry.clone();
                let mut end = editor.end_entry.clone();
                let start_response = ui.horizontal(|ui| {
                    ui.label(RichText::new("Start").color(palette.text_muted));
                    ui.add(egui::TextEdit::singleline(&mut start).desired_width(100.0))
                });
                let end_response = ui.horizontal(|ui| {
                    ui.label(RichText::new("End").color(palette.text_muted));
                    ui.add(egui::TextEdit::singleline(&mut end).desired_width(100.0))
                });
                if let Some(FilterEditor::DateTime(live)) =
                    self.controller.ui.filters.editor.as_mut()
                {
                    live.start_entry = start;
                    live.end_entry = end;
                }
                if start_response.inner.lost_focus() || end_response.inner.lost_focus() {
                    self.controller.commit_datetime_filter();
                }
                if let Some(error) = &editor.parse_error {
                    ui.colored_label(palette.warning, error);
                }
            }
        }
    }

    fn render_summary_list(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        ui.label(RichText::new("Summary of filters").color(palette.text_primary));
        let summary = self.controller.ui.filters.summary.clone();
        if summary.is_empty() {
            ui.label(RichText::new("No active filters").color(palette.text_muted));
            return;
        }
        egui::ScrollArea::vertical()
            .id_salt("filter_summary")
            .show(ui, |ui| {
                for (index, row) in summary.iter().enumerate() {
                    ui.horizontal(|ui| {
                        if ui.small_button("-").clicked() {
                            self.controller.remove_filter(index);
                        }
                        ui.label(
                            RichText::new(format!("{}: {}", row.column, row.label))
                                .color(palette.text_primary),
                        );
                    });
                }
            });
    }
}
