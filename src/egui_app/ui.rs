//! egui renderer for the application UI.

pub mod colormap;
mod controls_panel;
mod detail_panel;
mod filter_window;
mod import_window;
mod range_slider;
mod summary_panel;
pub mod style;

use std::time::Instant;

use eframe::egui::{self, Color32, Frame, RichText};

use crate::egui_app::controller::EguiController;

/// Smallest usable window for the paired plots.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::Vec2::new(960.0, 600.0);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
    last_title: String,
}

impl EguiApp {
    /// Create the app, loading persisted settings and recent files.
    pub fn new() -> Result<Self, String> {
        let mut controller = EguiController::new();
        controller.load_persisted();
        Ok(Self {
            controller,
            visuals_set: false,
            last_title: String::new(),
        })
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn sync_window_title(&mut self, ctx: &egui::Context) {
        let title = self.controller.ui.window_title.clone();
        if title != self.last_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.last_title = title;
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("top_bar")
            .frame(Frame::new().fill(palette.bg_secondary))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.menu_button("File", |ui| {
                        if ui.button("Open file...").clicked() {
                            self.controller.open_file_via_dialog();
                            ui.close();
                        }
                        let recent = self.controller.ui.recent_labels.clone();
                        ui.menu_button("Recent files", |ui| {
                            if recent.is_empty() {
                                ui.label(
                                    RichText::new("Nothing opened yet")
                                        .color(palette.text_muted),
                                );
                            }
                            for (index, label) in recent.iter().enumerate() {
                                if ui.button(label).clicked() {
                                    self.controller.open_recent(index);
                                    ui.close();
                                }
                            }
                        });
                        if ui.button("Save current plot...").clicked() {
                            self.controller.save_plot_via_dialog();
                            ui.close();
                        }
                        ui.separator();
                        if ui.button("Exit").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                    ui.menu_button("View", |ui| {
                        let loaded = self.controller.ui.controls.enabled;
                        if ui
                            .add_enabled(loaded, egui::Button::new("Select variables..."))
                            .clicked()
                        {
                            self.controller.open_filter_panel();
                            ui.close();
                        }
                        if ui
                            .add_enabled(loaded, egui::Button::new("Change target variable..."))
                            .clicked()
                        {
                            self.controller.open_target_pick();
                            ui.close();
                        }
                        if ui
                            .add_enabled(loaded, egui::Button::new("Change models to compare..."))
                            .clicked()
                        {
                            self.controller.open_model_pick();
                            ui.close();
                        }
                    });
                });
            });
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(Frame::new().fill(Color32::from_rgb(0, 0, 0)))
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    ui.add_space(8.0);
                    ui.painter().circle_filled(
                        ui.cursor().min + egui::vec2(9.0, 11.0),
                        7.0,
                        status.badge_color,
                    );
                    ui.add_space(18.0);
                    ui.label(RichText::new(&status.badge_label).color(Color32::WHITE));
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(Color32::WHITE));
                });
            });
    }

    fn render_center(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let half_height = ui.available_height();
            ui.columns(2, |columns| {
                columns[0].vertical(|ui| {
                    ui.set_min_height(half_height);
                    self.render_summary_controls(ui);
                    ui.add_space(4.0);
                    self.render_summary_panel(ui);
                });
                columns[1].vertical(|ui| {
                    ui.set_min_height(half_height);
                    self.render_detail_controls(ui);
                    ui.add_space(4.0);
                    self.render_detail_panel(ui);
                });
            });
        });
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.sync_window_title(ctx);

        // Drive the replay sequencer; schedule a wake-up for the pending
        // step instead of polling every frame.
        if let Some(wait) = self.controller.tick_replay(Instant::now()) {
            ctx.request_repaint_after(wait);
        }

        self.render_top_bar(ctx);
        self.render_status(ctx);
        self.render_center(ctx);
        self.render_import_window(ctx);
        self.render_model_pick_window(ctx);
        self.render_target_pick_window(ctx);
        self.render_filter_window(ctx);
    }
}
