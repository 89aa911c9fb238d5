//! The per-bin boxplot summary panel and its bin-pick interaction.

use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, Vec2,
};

use crate::analysis::boxplot::BoxplotStats;
use crate::egui_app::view_model::SummaryPlotView;

use super::EguiApp;
use super::style;

const MARGIN: f32 = 34.0;

impl EguiApp {
    pub(super) fn render_summary_panel(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        let Some(view) = self.controller.ui.summary.clone() else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new("No data loaded").color(palette.text_muted),
                );
            });
            return;
        };

        let desired = Vec2::new(ui.available_width(), ui.available_height());
        let (rect, response) = ui.allocate_exact_size(desired, Sense::click());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, palette.bg_primary);
        painter.rect_stroke(rect, 0.0, style::plot_frame_stroke(), StrokeKind::Inside);

        let plot = rect.shrink(MARGIN);
        if plot.width() <= 0.0 || plot.height() <= 0.0 {
            return;
        }

        // Vertical scale with headroom so whisker caps stay inside.
        let span = (view.y_max - view.y_min).max(f64::EPSILON);
        let pad = span * 0.05;
        let y_min = view.y_min - pad;
        let y_max = view.y_max + pad;
        let to_y = |value: f64| {
            let t = ((value - y_min) / (y_max - y_min)) as f32;
            plot.bottom() - t * plot.height()
        };

        // Zero line across the whole plot.
        if y_min < 0.0 && y_max > 0.0 {
            let zero = to_y(0.0);
            painter.line_segment(
                [Pos2::new(plot.left(), zero), Pos2::new(plot.right(), zero)],
                Stroke::new(1.0, palette.grid_soft),
            );
        }

        let k = view.bin_count.max(1);
        let slot_w = plot.width() / k as f32;
        let box_w = (slot_w * 0.38).min(24.0);

        for group in &view.groups {
            let center_x = plot.left() + (group.bin as f32 - 0.5) * slot_w;
            let selected = view.selected_bin == group.bin;
            if selected {
                let slot = Rect::from_min_max(
                    Pos2::new(center_x - slot_w / 2.0, plot.top()),
                    Pos2::new(center_x + slot_w / 2.0, plot.bottom()),
                );
                painter.rect_filled(slot, 0.0, Color32::from_rgba_unmultiplied(80, 80, 90, 40));
            }
            if let Some(stats) = &group.first {
                draw_box(
                    &painter,
                    stats,
                    center_x - box_w * 0.55,
                    box_w,
                    palette.model_first,
                    selected.then_some(palette.highlight),
                    to_y,
                );
            }
            if let Some(stats) = &group.second {
                draw_box(
                    &painter,
                    stats,
                    center_x + box_w * 0.55,
                    box_w,
                    palette.model_second,
                    selected.then_some(palette.highlight),
                    to_y,
                );
            }
        }

        draw_axis_labels(&painter, &view, plot, rect, y_min, y_max, slot_w);
        draw_legend(&painter, &view, plot);

        // A click drills into the bin whose slot contains the pointer.
        if response.clicked() && !self.controller.controls_locked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                if plot.contains(pointer) {
                    let bin = ((pointer.x - plot.left()) / slot_w) as u32 + 1;
                    self.controller.pick_bin(bin.min(k));
                }
            }
        }
    }
}

fn draw_box(
    painter: &egui::Painter,
    stats: &BoxplotStats,
    center_x: f32,
    width: f32,
    color: Color32,
    highlight: Option<Color32>,
    to_y: impl Fn(f64) -> f32,
) {
    let half = width / 2.0;
    let stroke = Stroke::new(if highlight.is_some() { 2.0 } else { 1.0 }, color);
    let edge = highlight.unwrap_or(color);
    let body = Rect::from_min_max(
        Pos2::new(center_x - half, to_y(stats.q3)),
        Pos2::new(center_x + half, to_y(stats.q1)),
    );
    if highlight.is_some() {
        painter.rect_filled(body, 0.0, color.gamma_multiply(0.45));
    }
    painter.rect_stroke(body, 0.0, Stroke::new(stroke.width, edge), StrokeKind::Middle);

    let median_y = to_y(stats.median);
    painter.line_segment(
        [
            Pos2::new(center_x - half, median_y),
            Pos2::new(center_x + half, median_y),
        ],
        Stroke::new(1.5, color),
    );

    for (from, to) in [
        (stats.q3, stats.whisker_high),
        (stats.q1, stats.whisker_low),
    ] {
        painter.line_segment(
            [
                Pos2::new(center_x, to_y(from)),
                Pos2::new(center_x, to_y(to)),
            ],
            Stroke::new(1.0, color),
        );
        let cap_y = to_y(to);
        painter.line_segment(
            [
                Pos2::new(center_x - half * 0.6, cap_y),
                Pos2::new(center_x + half * 0.6, cap_y),
            ],
            Stroke::new(1.0, color),
        );
    }
}

fn draw_axis_labels(
    painter: &egui::Painter,
    view: &SummaryPlotView,
    plot: Rect,
    outer: Rect,
    y_min: f64,
    y_max: f64,
    slot_w: f32,
) {
    let palette = style::palette();
    let font = FontId::proportional(11.0);
    let k = view.bin_count.max(1);
    let tick_step = (k / 5).max(1);
    let mut bin = tick_step;
    while bin <= k {
        let x = plot.left() + (bin as f32 - 0.5) * slot_w;
        painter.text(
            Pos2::new(x, plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            bin.to_string(),
            font.clone(),
            palette.text_muted,
        );
        bin += tick_step;
    }
    painter.text(
        Pos2::new(outer.center().x, outer.bottom() - 4.0),
        Align2::CENTER_BOTTOM,
        "Data quantile",
        font.clone(),
        palette.text_primary,
    );
    for (value, align) in [(y_max, Align2::LEFT_TOP), (y_min, Align2::LEFT_BOTTOM)] {
        let y = if value == y_max { plot.top() } else { plot.bottom() };
        painter.text(
            Pos2::new(outer.left() + 4.0, y),
            align,
            format!("{value:.2}"),
            font.clone(),
            palette.text_muted,
        );
    }
}

fn draw_legend(painter: &egui::Painter, view: &SummaryPlotView, plot: Rect) {
    let palette = style::palette();
    let font = FontId::proportional(12.0);
    let anchor = Pos2::new(plot.right() - 6.0, plot.bottom() - 22.0);
    painter.text(
        anchor,
        Align2::RIGHT_BOTTOM,
        &view.models[0],
        font.clone(),
        palette.model_first,
    );
    painter.text(
        Pos2::new(anchor.x, anchor.y + 16.0),
        Align2::RIGHT_BOTTOM,
        &view.models[1],
        font,
        palette.model_second,
    );
}
