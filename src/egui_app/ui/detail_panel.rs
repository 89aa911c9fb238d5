//! The error-vs-error detail panel: shaded half-planes, the percentile
//! colored scatter, the subset median, and the convex boundary.

use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, StrokeKind, Ui, Vec2,
};

use crate::egui_app::view_model::DetailPlotView;

use super::EguiApp;
use super::colormap;
use super::style;

const MARGIN: f32 = 34.0;
const COLORBAR_WIDTH: f32 = 14.0;

impl EguiApp {
    pub(super) fn render_detail_panel(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        let notice = self.controller.ui.detail_notice.clone();
        let Some(view) = self.controller.ui.detail.clone() else {
            ui.centered_and_justified(|ui| {
                let text = notice.unwrap_or_else(|| "No data loaded".into());
                ui.label(egui::RichText::new(text).color(palette.warning));
            });
            return;
        };

        let desired = Vec2::new(ui.available_width(), ui.available_height());
        let (rect, _response) = ui.allocate_exact_size(desired, Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, palette.bg_primary);
        painter.rect_stroke(rect, 0.0, style::plot_frame_stroke(), StrokeKind::Inside);

        // Square plot area with room for the colorbar on the right.
        let inner = Rect::from_min_max(
            Pos2::new(rect.left() + MARGIN, rect.top() + MARGIN),
            Pos2::new(rect.right() - MARGIN - COLORBAR_WIDTH - 26.0, rect.bottom() - MARGIN),
        );
        if inner.width() <= 0.0 || inner.height() <= 0.0 {
            return;
        }
        let side = inner.width().min(inner.height());
        let plot = Rect::from_center_size(inner.center(), Vec2::splat(side));

        let extent = view.extent.max(f64::MIN_POSITIVE);
        let to_screen = |x: f64, y: f64| {
            let tx = ((x + extent) / (2.0 * extent)) as f32;
            let ty = ((y + extent) / (2.0 * extent)) as f32;
            Pos2::new(
                plot.left() + tx * plot.width(),
                plot.bottom() - ty * plot.height(),
            )
        };

        draw_frame(&painter, &view, plot, to_screen);

        for &(x, y) in &view.background {
            painter.circle_filled(
                to_screen(x, y),
                3.0,
                Color32::from_rgba_unmultiplied(120, 120, 120, 60),
            );
        }
        for point in &view.points {
            painter.circle_filled(
                to_screen(point.x, point.y),
                4.0,
                colormap::percentile_color(point.percentile),
            );
        }

        // Subset median cross.
        let center = to_screen(view.center.0, view.center.1);
        let arm = 6.0;
        for (a, b) in [
            (Vec2::new(-arm, -arm), Vec2::new(arm, arm)),
            (Vec2::new(-arm, arm), Vec2::new(arm, -arm)),
        ] {
            painter.line_segment(
                [center + a, center + b],
                Stroke::new(2.0, palette.text_primary),
            );
        }

        for &((ax, ay), (bx, by)) in &view.hull {
            painter.line_segment(
                [to_screen(ax, ay), to_screen(bx, by)],
                Stroke::new(1.2, palette.text_primary),
            );
        }

        draw_titles(&painter, &view, rect);
        draw_colorbar(&painter, plot, rect);
    }
}

fn draw_frame(
    painter: &egui::Painter,
    view: &DetailPlotView,
    plot: Rect,
    to_screen: impl Fn(f64, f64) -> Pos2,
) {
    let palette = style::palette();
    let e = view.extent.max(f64::MIN_POSITIVE);
    let origin = to_screen(0.0, 0.0);

    // Half-plane shading: above/below the diagonals the first model's
    // absolute error is smaller, left/right the second model's is.
    let first_fill = palette.model_first.gamma_multiply(0.12);
    let second_fill = palette.model_second.gamma_multiply(0.12);
    for (corner_a, corner_b, fill) in [
        ((-e, -e), (e, -e), first_fill),
        ((-e, e), (e, e), first_fill),
        ((-e, -e), (-e, e), second_fill),
        ((e, -e), (e, e), second_fill),
    ] {
        painter.add(Shape::convex_polygon(
            vec![
                to_screen(corner_a.0, corner_a.1),
                origin,
                to_screen(corner_b.0, corner_b.1),
            ],
            fill,
            Stroke::NONE,
        ));
    }

    // Axis cross and both equal-error diagonals.
    painter.line_segment(
        [to_screen(0.0, -e), to_screen(0.0, e)],
        Stroke::new(1.0, palette.grid_soft),
    );
    painter.line_segment(
        [to_screen(-e, 0.0), to_screen(e, 0.0)],
        Stroke::new(1.0, palette.grid_soft),
    );
    for (a, b) in [((-e, -e), (e, e)), ((-e, e), (e, -e))] {
        painter.line_segment(
            [to_screen(a.0, a.1), to_screen(b.0, b.1)],
            Stroke::new(1.0, palette.text_muted.gamma_multiply(0.6)),
        );
    }
    painter.rect_stroke(plot, 0.0, style::plot_frame_stroke(), StrokeKind::Middle);

    // Region labels: above the diagonals the first model's absolute error
    // is the smaller one, beside them the second model's is.
    let region_font = FontId::proportional(11.0);
    painter.text(
        Pos2::new(plot.center().x, plot.top() + 8.0),
        Align2::CENTER_TOP,
        format!("{} is better", view.models[0]),
        region_font.clone(),
        palette.model_first,
    );
    painter.text(
        Pos2::new(plot.right() - 8.0, plot.center().y),
        Align2::RIGHT_CENTER,
        format!("{} is better", view.models[1]),
        region_font,
        palette.model_second,
    );

    let font = FontId::proportional(12.0);
    painter.text(
        Pos2::new(plot.center().x, plot.bottom() + 16.0),
        Align2::CENTER_TOP,
        format!("Errors of {}", view.models[0]),
        font.clone(),
        palette.model_first,
    );
    // Vertical axis label rendered horizontally above the top-left corner.
    painter.text(
        Pos2::new(plot.left(), plot.top() - 16.0),
        Align2::LEFT_BOTTOM,
        format!("Errors of {}", view.models[1]),
        font,
        palette.model_second,
    );
}

fn draw_titles(painter: &egui::Painter, view: &DetailPlotView, outer: Rect) {
    let palette = style::palette();
    painter.text(
        Pos2::new(outer.center().x, outer.top() + 4.0),
        Align2::CENTER_TOP,
        &view.title,
        FontId::proportional(14.0),
        palette.text_primary,
    );
    if let Some(subtitle) = &view.subtitle {
        painter.text(
            Pos2::new(outer.center().x, outer.top() + 20.0),
            Align2::CENTER_TOP,
            subtitle,
            FontId::proportional(11.0),
            palette.text_muted,
        );
    }
}

fn draw_colorbar(painter: &egui::Painter, plot: Rect, outer: Rect) {
    let palette = style::palette();
    let bar = Rect::from_min_max(
        Pos2::new(outer.right() - MARGIN - COLORBAR_WIDTH, plot.top()),
        Pos2::new(outer.right() - MARGIN, plot.bottom()),
    );
    const STEPS: usize = 40;
    let step_h = bar.height() / STEPS as f32;
    for step in 0..STEPS {
        // Percentile 100 at the top of the bar.
        let percentile = 100.0 * (1.0 - step as f64 / (STEPS - 1) as f64);
        let top = bar.top() + step as f32 * step_h;
        painter.rect_filled(
            Rect::from_min_max(
                Pos2::new(bar.left(), top),
                Pos2::new(bar.right(), top + step_h + 0.5),
            ),
            0.0,
            colormap::percentile_color(percentile),
        );
    }
    painter.rect_stroke(bar, 0.0, style::plot_frame_stroke(), StrokeKind::Middle);

    let font = FontId::proportional(10.0);
    for (value, align, y) in [
        ("100", Align2::LEFT_TOP, bar.top()),
        ("50", Align2::LEFT_CENTER, bar.center().y),
        ("0", Align2::LEFT_BOTTOM, bar.bottom()),
    ] {
        painter.text(
            Pos2::new(bar.right() + 3.0, y),
            align,
            value,
            font.clone(),
            palette.text_muted,
        );
    }
    painter.text(
        Pos2::new(bar.center().x, bar.top() - 4.0),
        Align2::CENTER_BOTTOM,
        "Percentile",
        font,
        palette.text_muted,
    );
}
