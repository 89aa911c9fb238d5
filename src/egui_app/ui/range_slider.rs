//! A dual-handle range slider painted directly, since egui's built-in
//! slider has a single handle.

use eframe::egui::{Pos2, Rect, Sense, Stroke, Ui, Vec2};

use super::style;

const HANDLE_RADIUS: f32 = 7.0;
const TRACK_HEIGHT: f32 = 4.0;

/// Result of one frame of interaction with the slider.
pub struct RangeSliderResponse {
    /// New (lo, hi) values while a handle is being dragged.
    pub changed: Option<(f64, f64)>,
    /// A drag ended this frame; commit the pending values.
    pub released: bool,
}

/// Draw a dual-handle slider over `[min, max]` showing `(lo, hi)`.
pub fn range_slider(
    ui: &mut Ui,
    enabled: bool,
    min: f64,
    max: f64,
    lo: f64,
    hi: f64,
) -> RangeSliderResponse {
    let width = ui.available_width().max(80.0);
    let (rect, response) = ui.allocate_exact_size(
        Vec2::new(width, HANDLE_RADIUS * 2.0 + 6.0),
        if enabled { Sense::click_and_drag() } else { Sense::hover() },
    );
    let palette = style::palette();
    let span = (max - min).max(f64::EPSILON);
    let to_x = |value: f64| {
        let t = ((value - min) / span).clamp(0.0, 1.0) as f32;
        rect.left() + HANDLE_RADIUS + t * (rect.width() - HANDLE_RADIUS * 2.0)
    };
    let from_x = |x: f32| {
        let t = ((x - rect.left() - HANDLE_RADIUS)
            / (rect.width() - HANDLE_RADIUS * 2.0).max(1.0))
        .clamp(0.0, 1.0) as f64;
        min + t * span
    };

    let center_y = rect.center().y;
    let track = Rect::from_min_max(
        Pos2::new(rect.left() + HANDLE_RADIUS, center_y - TRACK_HEIGHT / 2.0),
        Pos2::new(rect.right() - HANDLE_RADIUS, center_y + TRACK_HEIGHT / 2.0),
    );
    let painter = ui.painter();
    painter.rect_filled(track, 2.0, palette.grid_soft);

    let lo_x = to_x(lo);
    let hi_x = to_x(hi);
    let active = Rect::from_min_max(
        Pos2::new(lo_x, track.top()),
        Pos2::new(hi_x, track.bottom()),
    );
    let active_color = if enabled {
        palette.model_second
    } else {
        palette.bg_tertiary
    };
    painter.rect_filled(active, 2.0, active_color);

    let handle_fill = if enabled {
        palette.text_primary
    } else {
        palette.text_muted
    };
    for x in [lo_x, hi_x] {
        painter.circle_filled(Pos2::new(x, center_y), HANDLE_RADIUS, handle_fill);
        painter.circle_stroke(
            Pos2::new(x, center_y),
            HANDLE_RADIUS,
            Stroke::new(1.0, palette.panel_outline),
        );
    }
    if !enabled {
        return RangeSliderResponse {
            changed: None,
            released: false,
        };
    }

    let mut changed = None;
    if response.dragged() || response.clicked() {
        if let Some(pointer) = response.interact_pointer_pos() {
            let value = from_x(pointer.x);
            // The nearer handle follows the pointer.
            let (new_lo, new_hi) = if (pointer.x - lo_x).abs() <= (pointer.x - hi_x).abs() {
                (value.min(hi), hi)
            } else {
                (lo, value.max(lo))
            };
            if new_lo != lo || new_hi != hi {
                changed = Some((new_lo, new_hi));
            }
        }
    }

    RangeSliderResponse {
        changed,
        released: response.drag_stopped(),
    }
}
