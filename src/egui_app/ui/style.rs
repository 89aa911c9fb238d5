//! Dark on-screen theme and shared color decisions.

use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

use crate::egui_app::state::StatusTone;

/// Color assignments used across panels and plots.
#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,
    pub panel_outline: Color32,
    pub grid_soft: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    /// Accent for the first model's boxes and axis label.
    pub model_first: Color32,
    /// Accent for the second model's boxes and axis label.
    pub model_second: Color32,
    /// Stroke around the currently drilled-in bin.
    pub highlight: Color32,
    pub warning: Color32,
    pub success: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(14, 14, 16),
        bg_secondary: Color32::from_rgb(28, 29, 32),
        bg_tertiary: Color32::from_rgb(44, 46, 50),
        panel_outline: Color32::from_rgb(40, 44, 50),
        grid_soft: Color32::from_rgb(34, 36, 40),
        text_primary: Color32::from_rgb(190, 196, 204),
        text_muted: Color32::from_rgb(138, 144, 152),
        model_first: Color32::from_rgb(232, 146, 58),
        model_second: Color32::from_rgb(96, 190, 120),
        highlight: Color32::from_rgb(214, 69, 69),
        warning: Color32::from_rgb(198, 132, 90),
        success: Color32::from_rgb(102, 176, 136),
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_secondary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.extreme_bg_color = palette.bg_primary;
    visuals.faint_bg_color = palette.bg_secondary;
    visuals.error_fg_color = palette.warning;
    visuals.warn_fg_color = palette.warning;
    visuals.selection.bg_fill = palette.grid_soft;
    visuals.selection.stroke = Stroke::new(1.0, palette.model_second);
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    set_rectilinear(&mut visuals.widgets.inactive, palette);
    set_rectilinear(&mut visuals.widgets.hovered, palette);
    set_rectilinear(&mut visuals.widgets.active, palette);
    set_rectilinear(&mut visuals.widgets.open, palette);
    visuals.window_corner_radius = CornerRadius::ZERO;
    visuals.menu_corner_radius = CornerRadius::ZERO;
    visuals.popup_shadow = Shadow::NONE;
    visuals.button_frame = true;
}

fn set_rectilinear(vis: &mut WidgetVisuals, palette: Palette) {
    vis.corner_radius = CornerRadius::ZERO;
    vis.bg_fill = palette.bg_tertiary;
    vis.weak_bg_fill = palette.grid_soft;
    vis.bg_stroke = Stroke::new(1.0, palette.panel_outline);
    vis.fg_stroke = Stroke::new(1.0, palette.text_primary);
}

/// Badge color for a status tone.
pub fn status_badge_color(tone: StatusTone) -> Color32 {
    let palette = palette();
    match tone {
        StatusTone::Idle => palette.bg_tertiary,
        StatusTone::Info => palette.success,
        StatusTone::Warning => Color32::from_rgb(192, 138, 43),
        StatusTone::Error => Color32::from_rgb(192, 57, 43),
    }
}

/// Stroke used for plot frames.
pub fn plot_frame_stroke() -> Stroke {
    Stroke::new(1.0, palette().panel_outline)
}
