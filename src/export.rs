//! Save the currently displayed charts as a light-background PNG.
//!
//! The exported rendering deliberately differs from the dark on-screen
//! theme: white background, darker marks, same geometry.

mod raster;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::egui_app::ui::colormap;
use crate::egui_app::view_model::{DetailPlotView, SummaryPlotView};
use raster::Canvas;

const CHART_SIDE: u32 = 640;
const MARGIN: u32 = 40;
const GAP: u32 = 24;

const BACKGROUND: [u8; 3] = [250, 250, 248];
const FRAME: [u8; 3] = [60, 60, 64];
const GRID: [u8; 3] = [210, 210, 214];
const FIRST_MODEL: [u8; 3] = [204, 102, 24];
const SECOND_MODEL: [u8; 3] = [44, 138, 78];
const NEUTRAL: [u8; 3] = [90, 90, 96];

/// Errors raised while exporting the plot image.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Neither chart has been rendered yet.
    #[error("There is no plot to export yet")]
    NothingToExport,
    /// Failed to encode or write the image file.
    #[error("Failed to write image {path}: {source}")]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Render the available charts side by side and write a PNG to `path`.
pub fn save_plots_png(
    path: &Path,
    summary: Option<&SummaryPlotView>,
    detail: Option<&DetailPlotView>,
) -> Result<(), ExportError> {
    let charts = usize::from(summary.is_some()) + usize::from(detail.is_some());
    if charts == 0 {
        return Err(ExportError::NothingToExport);
    }
    let width = MARGIN * 2 + CHART_SIDE * charts as u32 + GAP * (charts as u32 - 1);
    let height = MARGIN * 2 + CHART_SIDE;
    let mut canvas = Canvas::new(width, height, BACKGROUND);

    let mut left = MARGIN as i64;
    if let Some(view) = summary {
        draw_summary(&mut canvas, left, MARGIN as i64, CHART_SIDE as i64, view);
        left += (CHART_SIDE + GAP) as i64;
    }
    if let Some(view) = detail {
        draw_detail(&mut canvas, left, MARGIN as i64, CHART_SIDE as i64, view);
    }

    canvas
        .into_image()
        .save(path)
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })
}

fn draw_summary(canvas: &mut Canvas, left: i64, top: i64, side: i64, view: &SummaryPlotView) {
    canvas.stroke_rect(left, top, left + side, top + side, FRAME);

    let span = (view.y_max - view.y_min).max(f64::EPSILON);
    let pad = span * 0.05;
    let y_min = view.y_min - pad;
    let y_max = view.y_max + pad;
    let to_y = |value: f64| {
        let t = (value - y_min) / (y_max - y_min);
        top + side - (t * side as f64) as i64
    };

    if y_min < 0.0 && y_max > 0.0 {
        let zero = to_y(0.0);
        canvas.line(left, zero, left + side, zero, GRID);
    }

    let k = view.bin_count.max(1) as i64;
    let slot = side / k;
    let box_w = (slot as f64 * 0.38).min(22.0) as i64;
    for group in &view.groups {
        let center = left + (group.bin as i64 - 1) * slot + slot / 2;
        let selected = view.selected_bin == group.bin;
        let sides = [
            (&group.first, -box_w * 11 / 20, FIRST_MODEL),
            (&group.second, box_w * 11 / 20, SECOND_MODEL),
        ];
        for (stats, offset, color) in sides {
            let Some(stats) = stats else { continue };
            let x = center + offset;
            let half = box_w / 2;
            canvas.stroke_rect(x - half, to_y(stats.q3), x + half, to_y(stats.q1), color);
            if selected {
                canvas.fill_rect(
                    x - half + 1,
                    to_y(stats.q3) + 1,
                    x + half - 1,
                    to_y(stats.q1) - 1,
                    blend_toward(color, BACKGROUND),
                );
            }
            let median = to_y(stats.median);
            canvas.line(x - half, median, x + half, median, NEUTRAL);
            for (from, to) in [
                (stats.q3, stats.whisker_high),
                (stats.q1, stats.whisker_low),
            ] {
                canvas.line(x, to_y(from), x, to_y(to), color);
                let cap = to_y(to);
                canvas.line(x - half / 2, cap, x + half / 2, cap, color);
            }
        }
    }
}

fn draw_detail(canvas: &mut Canvas, left: i64, top: i64, side: i64, view: &DetailPlotView) {
    let extent = view.extent.max(f64::MIN_POSITIVE);
    let to_xy = |x: f64, y: f64| {
        let tx = (x + extent) / (2.0 * extent);
        let ty = (y + extent) / (2.0 * extent);
        (
            left + (tx * side as f64) as i64,
            top + side - (ty * side as f64) as i64,
        )
    };

    // Half-plane tint: vertical-majority pixels favor the first model,
    // horizontal-majority the second.
    for py in 0..side {
        for px in 0..side {
            let dx = px - side / 2;
            let dy = py - side / 2;
            let color = if dy.abs() > dx.abs() {
                FIRST_MODEL
            } else if dx.abs() > dy.abs() {
                SECOND_MODEL
            } else {
                continue;
            };
            canvas.blend(left + px, top + py, color, 18);
        }
    }

    let (cx0, cy0) = to_xy(0.0, -extent);
    let (cx1, cy1) = to_xy(0.0, extent);
    canvas.line(cx0, cy0, cx1, cy1, GRID);
    let (ax0, ay0) = to_xy(-extent, 0.0);
    let (ax1, ay1) = to_xy(extent, 0.0);
    canvas.line(ax0, ay0, ax1, ay1, GRID);
    for (a, b) in [
        ((-extent, -extent), (extent, extent)),
        ((-extent, extent), (extent, -extent)),
    ] {
        let (x0, y0) = to_xy(a.0, a.1);
        let (x1, y1) = to_xy(b.0, b.1);
        canvas.line(x0, y0, x1, y1, GRID);
    }

    for &(x, y) in &view.background {
        let (px, py) = to_xy(x, y);
        canvas.blend_circle(px, py, 3, [140, 140, 140], 70);
    }
    for point in &view.points {
        let (px, py) = to_xy(point.x, point.y);
        canvas.fill_circle(px, py, 4, colormap::percentile_rgb(point.percentile));
    }

    let (mx, my) = to_xy(view.center.0, view.center.1);
    canvas.line(mx - 6, my - 6, mx + 6, my + 6, [20, 20, 20]);
    canvas.line(mx - 6, my + 6, mx + 6, my - 6, [20, 20, 20]);

    for &((hx0, hy0), (hx1, hy1)) in &view.hull {
        let (x0, y0) = to_xy(hx0, hy0);
        let (x1, y1) = to_xy(hx1, hy1);
        canvas.line(x0, y0, x1, y1, [20, 20, 20]);
    }

    canvas.stroke_rect(left, top, left + side, top + side, FRAME);
}

/// Soft fill derived from an accent color for the selected-bin highlight.
fn blend_toward(color: [u8; 3], background: [u8; 3]) -> [u8; 3] {
    let mut out = [0u8; 3];
    for channel in 0..3 {
        out[channel] =
            ((color[channel] as u16 * 2 + background[channel] as u16 * 3) / 5) as u8;
    }
    out
}
