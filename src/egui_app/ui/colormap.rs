//! Spectral colormap for the percentile scatter coloring.

use eframe::egui::Color32;

/// Anchor colors of the spectral gradient, low percentile first.
const ANCHORS: [[u8; 3]; 11] = [
    [158, 1, 66],
    [213, 62, 79],
    [244, 109, 67],
    [253, 174, 97],
    [254, 224, 139],
    [255, 255, 191],
    [230, 245, 152],
    [171, 221, 164],
    [102, 194, 165],
    [50, 136, 189],
    [94, 79, 162],
];

/// Map a percentile in [0, 100] onto the spectral gradient.
pub fn percentile_color(percentile: f64) -> Color32 {
    let [r, g, b] = percentile_rgb(percentile);
    Color32::from_rgb(r, g, b)
}

/// Raw RGB triple for a percentile, shared with the PNG exporter.
pub fn percentile_rgb(percentile: f64) -> [u8; 3] {
    let t = (percentile / 100.0).clamp(0.0, 1.0) * (ANCHORS.len() - 1) as f64;
    let lower = t.floor() as usize;
    let upper = (lower + 1).min(ANCHORS.len() - 1);
    let fraction = t - lower as f64;
    let mut rgb = [0u8; 3];
    for channel in 0..3 {
        let lo = ANCHORS[lower][channel] as f64;
        let hi = ANCHORS[upper][channel] as f64;
        rgb[channel] = (lo + (hi - lo) * fraction).round() as u8;
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_hit_the_anchor_colors() {
        assert_eq!(percentile_rgb(0.0), [158, 1, 66]);
        assert_eq!(percentile_rgb(100.0), [94, 79, 162]);
    }

    #[test]
    fn midpoint_is_the_neutral_anchor() {
        assert_eq!(percentile_rgb(50.0), [255, 255, 191]);
    }

    #[test]
    fn out_of_range_values_clamp() {
        assert_eq!(percentile_rgb(-10.0), percentile_rgb(0.0));
        assert_eq!(percentile_rgb(250.0), percentile_rgb(100.0));
    }
}
