//! Helpers to convert core results into render-ready view structs.
//!
//! The renderer consumes these values verbatim; nothing here touches the
//! dataset or mutates state.

use crate::analysis::boxplot::BoxplotStats;
use crate::analysis::hull::HullEdge;
use crate::analysis::outlier::{ErrorPoint, OutlierRanking};

/// Paired boxplot summary across all bins.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryPlotView {
    pub bin_count: u32,
    pub groups: Vec<BinBoxesView>,
    /// Vertical data range covered by the drawn boxes.
    pub y_min: f64,
    pub y_max: f64,
    pub models: [String; 2],
    /// Highlighted bin id; 0 when nothing is drilled in.
    pub selected_bin: u32,
}

/// The two models' boxplots for one bin. A side is absent when the bin has
/// no rows for it.
#[derive(Clone, Debug, PartialEq)]
pub struct BinBoxesView {
    pub bin: u32,
    pub first: Option<BoxplotStats>,
    pub second: Option<BoxplotStats>,
}

/// One scatter point of the detail plot, colored by percentile downstream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterPointView {
    pub x: f64,
    pub y: f64,
    pub percentile: f64,
}

/// The error-vs-error detail plot.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailPlotView {
    /// Symmetric axis limit: the plane spans [-extent, extent] both ways.
    pub extent: f64,
    /// All rows of the dataset, the static gray layer.
    pub background: Vec<(f64, f64)>,
    /// The ranked subset, colored by percentile.
    pub points: Vec<ScatterPointView>,
    /// Subset median, marked with a cross.
    pub center: (f64, f64),
    /// Convex boundary segments of the densest retained share.
    pub hull: Vec<((f64, f64), (f64, f64))>,
    pub models: [String; 2],
    pub title: String,
    pub subtitle: Option<String>,
}

/// Assemble the summary view from per-bin samples of both error columns.
pub fn summary_view(
    bin_count: u32,
    per_bin: &[(Vec<f64>, Vec<f64>)],
    models: [String; 2],
    selected_bin: u32,
) -> SummaryPlotView {
    let mut groups = Vec::with_capacity(per_bin.len());
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (index, (first_sample, second_sample)) in per_bin.iter().enumerate() {
        let first = BoxplotStats::from_sample(first_sample);
        let second = BoxplotStats::from_sample(second_sample);
        for stats in [&first, &second].into_iter().flatten() {
            let (low, high) = stats.extent();
            y_min = y_min.min(low);
            y_max = y_max.max(high);
        }
        groups.push(BinBoxesView {
            bin: index as u32 + 1,
            first,
            second,
        });
    }
    if y_min > y_max {
        y_min = 0.0;
        y_max = 1.0;
    }
    SummaryPlotView {
        bin_count,
        groups,
        y_min,
        y_max,
        models,
        selected_bin,
    }
}

/// Assemble the detail view from a ranking and its boundary.
#[allow(clippy::too_many_arguments)]
pub fn detail_view(
    extent: f64,
    background: Vec<(f64, f64)>,
    points: &[ErrorPoint],
    ranking: &OutlierRanking,
    hull: &[HullEdge],
    models: [String; 2],
    title: String,
    subtitle: Option<String>,
) -> DetailPlotView {
    let points = points
        .iter()
        .zip(&ranking.percentiles)
        .map(|(point, &percentile)| ScatterPointView {
            x: point.x,
            y: point.y,
            percentile,
        })
        .collect();
    let hull = hull
        .iter()
        .map(|&(a, b)| ((a.x, a.y), (b.x, b.y)))
        .collect();
    DetailPlotView {
        extent,
        background,
        points,
        center: (ranking.center.x, ranking.center.y),
        hull,
        models,
        title,
        subtitle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::outlier;

    #[test]
    fn summary_view_tracks_extremes_across_models() {
        let per_bin = vec![
            (vec![1.0, 2.0, 3.0], vec![-5.0, -4.0, -3.0]),
            (vec![10.0, 11.0], vec![0.0, 1.0]),
        ];
        let view = summary_view(2, &per_bin, ["a".into(), "b".into()], 0);
        assert_eq!(view.groups.len(), 2);
        assert_eq!(view.y_min, -5.0);
        assert_eq!(view.y_max, 11.0);
    }

    #[test]
    fn summary_view_tolerates_empty_bins() {
        let per_bin = vec![(Vec::new(), Vec::new())];
        let view = summary_view(1, &per_bin, ["a".into(), "b".into()], 0);
        assert!(view.groups[0].first.is_none());
        assert_eq!(view.y_min, 0.0);
        assert_eq!(view.y_max, 1.0);
    }

    #[test]
    fn detail_view_pairs_points_with_percentiles() {
        let points = vec![
            outlier::ErrorPoint::new(1.0, 0.0),
            outlier::ErrorPoint::new(-1.0, 0.0),
            outlier::ErrorPoint::new(0.0, 1.0),
            outlier::ErrorPoint::new(0.0, -1.0),
        ];
        let ranking = outlier::rank(&points).unwrap();
        let view = detail_view(
            2.0,
            Vec::new(),
            &points,
            &ranking,
            &[],
            ["a".into(), "b".into()],
            "All observations".into(),
            None,
        );
        assert_eq!(view.points.len(), 4);
        assert_eq!(view.points[0].x, 1.0);
        assert_eq!(view.points[0].percentile, ranking.percentiles[0]);
    }
}
