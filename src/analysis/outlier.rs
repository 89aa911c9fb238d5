//! Multivariate outlier ranking of paired error vectors.
//!
//! Each observation contributes one 2-D point: the two models' errors. How
//! extreme a point is must account for the joint error distribution, since
//! the models' errors are typically correlated and differently scaled, so
//! distances are Mahalanobis, not Euclidean: the covariance-weighted
//! quadratic form to the sample center. The covariance is taken about the
//! sample mean; distances are measured from the per-dimension median.

use super::stats;
use super::AnalysisError;

/// One paired error observation: x = first model's error, y = second's.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ErrorPoint {
    pub x: f64,
    pub y: f64,
}

impl ErrorPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Distance and percentile ranking of an error sample.
#[derive(Clone, Debug, PartialEq)]
pub struct OutlierRanking {
    /// Per-dimension sample median, the distance center.
    pub center: ErrorPoint,
    /// Mahalanobis distance of each input point to the center.
    pub distances: Vec<f64>,
    /// Percentile rank of each point: share of the sample at or within its
    /// distance, 0-100. Ties share the same percentile.
    pub percentiles: Vec<f64>,
}

/// Symmetric 2x2 matrix in row-major [xx, xy, yy] form.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Matrix2 {
    xx: f64,
    xy: f64,
    yy: f64,
}

/// Sample covariance of the two error dimensions, n-1 denominator.
fn covariance(points: &[ErrorPoint]) -> Matrix2 {
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / n;
    let mut xx = 0.0;
    let mut xy = 0.0;
    let mut yy = 0.0;
    for point in points {
        let dx = point.x - mean_x;
        let dy = point.y - mean_y;
        xx += dx * dx;
        xy += dx * dy;
        yy += dy * dy;
    }
    let norm = (n - 1.0).max(1.0);
    Matrix2 {
        xx: xx / norm,
        xy: xy / norm,
        yy: yy / norm,
    }
}

/// Invert a symmetric 2x2 matrix; `None` when it is singular relative to
/// its own scale (no two-dimensional spread in the sample).
fn invert(matrix: Matrix2) -> Option<Matrix2> {
    let scale = matrix
        .xx
        .abs()
        .max(matrix.yy.abs())
        .max(matrix.xy.abs());
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    let det = matrix.xx * matrix.yy - matrix.xy * matrix.xy;
    if !det.is_finite() || det.abs() < 1e-12 * scale * scale {
        return None;
    }
    Some(Matrix2 {
        xx: matrix.yy / det,
        xy: -matrix.xy / det,
        yy: matrix.xx / det,
    })
}

/// Mahalanobis distance of `point` to `center` under the inverse covariance.
fn distance(point: ErrorPoint, center: ErrorPoint, inverse: Matrix2) -> f64 {
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    let quad = dx * (inverse.xx * dx + inverse.xy * dy) + dy * (inverse.xy * dx + inverse.yy * dy);
    quad.max(0.0).sqrt()
}

/// Rank an error sample: distances to the median center and inclusive
/// percentile ranks.
///
/// Fails on an empty sample, a sample too small to estimate a covariance,
/// and a degenerate (singular) covariance. Degeneracy is surfaced rather
/// than defaulted so the caller can skip the render and show a diagnostic.
pub fn rank(points: &[ErrorPoint]) -> Result<OutlierRanking, AnalysisError> {
    if points.is_empty() {
        return Err(AnalysisError::EmptySample);
    }
    if points.len() < 2 {
        return Err(AnalysisError::SampleTooSmall);
    }

    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let (Some(center_x), Some(center_y)) = (stats::median(&xs), stats::median(&ys)) else {
        return Err(AnalysisError::EmptySample);
    };
    let center = ErrorPoint::new(center_x, center_y);

    let inverse = invert(covariance(points)).ok_or(AnalysisError::DegenerateCovariance)?;
    let distances: Vec<f64> = points
        .iter()
        .map(|&point| distance(point, center, inverse))
        .collect();

    let sorted = stats::sorted(&distances);
    let n = distances.len() as f64;
    let percentiles = distances
        .iter()
        .map(|&d| {
            // Inclusive count; partition_point gives the first index > d.
            let within = sorted.partition_point(|&other| other <= d);
            within as f64 / n * 100.0
        })
        .collect();

    Ok(OutlierRanking {
        center,
        distances,
        percentiles,
    })
}

/// Points whose distance sits at or under the `percentage`-th percentile of
/// the distance distribution. Zero retains nothing; the threshold itself is
/// the interpolated percentile of the distances.
pub fn retained_for_boundary(
    points: &[ErrorPoint],
    distances: &[f64],
    percentage: u8,
) -> Vec<ErrorPoint> {
    if percentage == 0 || points.is_empty() {
        return Vec::new();
    }
    let sorted = stats::sorted(distances);
    let threshold = stats::percentile_of_sorted(&sorted, f64::from(percentage.min(100)));
    points
        .iter()
        .zip(distances)
        .filter(|&(_, &d)| d <= threshold)
        .map(|(&p, _)| p)
        .collect()
}
