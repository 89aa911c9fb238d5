//! Planar convex hull of the retained error points.
//!
//! Andrew's monotone chain, O(n log n). The hull is reported as an ordered
//! edge list because the renderer only draws polyline segments.

use ordered_float::OrderedFloat;

use super::outlier::ErrorPoint;

/// One boundary segment between two adjacent hull vertices.
pub type HullEdge = (ErrorPoint, ErrorPoint);

/// Cross product of (b - a) x (c - a); positive for a counter-clockwise turn.
fn cross(a: ErrorPoint, b: ErrorPoint, c: ErrorPoint) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Convex hull vertices in counter-clockwise order.
///
/// Fewer than three distinct input points yield no hull; collinear interior
/// points are dropped, so a sample on a circle keeps every point as a vertex.
pub fn convex_hull(points: &[ErrorPoint]) -> Vec<ErrorPoint> {
    let mut sorted: Vec<ErrorPoint> = points.to_vec();
    sorted.sort_by_key(|p| (OrderedFloat(p.x), OrderedFloat(p.y)));
    sorted.dedup_by(|a, b| a.x == b.x && a.y == b.y);
    if sorted.len() < 3 {
        return Vec::new();
    }

    let mut lower: Vec<ErrorPoint> = Vec::with_capacity(sorted.len());
    for &point in &sorted {
        while lower.len() >= 2
            && cross(lower[lower.len() - 2], lower[lower.len() - 1], point) <= 0.0
        {
            lower.pop();
        }
        lower.push(point);
    }

    let mut upper: Vec<ErrorPoint> = Vec::with_capacity(sorted.len());
    for &point in sorted.iter().rev() {
        while upper.len() >= 2
            && cross(upper[upper.len() - 2], upper[upper.len() - 1], point) <= 0.0
        {
            upper.pop();
        }
        upper.push(point);
    }

    // Endpoints of each chain repeat the other chain's start.
    lower.pop();
    upper.pop();
    lower.extend(upper);
    if lower.len() < 3 {
        return Vec::new();
    }
    lower
}

/// Hull boundary as an ordered, closed edge sequence for rendering.
pub fn hull_edges(points: &[ErrorPoint]) -> Vec<HullEdge> {
    let vertices = convex_hull(points);
    if vertices.len() < 3 {
        return Vec::new();
    }
    vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(&a, &b)| (a, b))
        .collect()
}
