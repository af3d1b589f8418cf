//! Ramer-Douglas-Peucker path simplification.
//!
//! Distances are Euclidean in latitude/longitude degree space, not geodesic.
//! That is adequate for display tolerances around 1e-4 degrees (~11 m).
//!
//! Splits are driven by an explicit work stack of index ranges instead of
//! recursion, so very long non-collinear tracks cannot exhaust the call stack.
//! The kept set is identical to the recursive formulation.

use crate::Coordinate;
use tracing::{debug, trace};

/// Simplifies an ordered path, keeping points that deviate from the local
/// chord by more than `tolerance` degrees.
///
/// Paths with fewer than 3 points are returned unchanged. The first and last
/// points are always kept. A negative or NaN tolerance behaves like zero:
/// only exactly collinear interior points are dropped.
///
/// # Example
/// ```
/// use skytrace_geo::{simplify, Coordinate};
///
/// let path: Vec<_> = (0..5).map(|i| Coordinate::new(0.0, i as f64 * 0.00005)).collect();
/// let simplified = simplify(&path, 0.0001);
/// assert_eq!(simplified, vec![path[0], path[4]]);
/// ```
pub fn simplify(path: &[Coordinate], tolerance: f64) -> Vec<Coordinate> {
    if path.len() < 3 {
        return path.to_vec();
    }

    let last = path.len() - 1;
    let mut keep = vec![false; path.len()];
    keep[0] = true;
    keep[last] = true;

    let mut stack = vec![(0, last)];
    while let Some((start, end)) = stack.pop() {
        if let Some((index, dist)) = farthest_interior(path, start, end) {
            if dist > tolerance {
                trace!(start, end, index, dist, "Splitting span");
                keep[index] = true;
                stack.push((index, end));
                stack.push((start, index));
            }
        }
    }

    let simplified: Vec<Coordinate> = path
        .iter()
        .zip(&keep)
        .filter_map(|(coord, &kept)| kept.then_some(*coord))
        .collect();

    debug!(input = path.len(), output = simplified.len(), tolerance, "Simplified path");
    simplified
}

/// Interior point of `path[start..=end]` farthest from the chord, with its
/// distance. `None` when the span has no interior point or every interior
/// point lies on the chord.
///
/// Ties resolve to the earliest index.
fn farthest_interior(path: &[Coordinate], start: usize, end: usize) -> Option<(usize, f64)> {
    let (first, last) = (path[start], path[end]);
    let mut best: Option<(usize, f64)> = None;

    for (idx, point) in path.iter().enumerate().take(end).skip(start + 1) {
        let dist = perpendicular_distance(point, &first, &last);
        if dist > best.map_or(0.0, |(_, d)| d) {
            best = Some((idx, dist));
        }
    }

    best
}

/// Distance from `point` to the infinite line through `start` and `end`,
/// with latitude as x and longitude as y. Falls back to point distance when
/// the chord is degenerate.
fn perpendicular_distance(point: &Coordinate, start: &Coordinate, end: &Coordinate) -> f64 {
    let (x, y) = (point.latitude, point.longitude);
    let (x1, y1) = (start.latitude, start.longitude);
    let (x2, y2) = (end.latitude, end.longitude);

    let dx = x2 - x1;
    let dy = y2 - y1;
    let length = dx.hypot(dy);

    if length == 0.0 {
        return (x - x1).hypot(y - y1);
    }

    (dy * x - dx * y + x2 * y1 - y2 * x1).abs() / length
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon)
    }

    #[test]
    fn test_collinear_points_collapse() {
        let path: Vec<_> = (0..5).map(|i| c(0.0, i as f64 * 0.00005)).collect();
        let simplified = simplify(&path, 0.0001);
        assert_eq!(simplified, vec![c(0.0, 0.0), c(0.0, 0.0002)]);
    }

    #[test]
    fn test_short_paths_unchanged() {
        assert!(simplify(&[], 0.0001).is_empty());
        assert_eq!(simplify(&[c(0.0, 0.0)], 0.0001), vec![c(0.0, 0.0)]);

        let pair = vec![c(0.0, 0.0), c(1.0, 1.0)];
        assert_eq!(simplify(&pair, 0.0001), pair);
    }

    #[test]
    fn test_corner_is_kept() {
        let path = vec![c(0.0, 0.0), c(0.0, 0.5), c(0.0, 1.0), c(0.5, 1.0), c(1.0, 1.0)];
        let simplified = simplify(&path, 0.01);
        assert_eq!(simplified, vec![c(0.0, 0.0), c(0.0, 1.0), c(1.0, 1.0)]);
    }

    #[test]
    fn test_small_wiggle_removed_large_kept() {
        let path = vec![
            c(0.0, 0.0),
            c(0.00001, 0.001),
            c(0.0, 0.002),
            c(0.01, 0.003),
            c(0.0, 0.004),
        ];
        let simplified = simplify(&path, 0.0001);
        assert_eq!(simplified, vec![c(0.0, 0.0), c(0.0, 0.002), c(0.01, 0.003), c(0.0, 0.004)]);
    }

    #[test]
    fn test_closed_loop_uses_point_distance() {
        // first == last, so the chord is degenerate
        let path = vec![c(0.0, 0.0), c(1.0, 0.0), c(1.0, 1.0), c(0.0, 0.0)];
        let simplified = simplify(&path, 0.1);
        assert_eq!(simplified.first(), Some(&c(0.0, 0.0)));
        assert_eq!(simplified.last(), Some(&c(0.0, 0.0)));
        assert!(simplified.contains(&c(1.0, 1.0)));
    }

    #[test]
    fn test_negative_tolerance_terminates() {
        let path: Vec<_> = (0..4).map(|i| c(0.0, i as f64)).collect();
        assert_eq!(simplify(&path, -1.0), vec![c(0.0, 0.0), c(0.0, 3.0)]);
    }

    #[test]
    fn test_dense_arc_keeps_every_point() {
        // Half circle of radius 10°. The smallest possible deviation from any
        // chord is the two-step sagitta, about 4.9e-7°.
        let n = 10_000;
        let step = std::f64::consts::PI / n as f64;
        let path: Vec<_> = (0..n)
            .map(|i| {
                let theta = i as f64 * step;
                c(45.0 + 10.0 * theta.cos(), 90.0 + 10.0 * theta.sin())
            })
            .collect();

        let simplified = simplify(&path, 1e-7);
        assert_eq!(simplified, path);
    }

    #[test]
    fn test_dense_arc_collapses_above_sagitta() {
        let n = 10_000;
        let step = std::f64::consts::PI / n as f64;
        let path: Vec<_> = (0..n)
            .map(|i| {
                let theta = i as f64 * step;
                c(45.0 + 10.0 * theta.cos(), 90.0 + 10.0 * theta.sin())
            })
            .collect();

        let simplified = simplify(&path, 0.01);
        assert!(simplified.len() > 2);
        assert!(simplified.len() < path.len() / 10);
        assert_eq!(simplified.first(), path.first());
        assert_eq!(simplified.last(), path.last());
    }

    #[test]
    fn test_perpendicular_distance() {
        let d = perpendicular_distance(&c(1.0, 0.5), &c(0.0, 0.0), &c(0.0, 1.0));
        assert!((d - 1.0).abs() < 1e-12);
    }

    fn path() -> impl Strategy<Value = Vec<Coordinate>> {
        prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 0..60)
            .prop_map(|pts| pts.into_iter().map(|(lat, lon)| c(lat, lon)).collect())
    }

    proptest! {
        #[test]
        fn prop_endpoints_and_length(input in path(), tolerance in 0.0f64..0.5) {
            let output = simplify(&input, tolerance);
            prop_assert!(output.len() <= input.len());
            prop_assert_eq!(output.first(), input.first());
            prop_assert_eq!(output.last(), input.last());
            if input.len() >= 3 {
                prop_assert!(output.len() >= 2);
            }
        }

        #[test]
        fn prop_output_is_ordered_subsequence(input in path(), tolerance in 0.0f64..0.5) {
            let output = simplify(&input, tolerance);
            let mut remaining = input.iter();
            for point in &output {
                prop_assert!(remaining.any(|p| p == point));
            }
        }
    }
}
