//! Flight statistics and track segmentation over timestamped photo positions.

use crate::{distance, Coordinate, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A photo position at the moment it was taken.
///
/// `coordinate` is `None` for photos without usable GPS metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampedPoint {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    #[serde(default)]
    pub altitude: Option<f64>,
}

impl TimestampedPoint {
    /// Creates a point with a known position.
    pub fn new(timestamp: DateTime<Utc>, coordinate: Coordinate) -> Self {
        Self { timestamp, coordinate: Some(coordinate), altitude: None }
    }

    /// Creates a point for a photo without GPS data.
    pub fn without_coordinate(timestamp: DateTime<Utc>) -> Self {
        Self { timestamp, coordinate: None, altitude: None }
    }
}

/// Summary of a single flight.
///
/// `date_start` and `date_end` serialize as `null` when no points were given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightStats {
    pub total_distance_meters: f64,
    pub total_photos: usize,
    pub date_start: Option<DateTime<Utc>>,
    pub date_end: Option<DateTime<Utc>>,
    pub total_duration_seconds: f64,
}

impl FlightStats {
    /// Stats for a flight with no photos.
    pub fn empty() -> Self {
        Self {
            total_distance_meters: 0.0,
            total_photos: 0,
            date_start: None,
            date_end: None,
            total_duration_seconds: 0.0,
        }
    }
}

impl Default for FlightStats {
    fn default() -> Self {
        Self::empty()
    }
}

/// Summarizes a flight: distance along the time-ordered positions, photo
/// count, first/last timestamps and duration.
///
/// Points are sorted by timestamp (stable, so ties keep input order). Each
/// consecutive pair where both sides have a coordinate contributes its
/// haversine distance; a pair with a missing side contributes nothing, and
/// the next pair measures from its own predecessor rather than bridging the gap.
///
/// # Errors
/// `InvalidCoordinate` if any present coordinate is out of range. An empty
/// input is not an error and yields [`FlightStats::empty`].
#[instrument(skip_all, fields(points = points.len()))]
pub fn aggregate(points: &[TimestampedPoint]) -> Result<FlightStats> {
    if points.is_empty() {
        return Ok(FlightStats::empty());
    }

    for coord in points.iter().filter_map(|p| p.coordinate) {
        coord.validate()?;
    }

    let sorted = sorted_by_time(points.iter());

    let mut total_distance_meters = 0.0;
    for pair in sorted.windows(2) {
        if let (Some(a), Some(b)) = (pair[0].coordinate, pair[1].coordinate) {
            total_distance_meters += distance(a, b)?;
        }
    }

    let start = sorted[0].timestamp;
    let end = sorted[sorted.len() - 1].timestamp;

    let stats = FlightStats {
        total_distance_meters,
        total_photos: points.len(),
        date_start: Some(start),
        date_end: Some(end),
        total_duration_seconds: seconds_between(start, end),
    };

    debug!(
        distance_m = stats.total_distance_meters,
        duration_s = stats.total_duration_seconds,
        "Aggregated flight stats"
    );
    Ok(stats)
}

/// Limits that decide where one displayed track ends and the next begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSegmentation {
    /// Longest time a track may span, measured from its first point
    pub max_window: TimeDelta,
    /// Farthest a point may be from the track's first point, in meters
    pub max_radius_meters: f64,
}

impl Default for PathSegmentation {
    fn default() -> Self {
        Self {
            max_window: TimeDelta::minutes(30),
            max_radius_meters: 6_000.0,
        }
    }
}

/// Splits timestamped points into separate flight tracks for display.
///
/// Points without a coordinate are ignored; the rest are taken in timestamp
/// order. A point starts a new track when it falls outside the current
/// track's time window or radius, both measured from the track's first
/// point. Single-point tracks are dropped.
///
/// # Errors
/// `InvalidCoordinate` if any present coordinate is out of range.
#[instrument(skip_all, fields(points = points.len()))]
pub fn segment_paths(
    points: &[TimestampedPoint],
    limits: &PathSegmentation,
) -> Result<Vec<Vec<Coordinate>>> {
    let located: Vec<(DateTime<Utc>, Coordinate)> = sorted_by_time(points.iter())
        .into_iter()
        .filter_map(|p| p.coordinate.map(|c| (p.timestamp, c)))
        .collect();

    let mut paths = Vec::new();
    let mut current: Vec<Coordinate> = Vec::new();
    let mut origin: Option<(DateTime<Utc>, Coordinate)> = None;

    for (timestamp, coord) in located {
        coord.validate()?;

        let continues = match origin {
            Some((start_time, start_coord)) => {
                timestamp - start_time <= limits.max_window
                    && distance(start_coord, coord)? <= limits.max_radius_meters
            }
            None => false,
        };

        if !continues {
            if current.len() > 1 {
                paths.push(std::mem::take(&mut current));
            }
            current.clear();
            origin = Some((timestamp, coord));
        }
        current.push(coord);
    }

    if current.len() > 1 {
        paths.push(current);
    }

    debug!(paths = paths.len(), "Segmented flight paths");
    Ok(paths)
}

fn sorted_by_time<'a>(points: impl Iterator<Item = &'a TimestampedPoint>) -> Vec<&'a TimestampedPoint> {
    let mut sorted: Vec<_> = points.collect();
    sorted.sort_by_key(|p| p.timestamp);
    sorted
}

fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start)
        .to_std()
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeoError;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_empty_input() {
        let stats = aggregate(&[]).unwrap();
        assert_eq!(stats, FlightStats::empty());
        assert!(stats.date_start.is_none());
        assert!(stats.date_end.is_none());
    }

    #[test]
    fn test_two_points_one_minute_apart() {
        let points = vec![
            TimestampedPoint::new(at(0), Coordinate::new(46.0, 7.0)),
            TimestampedPoint::new(at(60), Coordinate::new(46.001, 7.0)),
        ];
        let stats = aggregate(&points).unwrap();

        assert_eq!(stats.total_duration_seconds, 60.0);
        assert!(stats.total_distance_meters > 100.0 && stats.total_distance_meters < 120.0);
        assert_eq!(stats.total_photos, 2);
        assert_eq!(stats.date_start, Some(at(0)));
        assert_eq!(stats.date_end, Some(at(60)));
    }

    #[test]
    fn test_single_point() {
        let stats = aggregate(&[TimestampedPoint::new(at(5), Coordinate::new(1.0, 1.0))]).unwrap();
        assert_eq!(stats.total_duration_seconds, 0.0);
        assert_eq!(stats.total_distance_meters, 0.0);
        assert_eq!(stats.date_start, stats.date_end);
    }

    #[test]
    fn test_out_of_order_points_are_sorted() {
        let a = TimestampedPoint::new(at(0), Coordinate::new(0.0, 0.0));
        let b = TimestampedPoint::new(at(10), Coordinate::new(0.0, 0.001));
        let c = TimestampedPoint::new(at(20), Coordinate::new(0.0, 0.002));

        let ordered = aggregate(&[a.clone(), b.clone(), c.clone()]).unwrap();
        let shuffled = aggregate(&[c, a, b]).unwrap();

        assert_eq!(ordered, shuffled);
        assert_eq!(shuffled.total_duration_seconds, 20.0);
    }

    #[test]
    fn test_missing_coordinate_breaks_pairs() {
        // A -> gap -> C: neither (A, gap) nor (gap, C) counts, and A is not
        // bridged to C.
        let points = vec![
            TimestampedPoint::new(at(0), Coordinate::new(0.0, 0.0)),
            TimestampedPoint::without_coordinate(at(10)),
            TimestampedPoint::new(at(20), Coordinate::new(0.0, 1.0)),
            TimestampedPoint::new(at(30), Coordinate::new(0.0, 1.001)),
        ];
        let stats = aggregate(&points).unwrap();

        let last_leg = distance(Coordinate::new(0.0, 1.0), Coordinate::new(0.0, 1.001)).unwrap();
        assert!((stats.total_distance_meters - last_leg).abs() < 1e-9);
        assert_eq!(stats.total_photos, 4);
        assert_eq!(stats.total_duration_seconds, 30.0);
    }

    #[test]
    fn test_invalid_coordinate_rejected() {
        let points = vec![
            TimestampedPoint::new(at(0), Coordinate::new(0.0, 0.0)),
            TimestampedPoint::new(at(1), Coordinate::new(0.0, 200.0)),
        ];
        assert!(matches!(aggregate(&points), Err(GeoError::InvalidCoordinate { .. })));
    }

    #[test]
    fn test_stats_serialize_null_dates() {
        let json = serde_json::to_value(FlightStats::empty()).unwrap();
        assert!(json["date_start"].is_null());
        assert!(json["date_end"].is_null());
        assert_eq!(json["total_photos"], 0);
    }

    #[test]
    fn test_stats_serialize_rfc3339_dates() {
        let stats = aggregate(&[TimestampedPoint::new(at(0), Coordinate::new(0.0, 0.0))]).unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["date_start"], "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_segment_splits_on_time_window() {
        let points = vec![
            TimestampedPoint::new(at(0), Coordinate::new(0.0, 0.0)),
            TimestampedPoint::new(at(60), Coordinate::new(0.0, 0.001)),
            TimestampedPoint::new(at(3_600), Coordinate::new(0.0, 0.002)),
            TimestampedPoint::new(at(3_660), Coordinate::new(0.0, 0.003)),
        ];
        let paths = segment_paths(&points, &PathSegmentation::default()).unwrap();

        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.001)]);
        assert_eq!(paths[1], vec![Coordinate::new(0.0, 0.002), Coordinate::new(0.0, 0.003)]);
    }

    #[test]
    fn test_segment_splits_on_radius_and_drops_singletons() {
        let points = vec![
            TimestampedPoint::new(at(0), Coordinate::new(0.0, 0.0)),
            TimestampedPoint::new(at(10), Coordinate::new(0.0, 0.01)),
            // ~11 km from the track origin
            TimestampedPoint::new(at(20), Coordinate::new(0.0, 0.1)),
            TimestampedPoint::without_coordinate(at(25)),
        ];
        let paths = segment_paths(&points, &PathSegmentation::default()).unwrap();

        assert_eq!(paths, vec![vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.01)]]);
    }

    #[test]
    fn test_segment_empty() {
        assert!(segment_paths(&[], &PathSegmentation::default()).unwrap().is_empty());
    }

    fn points() -> impl Strategy<Value = Vec<TimestampedPoint>> {
        prop::collection::vec((0i64..10_000, -1.0f64..1.0, -1.0f64..1.0), 1..30).prop_map(|raw| {
            raw.into_iter()
                .map(|(t, lat, lon)| TimestampedPoint::new(at(t), Coordinate::new(lat, lon)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_reversal_keeps_duration_and_count(input in points()) {
            let mut reversed = input.clone();
            reversed.reverse();

            let a = aggregate(&input).unwrap();
            let b = aggregate(&reversed).unwrap();
            prop_assert_eq!(a.total_duration_seconds, b.total_duration_seconds);
            prop_assert_eq!(a.total_photos, b.total_photos);
            prop_assert!(a.total_distance_meters >= 0.0);
            prop_assert!(a.date_start <= a.date_end);
        }
    }
}
