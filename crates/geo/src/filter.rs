//! Date range and bounding box filters over timestamped points.

use crate::{Bounds, TimestampedPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Keeps points whose timestamp lies within `[start, end]`.
///
/// Either bound may be open. With both open every point is kept.
pub fn filter_by_date_range(
    points: &[TimestampedPoint],
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Vec<TimestampedPoint> {
    points
        .iter()
        .filter(|p| start.is_none_or(|s| p.timestamp >= s))
        .filter(|p| end.is_none_or(|e| p.timestamp <= e))
        .cloned()
        .collect()
}

/// Keeps points whose coordinate lies inside `bounds`, edges included.
///
/// Points without a coordinate are dropped.
pub fn filter_by_bounds(points: &[TimestampedPoint], bounds: &Bounds) -> Vec<TimestampedPoint> {
    points
        .iter()
        .filter(|p| p.coordinate.is_some_and(|c| bounds.contains(&c)))
        .cloned()
        .collect()
}

/// Combined filter, as received from a map view's filter panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointFilter {
    #[serde(default)]
    pub date_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub bounds: Option<Bounds>,
}

impl PointFilter {
    /// Applies the date range first, then the bounding box.
    pub fn apply(&self, points: &[TimestampedPoint]) -> Vec<TimestampedPoint> {
        let dated = filter_by_date_range(points, self.date_start, self.date_end);
        match &self.bounds {
            Some(bounds) => filter_by_bounds(&dated, bounds),
            None => dated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coordinate;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn sample() -> Vec<TimestampedPoint> {
        vec![
            TimestampedPoint::new(at(0), Coordinate::new(1.0, 1.0)),
            TimestampedPoint::new(at(100), Coordinate::new(5.0, 5.0)),
            TimestampedPoint::without_coordinate(at(150)),
            TimestampedPoint::new(at(200), Coordinate::new(20.0, 20.0)),
        ]
    }

    #[test]
    fn test_date_range_inclusive() {
        let kept = filter_by_date_range(&sample(), Some(at(100)), Some(at(200)));
        let times: Vec<_> = kept.iter().map(|p| p.timestamp).collect();
        assert_eq!(times, vec![at(100), at(150), at(200)]);
    }

    #[test]
    fn test_date_range_open_ended() {
        assert_eq!(filter_by_date_range(&sample(), None, None).len(), 4);
        assert_eq!(filter_by_date_range(&sample(), None, Some(at(50))).len(), 1);
        assert_eq!(filter_by_date_range(&sample(), Some(at(201)), None).len(), 0);
    }

    #[test]
    fn test_bounds_drops_missing_coordinates() {
        let bounds = Bounds { min_lat: 0.0, max_lat: 10.0, min_lon: 0.0, max_lon: 10.0 };
        let kept = filter_by_bounds(&sample(), &bounds);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|p| p.coordinate.is_some()));
    }

    #[test]
    fn test_combined_filter() {
        let filter = PointFilter {
            date_start: Some(at(50)),
            date_end: None,
            bounds: Some(Bounds { min_lat: 0.0, max_lat: 10.0, min_lon: 0.0, max_lon: 10.0 }),
        };
        let kept = filter.apply(&sample());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].timestamp, at(100));

        assert_eq!(PointFilter::default().apply(&sample()), sample());
    }
}
