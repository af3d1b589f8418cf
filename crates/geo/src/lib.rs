//! Geospatial engine for drone photo maps.
//!
//! This crate provides:
//! - Haversine distance, initial bearing, bounding box and center calculations
//! - Greedy proximity clustering of photo locations into map markers
//! - Ramer-Douglas-Peucker path simplification
//! - Flight statistics, track segmentation and point filters
//! - Batch aggregation with optional parallelism
//!
//! Everything here is pure and synchronous: callers hand in plain records and
//! get plain records back, so every function is safe to call concurrently on
//! independent inputs.
//!
//! # Example
//!
//! ```
//! use skytrace_geo::{distance, Coordinate};
//!
//! let san_francisco = Coordinate::new(37.7749, -122.4194);
//! let new_york = Coordinate::new(40.7128, -74.0060);
//!
//! let meters = distance(san_francisco, new_york).unwrap();
//! assert!((meters / 1000.0 - 4130.0).abs() < 50.0);
//! ```

mod bounds;
mod error;
mod haversine;
pub mod batch;
pub mod cluster;
pub mod filter;
pub mod flight;
pub mod simplify;

pub use batch::{parse_records, summarize_flights};
pub use bounds::{bounds, center, Bounds};
pub use cluster::{cluster, ClusterResult, Marker, PhotoId, PhotoMetadataRecord, DEFAULT_CLUSTER_RADIUS_M};
pub use error::{GeoError, GeoErrorCode, Result};
pub use filter::{filter_by_bounds, filter_by_date_range, PointFilter};
pub use flight::{aggregate, segment_paths, FlightStats, PathSegmentation, TimestampedPoint};
pub use haversine::{
    bearing, distance, distance_km, haversine_distance, haversine_distance_meters, EARTH_RADIUS_KM,
    EARTH_RADIUS_M,
};
pub use simplify::simplify;

/// A geographic coordinate with latitude and longitude.
///
/// Plain value type: copied, compared by content, never shared.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the coordinate has valid values.
    ///
    /// NaN in either axis is invalid.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Returns the coordinate unchanged if valid, `InvalidCoordinate` otherwise.
    #[inline]
    pub fn validate(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(GeoError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_creation() {
        let coord = Coordinate::new(37.7749, -122.4194);
        assert_eq!(coord.latitude, 37.7749);
        assert_eq!(coord.longitude, -122.4194);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_validate_returns_error() {
        let err = Coordinate::new(0.0, -181.0).validate().unwrap_err();
        assert!(matches!(err, GeoError::InvalidCoordinate { longitude, .. } if longitude == -181.0));
    }

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (52.5200, 13.4050).into();
        assert_eq!(coord.latitude, 52.5200);
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Coordinate::new(1.0, 2.0), Coordinate::new(1.0, 2.0));
        assert_ne!(Coordinate::new(1.0, 2.0), Coordinate::new(2.0, 1.0));
    }
}
