//! Bounding box and center of a coordinate set.

use crate::{Coordinate, GeoError, Result};
use serde::{Deserialize, Serialize};

/// Axis-aligned latitude/longitude box, used for map framing and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Returns true if `coord` lies inside the box, edges included.
    #[inline]
    pub fn contains(&self, coord: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coord.latitude)
            && (self.min_lon..=self.max_lon).contains(&coord.longitude)
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// Calculates the bounding box of a non-empty coordinate sequence.
///
/// # Errors
/// `EmptyInput` if `coordinates` is empty.
///
/// # Example
/// ```
/// use skytrace_geo::{bounds, Coordinate};
///
/// let b = bounds(&[
///     Coordinate::new(37.7749, -122.4194),
///     Coordinate::new(37.8044, -122.2712),
/// ]).unwrap();
/// assert_eq!(b.min_lat, 37.7749);
/// assert_eq!(b.max_lon, -122.2712);
/// ```
pub fn bounds(coordinates: &[Coordinate]) -> Result<Bounds> {
    let (first, rest) = coordinates
        .split_first()
        .ok_or(GeoError::EmptyInput("bounds"))?;

    let initial = Bounds {
        min_lat: first.latitude,
        max_lat: first.latitude,
        min_lon: first.longitude,
        max_lon: first.longitude,
    };

    Ok(rest.iter().fold(initial, |b, c| Bounds {
        min_lat: b.min_lat.min(c.latitude),
        max_lat: b.max_lat.max(c.latitude),
        min_lon: b.min_lon.min(c.longitude),
        max_lon: b.max_lon.max(c.longitude),
    }))
}

/// Arithmetic mean of latitudes and of longitudes.
///
/// This is not a geodesic centroid; it is only meaningful for small extents
/// that do not straddle the antimeridian.
///
/// # Errors
/// `EmptyInput` if `coordinates` is empty.
pub fn center(coordinates: &[Coordinate]) -> Result<Coordinate> {
    if coordinates.is_empty() {
        return Err(GeoError::EmptyInput("center"));
    }

    let n = coordinates.len() as f64;
    let (lat_sum, lon_sum) = coordinates
        .iter()
        .fold((0.0, 0.0), |(lat, lon), c| (lat + c.latitude, lon + c.longitude));

    Ok(Coordinate::new(lat_sum / n, lon_sum / n))
}
