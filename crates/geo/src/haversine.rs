//! Haversine distance and bearing calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes. The checked entry points
//! (`distance`, `distance_km`, `bearing`) validate both coordinates first; the
//! `haversine_*` functions skip validation for callers that already did it.

use crate::{Coordinate, Result};

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two valid coordinates.
///
/// # Errors
/// `InvalidCoordinate` if either input is out of range.
///
/// # Example
/// ```
/// use skytrace_geo::{distance, Coordinate};
///
/// let a = Coordinate::new(0.0, 0.0);
/// let b = Coordinate::new(0.001, 0.0);
/// let meters = distance(a, b).unwrap();
/// assert!((meters - 111.19).abs() < 0.1);
/// ```
#[inline]
pub fn distance(from: Coordinate, to: Coordinate) -> Result<f64> {
    Ok(haversine_distance_meters(&from.validate()?, &to.validate()?))
}

/// Great-circle distance in kilometers between two valid coordinates.
///
/// # Errors
/// `InvalidCoordinate` if either input is out of range.
#[inline]
pub fn distance_km(from: Coordinate, to: Coordinate) -> Result<f64> {
    Ok(haversine_distance(&from.validate()?, &to.validate()?))
}

/// Initial compass bearing in degrees from `from` toward `to`.
///
/// Measured clockwise from true north, in `[0, 360)`. Identical points yield 0.
///
/// # Errors
/// `InvalidCoordinate` if either input is out of range.
pub fn bearing(from: Coordinate, to: Coordinate) -> Result<f64> {
    let (lat1, lon1) = from.validate()?.to_radians();
    let (lat2, lon2) = to.validate()?.to_radians();
    let d_lon = lon2 - lon1;

    let x = d_lon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    let degrees = x.atan2(y).to_degrees().rem_euclid(360.0);
    // rem_euclid can round a tiny negative angle up to exactly 360.0
    Ok(if degrees >= 360.0 { 0.0 } else { degrees })
}

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// Does not validate its inputs.
///
/// # Example
/// ```
/// use skytrace_geo::{haversine_distance, Coordinate};
///
/// let berlin = Coordinate::new(52.5200, 13.4050);
/// let paris = Coordinate::new(48.8566, 2.3522);
///
/// let distance = haversine_distance(&berlin, &paris);
/// assert!((distance - 878.0).abs() < 10.0);
/// ```
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_KM)
}

/// Calculates the great-circle distance between two coordinates in meters.
///
/// Does not validate its inputs.
#[inline]
pub fn haversine_distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_M)
}

#[inline]
fn haversine_distance_with_radius(from: &Coordinate, to: &Coordinate, radius: f64) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // rounding can push antipodal points just past 1.0
    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}
