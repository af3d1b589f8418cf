//! Batch processing over many flights with optional parallelism.
//!
//! Each flight is independent, so with the `parallel` feature they are
//! aggregated on the rayon pool; results keep the input order either way.

use crate::{aggregate, FlightStats, Result, TimestampedPoint};
use serde::de::DeserializeOwned;

/// Aggregates every flight in `flights`.
///
/// # Errors
/// `InvalidCoordinate` if any flight holds an out-of-range coordinate; no
/// partial results are returned.
///
/// # Example
/// ```
/// use skytrace_geo::{summarize_flights, Coordinate, TimestampedPoint};
/// use chrono::{TimeZone, Utc};
///
/// let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
/// let flights = vec![
///     vec![TimestampedPoint::new(t0, Coordinate::new(46.0, 7.0))],
///     vec![],
/// ];
/// let stats = summarize_flights(&flights).unwrap();
/// assert_eq!(stats[0].total_photos, 1);
/// assert_eq!(stats[1].total_photos, 0);
/// ```
pub fn summarize_flights<P>(flights: &[P]) -> Result<Vec<FlightStats>>
where
    P: AsRef<[TimestampedPoint]> + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        flights
            .par_iter()
            .map(|flight| aggregate(flight.as_ref()))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        flights
            .iter()
            .map(|flight| aggregate(flight.as_ref()))
            .collect()
    }
}

/// Decodes a JSON array of records (photos, points, coordinates).
///
/// # Errors
/// `JsonError` if `json` is not an array of `T`.
///
/// # Example
/// ```
/// use skytrace_geo::{parse_records, Coordinate};
///
/// let path: Vec<Coordinate> =
///     parse_records(r#"[{"latitude": 1.0, "longitude": 2.0}]"#).unwrap();
/// assert_eq!(path, vec![Coordinate::new(1.0, 2.0)]);
/// ```
pub fn parse_records<T: DeserializeOwned>(json: &str) -> Result<Vec<T>> {
    Ok(serde_json::from_str(json)?)
}
