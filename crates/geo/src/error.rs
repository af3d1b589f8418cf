//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
///
/// Range checks fail loudly; empty collections handed to clustering or
/// aggregation are not errors and produce empty results instead.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Latitude outside [-90, 90] or longitude outside [-180, 180]
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate {
        /// Offending latitude
        latitude: f64,
        /// Offending longitude
        longitude: f64,
    },

    /// An operation that needs at least one coordinate got none
    #[error("Empty input: {0} requires at least one coordinate")]
    EmptyInput(&'static str),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Error code for integration with skytrace-core error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Invalid coordinate values
    InvalidCoordinate = 10002,
    /// JSON parsing error
    JsonParsing = 10003,
    /// Empty coordinate sequence
    EmptyInput = 10004,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidCoordinate { .. } => GeoErrorCode::InvalidCoordinate,
            GeoError::EmptyInput(_) => GeoErrorCode::EmptyInput,
            GeoError::JsonError(_) => GeoErrorCode::JsonParsing,
        }
    }
}
