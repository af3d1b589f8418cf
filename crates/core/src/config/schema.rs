//! Configuration schema definitions
//!
//! Engine tuning values; every field has a default so a partial file is valid.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    /// Marker clustering
    #[serde(default)]
    pub clustering: ClusteringConfig,

    /// Flight path simplification
    #[serde(default)]
    pub simplify: SimplifyConfig,

    /// Flight track segmentation
    #[serde(default)]
    pub paths: PathsConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Check every section for out-of-range values
    pub fn validate(&self) -> Result<()> {
        let radius = self.clustering.radius_meters;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::invalid_config_value(
                "clustering.radius_meters",
                format!("expected a positive number of meters, got {}", radius),
            ));
        }

        let tolerance = self.simplify.tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(Error::invalid_config_value(
                "simplify.tolerance",
                format!("expected a non-negative number of degrees, got {}", tolerance),
            ));
        }

        if self.paths.max_window_secs == 0 {
            return Err(Error::invalid_config_value(
                "paths.max_window_secs",
                "must be at least one second",
            ));
        }

        let max_radius = self.paths.max_radius_meters;
        if !max_radius.is_finite() || max_radius <= 0.0 {
            return Err(Error::invalid_config_value(
                "paths.max_radius_meters",
                format!("expected a positive number of meters, got {}", max_radius),
            ));
        }

        Ok(())
    }
}

/// Marker clustering configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusteringConfig {
    /// Merge radius in meters
    #[serde(default = "default_radius_meters")]
    pub radius_meters: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            radius_meters: default_radius_meters(),
        }
    }
}

fn default_radius_meters() -> f64 {
    10.0
}

/// Path simplification configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimplifyConfig {
    /// Tolerance in degrees (1e-4 is roughly 11 m)
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
        }
    }
}

fn default_tolerance() -> f64 {
    0.0001
}

/// Flight track segmentation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
    /// Longest span of a single track, from its first photo
    #[serde(default = "default_max_window_secs")]
    pub max_window_secs: u64,

    /// Farthest a photo may be from the track's first photo
    #[serde(default = "default_max_radius_meters")]
    pub max_radius_meters: f64,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            max_window_secs: default_max_window_secs(),
            max_radius_meters: default_max_radius_meters(),
        }
    }
}

fn default_max_window_secs() -> u64 {
    30 * 60
}

fn default_max_radius_meters() -> f64 {
    6_000.0
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let schema = ConfigSchema::default();
        assert_eq!(schema.clustering.radius_meters, 10.0);
        assert_eq!(schema.simplify.tolerance, 0.0001);
        assert_eq!(schema.paths.max_window_secs, 1800);
        assert_eq!(schema.paths.max_radius_meters, 6000.0);
        assert_eq!(schema.logging.level, "info");
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let schema: ConfigSchema = toml::from_str("[clustering]\nradius_meters = 25.0\n").unwrap();
        assert_eq!(schema.clustering.radius_meters, 25.0);
        assert_eq!(schema.simplify.tolerance, 0.0001);
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let mut schema = ConfigSchema::default();
        schema.clustering.radius_meters = 0.0;
        let err = schema.validate().unwrap_err();
        assert!(err.message.contains("clustering.radius_meters"));
    }

    #[test]
    fn test_rejects_negative_tolerance() {
        let mut schema = ConfigSchema::default();
        schema.simplify.tolerance = -0.1;
        assert!(schema.validate().is_err());

        schema.simplify.tolerance = 0.0;
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_window() {
        let mut schema = ConfigSchema::default();
        schema.paths.max_window_secs = 0;
        assert!(schema.validate().is_err());
    }
}
