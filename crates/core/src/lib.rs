//! Core utilities for Skytrace tools
//!
//! This crate provides shared functionality used by the engine front ends:
//!
//! - **Error handling**: Structured errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based engine settings with validation
//!
//! # Example
//!
//! ```rust,no_run
//! use skytrace_core::config::Config;
//!
//! let config = Config::load(None).expect("Invalid configuration");
//! println!("Clustering radius: {} m", config.schema.clustering.radius_meters);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{exit_codes, Error, ErrorCode, Result, ResultExt};
