//! skytrace: map markers, flight statistics and flight paths from photo GPS exports.

mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use chrono::TimeDelta;
use output::{format_count, format_distance, format_duration, Status};
use owo_colors::OwoColorize;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use skytrace_core::{config::Config, exit_codes};
use skytrace_geo::{
    aggregate, bounds, center, cluster, parse_records, segment_paths, simplify, summarize_flights,
    Coordinate, FlightStats, GeoError, Marker, PathSegmentation, PhotoMetadataRecord, TimestampedPoint,
};
use skytrace_telemetry::{timed_span, TelemetryConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "skytrace")]
#[command(about = "Drone photo map engine: markers, flight stats and paths")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to .skytrace.toml when present)
    #[arg(long, global = true, env = "SKYTRACE_CONFIG")]
    config: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group photo locations into map markers
    Cluster {
        /// JSON array of photo records
        input: PathBuf,
        /// Merge radius in meters (overrides config)
        #[arg(long)]
        radius: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize a flight: distance, duration, photo count
    Stats {
        /// JSON array of timestamped points
        input: PathBuf,
        /// Input is an array of flights, each an array of points
        #[arg(long)]
        flights: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reduce a coordinate path for display
    Simplify {
        /// JSON array of coordinates, in path order
        input: PathBuf,
        /// Tolerance in degrees (overrides config)
        #[arg(long)]
        tolerance: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Split timestamped points into simplified flight tracks
    Paths {
        /// JSON array of timestamped points
        input: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Bounding box and center of a coordinate list
    Bounds {
        /// JSON array of coordinates
        input: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            Status::error(&format!("{:#}", err));
            ExitCode::from(exit_code_for(&err) as u8)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let settings = &config.schema;

    skytrace_telemetry::init_with_config(TelemetryConfig {
        log_level: if cli.verbose { "debug".to_string() } else { settings.logging.level.clone() },
        json: settings.logging.json,
        ..TelemetryConfig::default()
    })?;
    tracing::debug!(config = config.path.as_deref().unwrap_or("defaults"), "Configuration loaded");

    match cli.command {
        Commands::Cluster { input, radius, json } => {
            timed_span!("cluster");
            let radius = positive_override("--radius", radius)?.unwrap_or(settings.clustering.radius_meters);
            let photos: Vec<PhotoMetadataRecord> = read_records(&input)?;

            let clusters = cluster(&photos, radius)?;
            let markers: Vec<Marker> = clusters.iter().map(|c| Marker::from_cluster(c, radius)).collect();

            if json {
                print_json(&json!({
                    "radius_meters": radius,
                    "clusters": clusters,
                    "markers": markers,
                }))?;
            } else {
                Status::header("Markers");
                for (marker, group) in markers.iter().zip(&clusters) {
                    let count = format_count(marker.photos_count, "photo", "photos");
                    let count = if marker.is_clustered { count.cyan().to_string() } else { count };
                    println!(
                        "  {:>11.6}, {:>11.6}  {}  {}",
                        marker.latitude,
                        marker.longitude,
                        count,
                        format!("{:?}", group.member_ids).dimmed()
                    );
                }
                Status::success(&format!(
                    "{} from {}",
                    format_count(markers.len(), "marker", "markers"),
                    format_count(photos.len(), "photo", "photos")
                ));
            }
        }

        Commands::Stats { input, flights, json } => {
            timed_span!("stats");
            let stats: Vec<FlightStats> = if flights {
                let flights: Vec<Vec<TimestampedPoint>> = read_records(&input)?;
                summarize_flights(&flights)?
            } else {
                let points: Vec<TimestampedPoint> = read_records(&input)?;
                vec![aggregate(&points)?]
            };

            if json {
                if flights {
                    print_json(&stats)?;
                } else {
                    print_json(&stats[0])?;
                }
            } else {
                for (i, s) in stats.iter().enumerate() {
                    Status::header(&if flights { format!("Flight {}", i + 1) } else { "Flight".to_string() });
                    print_stats(s);
                }
            }
        }

        Commands::Simplify { input, tolerance, json } => {
            timed_span!("simplify");
            let tolerance = non_negative_override("--tolerance", tolerance)?.unwrap_or(settings.simplify.tolerance);
            let path: Vec<Coordinate> = read_records(&input)?;

            let simplified = simplify(&path, tolerance);

            if json {
                print_json(&simplified)?;
            } else {
                Status::success(&format!(
                    "Simplified {} to {} at tolerance {}°",
                    format_count(path.len(), "point", "points"),
                    simplified.len(),
                    tolerance
                ));
            }
        }

        Commands::Paths { input, json } => {
            timed_span!("paths");
            let points: Vec<TimestampedPoint> = read_records(&input)?;
            let limits = PathSegmentation {
                max_window: TimeDelta::seconds(i64::try_from(settings.paths.max_window_secs).unwrap_or(i64::MAX)),
                max_radius_meters: settings.paths.max_radius_meters,
            };

            let tracks: Vec<Vec<Coordinate>> = segment_paths(&points, &limits)?
                .iter()
                .map(|track| simplify(track, settings.simplify.tolerance))
                .collect();

            if json {
                print_json(&tracks)?;
            } else {
                Status::header("Flight paths");
                for (i, track) in tracks.iter().enumerate() {
                    Status::field(&format!("Track {}", i + 1), format_count(track.len(), "point", "points"));
                }
                Status::success(&format!(
                    "{} from {}",
                    format_count(tracks.len(), "track", "tracks"),
                    format_count(points.len(), "photo", "photos")
                ));
            }
        }

        Commands::Bounds { input, json } => {
            timed_span!("bounds");
            let coords: Vec<Coordinate> = read_records(&input)?;
            let b = bounds(&coords)?;
            let mid = center(&coords)?;

            if json {
                print_json(&json!({ "bounds": b, "center": mid }))?;
            } else {
                Status::header("Bounds");
                Status::field("Latitude", format!("{} .. {}", b.min_lat, b.max_lat));
                Status::field("Longitude", format!("{} .. {}", b.min_lon, b.max_lon));
                Status::field("Center", format!("{:.6}, {:.6}", mid.latitude, mid.longitude));
            }
        }
    }

    Ok(())
}

fn print_stats(stats: &FlightStats) {
    Status::field("Photos", stats.total_photos);
    Status::field("Distance", format_distance(stats.total_distance_meters));
    Status::field("Duration", format_duration(stats.total_duration_seconds));
    match (stats.date_start, stats.date_end) {
        (Some(start), Some(end)) => {
            Status::field("Start", start.to_rfc3339());
            Status::field("End", end.to_rfc3339());
        }
        _ => Status::field("Dates", "none".dimmed()),
    }
}

/// Reads and decodes a JSON array file.
fn read_records<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => skytrace_core::Error::file_not_found(path),
        _ => skytrace_core::Error::from(e),
    })?;

    let records: Vec<T> = parse_records(&text)
        .with_context(|| format!("Failed to decode {}", path.display()))?;

    tracing::debug!(path = %path.display(), records = records.len(), "Loaded input");
    Ok(records)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn positive_override(flag: &str, value: Option<f64>) -> skytrace_core::Result<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(skytrace_core::Error::invalid_input(format!(
            "{} must be a positive number, got {}",
            flag, v
        ))),
        other => Ok(other),
    }
}

fn non_negative_override(flag: &str, value: Option<f64>) -> skytrace_core::Result<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(skytrace_core::Error::invalid_input(format!(
            "{} must be zero or a positive number, got {}",
            flag, v
        ))),
        other => Ok(other),
    }
}

/// Process exit status for a failed command.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(core) = err.downcast_ref::<skytrace_core::Error>() {
        return core.exit_code();
    }
    if err.downcast_ref::<GeoError>().is_some() {
        return exit_codes::VALIDATION_ERROR;
    }
    exit_codes::FAILURE
}
