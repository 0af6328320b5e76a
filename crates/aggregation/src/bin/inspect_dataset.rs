//! Dataset inspector
//!
//! Loads the occupancy dataset, prints its metadata as JSON and optionally
//! the points and demographics of one time slice.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use aggregation::{weight_range, AggregationConfig, DataCache, ShareValidation};
use heatmap_common::Metric;

#[derive(Parser, Debug)]
#[command(name = "inspect-dataset")]
#[command(about = "Load the occupancy dataset and print what it covers")]
struct Args {
    /// Dataset path (defaults to HEATMAP_DATA_PATH or data/data.csv)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Share check policy: trust, warn or reject
    #[arg(long)]
    share_validation: Option<ShareValidation>,

    /// Month (YYYYMM) of the time slice to query
    #[arg(long, requires = "hour")]
    month: Option<u32>,

    /// Hour (0-23) of the time slice to query
    #[arg(long, requires = "month")]
    hour: Option<u8>,

    /// Weighting metric
    #[arg(long, default_value = "avg_total_users")]
    metric: Metric,

    /// Day type of the time slice to query
    #[arg(long, default_value = "平日")]
    day_type: String,

    /// Include every point of the queried slice in the output
    #[arg(long)]
    points: bool,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = AggregationConfig::from_env();
    if let Some(data) = args.data {
        config.data_path = data;
    }
    if let Some(policy) = args.share_validation {
        config.share_validation = policy;
    }

    let cache = DataCache::load_with_config(&config)
        .with_context(|| format!("failed to load {}", config.data_path.display()))?;

    let mut output = json!({ "metadata": cache.get_metadata() });

    if let (Some(month), Some(hour)) = (args.month, args.hour) {
        let points = cache.get_points(month, hour, args.metric, &args.day_type);
        let demographics = cache.get_demographics(month, hour, args.metric, &args.day_type);
        info!(
            month = month,
            hour = hour,
            metric = %args.metric,
            points = points.len(),
            "Queried time slice"
        );

        let mut slice = json!({
            "month": month,
            "hour": hour,
            "day_type": args.day_type,
            "metric": args.metric,
            "point_count": points.len(),
            "weight_range": weight_range(&points),
            "demographics": demographics,
        });
        if args.points {
            slice["points"] = serde_json::to_value(&points)?;
        }
        output["slice"] = slice;
    }

    let stats = cache.coordinate_stats();
    info!(
        entries = stats.entries,
        capacity = stats.capacity,
        "Coordinate cache"
    );

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
