//! `slot` CLI — compute candidate grids, availability heatmaps, and meeting
//! suggestions from a JSON meeting request.
//!
//! ## Usage
//!
//! ```sh
//! # List the candidate slots of a request (stdin → stdout)
//! cat request.json | slot grid
//!
//! # Heatmap in a viewer's zone
//! slot heatmap -i request.json --timezone Asia/Tokyo
//!
//! # Best five slots where at least 60% can attend
//! slot suggest -i request.json --limit 5 --min-pct 60
//!
//! # Normalize a timestamp to UTC
//! slot normalize 2024-01-01T09:00:00+07:00
//! ```

mod config;
mod request;

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use slot_engine::grid::generate_grid_with_policy;
use slot_engine::heatmap::project_window;
use slot_engine::{aggregate_window, timezone, top_suggestions, DstPolicy, SuggestionFilter};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::request::MeetingRequest;

#[derive(Parser)]
#[command(
    name = "slot",
    version,
    about = "Group meeting slot finder: grids, heatmaps, and suggestions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML file with default settings
    #[arg(long, global = true, env = "SLOT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the candidate slots of a meeting window as JSON
    Grid {
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// How slot starts inside a DST gap are handled
        #[arg(long, value_enum)]
        dst_policy: Option<DstArg>,
    },
    /// Print the availability heatmap in a viewer's time zone
    Heatmap {
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Viewer IANA time zone (defaults to the window's zone)
        #[arg(long)]
        timezone: Option<String>,
        /// How slot starts inside a DST gap are handled
        #[arg(long, value_enum)]
        dst_policy: Option<DstArg>,
    },
    /// Print the best slots, most participants first
    Suggest {
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Maximum number of suggestions
        #[arg(long)]
        limit: Option<usize>,
        /// Minimum share of participants available, in percent
        #[arg(long)]
        min_pct: Option<f64>,
        /// How slot starts inside a DST gap are handled
        #[arg(long, value_enum)]
        dst_policy: Option<DstArg>,
    },
    /// Normalize a timestamp to a UTC instant (naive input is read as UTC)
    Normalize {
        timestamp: String,
        /// IANA zone the timestamp was submitted in
        #[arg(long, default_value = "UTC")]
        timezone: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DstArg {
    Skip,
    ShiftForward,
}

impl From<DstArg> for DstPolicy {
    fn from(arg: DstArg) -> Self {
        match arg {
            DstArg::Skip => DstPolicy::Skip,
            DstArg::ShiftForward => DstPolicy::ShiftForward,
        }
    }
}

#[derive(Serialize)]
struct SuggestionDto {
    start: String,
    end: String,
    available_count: usize,
    total_participants: usize,
    percentage: f64,
    level: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::default(),
    };

    let output = match cli.command {
        Commands::Grid { input, dst_policy } => {
            let request = read_request(input.as_deref())?;
            let policy = dst_policy.map(DstPolicy::from).unwrap_or(config.grid.dst_policy);
            let grid = generate_grid_with_policy(&request.window, policy)
                .context("Failed to build the candidate grid")?;
            let slots: Vec<_> = grid.iter().collect();
            tracing::debug!(
                zone = %grid.time_zone(),
                policy = ?grid.dst_policy(),
                slots = slots.len(),
                "listed candidate slots"
            );
            serde_json::to_string_pretty(&slots)?
        }
        Commands::Heatmap {
            input,
            timezone,
            dst_policy,
        } => {
            let request = read_request(input.as_deref())?;
            let policy = dst_policy.map(DstPolicy::from).unwrap_or(config.grid.dst_policy);
            let viewer = timezone
                .or(config.heatmap.timezone)
                .unwrap_or_else(|| request.window.time_zone.clone());

            let index = request.busy_index().context("Failed to read busy slots")?;
            let aggregated = aggregate_window(&request.window, &index, policy)
                .context("Failed to aggregate availability")?;
            let heatmap = project_window(&request.window, &aggregated, &viewer, policy)
                .context("Failed to project heatmap")?;
            serde_json::to_string_pretty(&heatmap)?
        }
        Commands::Suggest {
            input,
            limit,
            min_pct,
            dst_policy,
        } => {
            let request = read_request(input.as_deref())?;
            let policy = dst_policy.map(DstPolicy::from).unwrap_or(config.grid.dst_policy);
            let filter = SuggestionFilter {
                limit: limit.unwrap_or(config.suggestions.limit),
                min_percentage: min_pct.unwrap_or(config.suggestions.min_percentage),
            };

            let index = request.busy_index().context("Failed to read busy slots")?;
            let aggregated = aggregate_window(&request.window, &index, policy)
                .context("Failed to aggregate availability")?;
            let dtos: Vec<SuggestionDto> = top_suggestions(&aggregated, filter)
                .iter()
                .map(|s| SuggestionDto {
                    start: s.slot.start.to_rfc3339(),
                    end: s.slot.end.to_rfc3339(),
                    available_count: s.available_count,
                    total_participants: s.total_participants,
                    percentage: s.percentage(),
                    level: s.level(),
                })
                .collect();
            serde_json::to_string_pretty(&dtos)?
        }
        Commands::Normalize {
            timestamp,
            timezone: zone,
        } => timezone::normalize(&timestamp, &zone)
            .with_context(|| format!("Failed to normalize '{}'", timestamp))?
            .to_rfc3339(),
    };

    println!("{}", output);
    Ok(())
}

fn read_request(path: Option<&str>) -> Result<MeetingRequest> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).context("Failed to parse meeting request JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
