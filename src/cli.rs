use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "farmwise",
    version,
    about = "Crop suitability, rotation and resource planning for farms"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Crop profile table (YAML or JSON), replaces the built-in table
    #[arg(long, global = true)]
    pub crops: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank crops for a growing context
    Recommend {
        /// JSON document with `context` and optional `exclude`
        input: PathBuf,
    },
    /// Suggest next-season crops
    Rotate {
        /// JSON document with `current_crops`
        input: PathBuf,
    },
    /// Split scarce resources between fields
    Allocate {
        /// JSON document with `pool` and `requests`
        input: PathBuf,
    },
    /// Score field resource efficiency against the farm average
    Efficiency {
        /// JSON document with `usage`, `yields` and `fields`
        input: PathBuf,
    },
    /// Project stock levels from recent usage
    Project {
        /// JSON document with `pool`, `usage` and `as_of`
        input: PathBuf,
    },
    /// Monthly usage patterns per resource
    Seasonality {
        /// JSON document with `usage`, `as_of` and optional `years`
        input: PathBuf,
    },
    /// Resource optimization advice
    Advise {
        /// JSON document with `pool`, `usage`, `yields`, `fields` and optional `as_of`
        input: PathBuf,
    },
    /// Return on investment per field and resource
    Roi {
        /// JSON document with `unit_costs`, `crop_prices`, `usage` and `harvests`
        input: PathBuf,
    },
    /// Cost breakdown by resource, field, crop and month
    Costs {
        /// JSON document with `unit_costs`, `usage` and `fields`
        input: PathBuf,
    },
    /// List the crop profiles in use
    Crops,
    /// Validate config and crop table
    Check,
    /// Run interactive setup
    Init,
}
