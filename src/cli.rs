//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for seolnk-analytics using clap's derive macros.

use clap::{Parser, Subcommand};

/// SEOLnk analytics - rollup reports from exported event rows
#[derive(Parser)]
#[command(name = "seolnk-analytics")]
#[command(version)]
#[command(about = "Summaries, breakdowns and daily series for SEOLnk events", long_about = None)]
pub struct Cli {
    /// Configuration file (default: seolnk.toml if present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Build a full rollup report
    ///
    /// Numeric options are validated as text: negative, NaN and inf are rejected.
    Report {
        /// Click/event export (.json array or .csv)
        #[arg(long, short = 'e')]
        events: String,

        /// Page-view export, enables click-rate metrics
        #[arg(long)]
        views: Option<String>,

        /// Subject export (id, label, total_count), enables the leaderboard
        #[arg(long)]
        subjects: Option<String>,

        /// Window length, e.g. "7", "30d", "2w" (default: analytics.default_window_days)
        #[arg(long, short = 'd')]
        days: Option<String>,

        /// Daily series length (default: window length)
        #[arg(long)]
        series_days: Option<String>,

        /// Denormalized all-time click counter
        #[arg(long)]
        all_time: Option<String>,

        /// Denormalized all-time view counter
        #[arg(long)]
        views_total: Option<String>,

        /// Reference time (RFC3339 or "YYYY-MM-DD HH:MM:SS", default: now)
        #[arg(long)]
        now: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Also write the daily series to a CSV file
        #[arg(long)]
        csv_out: Option<String>,
    },

    /// Show device breakdown only
    Devices {
        /// Click/event export (.json array or .csv)
        #[arg(long, short = 'e')]
        events: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: seolnk.example.toml)
        output_path: Option<String>,

        /// Overwrite existing file without confirmation
        #[arg(long)]
        force: bool,
    },
}
