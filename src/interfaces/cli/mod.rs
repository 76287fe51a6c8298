//! CLI interface module
//!
//! This module provides command-line interface functionality for seolnk-analytics.

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::errors::RollupError;
use commands::{ReportArgs, config_generate, show_devices, show_report};

#[derive(Debug)]
pub enum CliError {
    InputError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::InputError(msg) => format!("Input error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::InputError(msg) => {
                format!("{} {}", "Input error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<RollupError> for CliError {
    fn from(err: RollupError) -> Self {
        match err {
            RollupError::InvalidArgument(_) | RollupError::DateParse(_) => {
                CliError::ParseError(err.format_simple())
            }
            RollupError::FileOperation(_) | RollupError::Serialization(_) => {
                CliError::InputError(err.format_simple())
            }
            RollupError::Config(_) => CliError::CommandError(err.format_simple()),
        }
    }
}

/// Run a CLI command from clap-parsed input
pub fn run_cli_command(cmd: Commands, config: &StaticConfig) -> Result<(), CliError> {
    match cmd {
        Commands::Report {
            events,
            views,
            subjects,
            days,
            series_days,
            all_time,
            views_total,
            now,
            json,
            csv_out,
        } => show_report(
            ReportArgs {
                events,
                views,
                subjects,
                days,
                series_days,
                all_time,
                views_total,
                now,
                json,
                csv_out,
            },
            &config.analytics,
        ),
        Commands::Devices { events, json } => show_devices(&events, json, &config.analytics),
        Commands::Config { action } => match action {
            ConfigCommands::Generate { output_path, force } => config_generate(output_path, force),
        },
    }
}
