//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod config_gen;
mod devices;
pub mod helpers;
mod report;

pub use config_gen::config_generate;
pub use devices::show_devices;
pub use report::{ReportArgs, build_report, show_report};
