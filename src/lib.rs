//! SEOLnk analytics - rollup engine for page-view and click events
//!
//! This library turns raw event rows into the views used by every analytics
//! page: summary counters, device breakdown, referrer/country leaderboards,
//! per-subject leaderboards, gap-filled daily series and recent activity.
//!
//! # Features
//! - **cli**: Command-line interface (default)
//!
//! # Architecture
//! - `analytics`: Pure rollup computations and the `RollupEngine`
//! - `storage`: JSON / CSV export loaders
//! - `config`: Configuration management
//! - `interfaces`: User interfaces (CLI)
//! - `system`: Logging initialization
//! - `utils`: Timestamp parsing and CSV helpers

pub mod analytics;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
#[cfg(feature = "cli")]
pub mod interfaces;
pub mod storage;
pub mod system;
pub mod utils;
