//! Device breakdown command

use colored::Colorize;

use super::helpers::{print_empty, render_bar};
use crate::analytics::DeviceClassifier;
use crate::config::AnalyticsConfig;
use crate::interfaces::cli::CliError;
use crate::storage::load_events;

pub fn show_devices(events: &str, json: bool, config: &AnalyticsConfig) -> Result<(), CliError> {
    config.validate()?;
    let classifier = DeviceClassifier::new(config.device_rules.clone(), config.fallback_device);
    let events = load_events(events)?;
    let breakdown = classifier.breakdown(&events);

    if json {
        let json = serde_json::to_string_pretty(&breakdown.shares()).map_err(|e| {
            CliError::CommandError(format!("Failed to serialize breakdown: {}", e))
        })?;
        println!("{}", json);
        return Ok(());
    }

    println!("{}", "Device breakdown:".bold().green());
    println!();
    if breakdown.is_empty() {
        print_empty("device data");
        return Ok(());
    }

    for share in breakdown.shares() {
        println!(
            "  {:<8} {} {:>6} {}",
            share.device.to_string().cyan(),
            render_bar(share.percentage),
            share.count.to_string().green(),
            format!("({:.1}%)", share.percentage).dimmed()
        );
    }
    println!();
    println!(
        "{} Total {} events",
        "ℹ".bold().blue(),
        breakdown.total().to_string().green()
    );
    Ok(())
}
