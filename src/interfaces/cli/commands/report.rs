//! Full rollup report command

use colored::Colorize;
use tracing::info;

use super::helpers::{
    parse_days, parse_now, parse_optional_count, print_empty, print_heading, print_shares,
    render_bar,
};
use crate::analytics::{EventStream, RollupEngine, RollupReport, RollupRequest};
use crate::config::AnalyticsConfig;
use crate::interfaces::cli::CliError;
use crate::storage::{load_events, load_subjects};
use crate::utils::csv_handler::export_daily_series;

/// `report` 子命令参数（文本形式，统一在这里校验）
#[derive(Debug, Default)]
pub struct ReportArgs {
    pub events: String,
    pub views: Option<String>,
    pub subjects: Option<String>,
    pub days: Option<String>,
    pub series_days: Option<String>,
    pub all_time: Option<String>,
    pub views_total: Option<String>,
    pub now: Option<String>,
    pub json: bool,
    pub csv_out: Option<String>,
}

/// 解析参数、加载文件、执行汇总
///
/// 所有参数在读取文件之前校验。
pub fn build_report(args: &ReportArgs, config: &AnalyticsConfig) -> Result<RollupReport, CliError> {
    let window_days = parse_days(args.days.as_deref(), config.default_window_days)?;
    let series_days = args
        .series_days
        .as_deref()
        .map(|s| parse_days(Some(s), window_days))
        .transpose()?;
    let all_time = parse_optional_count("all-time", args.all_time.as_deref())?;
    let views_total = parse_optional_count("views-total", args.views_total.as_deref())?;
    let now = parse_now(args.now.as_deref())?;

    let engine = RollupEngine::new(config.to_rollup_config()?);

    let events = load_events(&args.events)?;
    let views = args.views.as_deref().map(load_events).transpose()?;
    let subjects = args.subjects.as_deref().map(load_subjects).transpose()?;

    let mut request = RollupRequest::new(&events, window_days).with_all_time_total(all_time);
    if let Some(views) = views.as_deref() {
        request = request.with_views(EventStream::new(views).with_total(views_total));
    }
    if let Some(subjects) = subjects.as_deref() {
        request = request.with_subjects(subjects);
    }
    if let Some(days) = series_days {
        request = request.with_series_days(days);
    }

    Ok(engine.rollup(&request, now)?)
}

pub fn show_report(args: ReportArgs, config: &AnalyticsConfig) -> Result<(), CliError> {
    let report = build_report(&args, config)?;

    if let Some(path) = args.csv_out.as_deref() {
        export_daily_series(&report.daily, path)?;
        info!("Daily series written to {}", path);
    }

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| {
            CliError::CommandError(format!("Failed to serialize report: {}", e))
        })?;
        println!("{}", json);
        return Ok(());
    }

    print_report(&report);
    if let Some(path) = args.csv_out.as_deref() {
        println!();
        println!("{} Daily series exported to {}", "✓".bold().green(), path.blue());
    }
    Ok(())
}

fn print_report(report: &RollupReport) {
    println!(
        "{} {}",
        "Analytics report".bold().green(),
        format!(
            "(last {} days, generated {})",
            report.window_days,
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
        .dimmed()
    );

    print_heading("Summary");
    println!(
        "  {:<16} {}",
        "All time:",
        report.summary.total_all_time.to_string().cyan()
    );
    println!(
        "  {:<16} {}",
        format!("Last {} days:", report.window_days),
        report.summary.in_window.to_string().cyan()
    );
    if let Some(engagement) = &report.engagement {
        println!(
            "  {:<16} {} {}",
            "Views:",
            engagement.views.total_all_time.to_string().cyan(),
            format!("({} in window)", engagement.views.in_window).dimmed()
        );
        println!(
            "  {:<16} {}% {}",
            "Click rate:",
            format!("{:.1}", engagement.click_rate).yellow(),
            format!("({:.1}% in window)", engagement.window_click_rate).dimmed()
        );
    }

    print_heading("Devices");
    if report.devices.is_empty() {
        print_empty("device data");
    } else {
        for share in report.devices.shares() {
            println!(
                "  {:<8} {} {:>6} {}",
                share.device.to_string().cyan(),
                render_bar(share.percentage),
                share.count.to_string().green(),
                format!("({:.1}%)", share.percentage).dimmed()
            );
        }
    }

    print_shares("Top referrers", &report.top_referrers);
    print_shares("Top countries", &report.top_countries);

    if let Some(board) = &report.subjects {
        print_heading("Per subject");
        if board.is_empty() {
            print_empty("clicks");
        } else {
            for entry in &board.entries {
                let marker = if entry.from_counter { "*" } else { " " };
                println!(
                    "  {}  {} {:>6}{}",
                    entry.label.cyan(),
                    render_bar(entry.bar_width),
                    entry.count.to_string().green(),
                    marker.dimmed()
                );
            }
            if board.entries.iter().any(|e| e.from_counter) {
                println!("  {}", "* from stored counter".dimmed());
            }
        }
    }

    print_heading("Daily");
    if report.daily.is_empty() {
        print_empty("days in range");
    } else {
        let max = report.daily.iter().map(|p| p.count).max().unwrap_or(0).max(1);
        for point in &report.daily {
            println!(
                "  {} {:<7} {} {}",
                point.date.to_string().dimmed(),
                point.label,
                render_bar(point.count as f64 / max as f64 * 100.0),
                point.count.to_string().green()
            );
        }
    }

    print_shares("Browsers", &report.agents.browsers);
    print_shares("Operating systems", &report.agents.operating_systems);
    if report.agents.with_agent > 0 {
        println!(
            "  {} {} {}",
            "Bots:".dimmed(),
            report.agents.bots.to_string().yellow(),
            format!("({:.1}%)", report.agents.bot_percentage).dimmed()
        );
    }

    print_heading("Recent activity");
    if report.recent.is_empty() {
        print_empty("activity");
    } else {
        for event in &report.recent {
            println!(
                "  {} {:<13} {} {}",
                event.occurred_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                event.kind.to_string().cyan(),
                crate::analytics::normalize_referrer(event.referrer.as_deref()).blue(),
                crate::analytics::country_label(event.country_code.as_deref()).dimmed()
            );
        }
    }
}
