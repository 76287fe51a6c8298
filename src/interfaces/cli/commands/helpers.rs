//! Argument parsing and rendering helpers shared by CLI commands

use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::analytics::{GroupShare, Window};
use crate::errors::{Result, RollupError};
use crate::utils::parse_timestamp;

const BAR_WIDTH: usize = 24;

/// 解析非负整数计数（--all-time / --views-total）
///
/// 拒绝负数、小数、NaN、inf 等非整数文本。
pub fn parse_count(name: &str, input: &str) -> Result<u64> {
    let trimmed = input.trim();
    trimmed.parse::<u64>().map_err(|_| {
        RollupError::invalid_argument(format!(
            "--{} expects a non-negative integer, got '{}'",
            name, trimmed
        ))
    })
}

pub fn parse_optional_count(name: &str, input: Option<&str>) -> Result<Option<u64>> {
    input.map(|s| parse_count(name, s)).transpose()
}

/// 解析天数参数，未提供时使用默认值
pub fn parse_days(input: Option<&str>, default: i64) -> Result<i64> {
    match input {
        Some(s) => Ok(Window::parse(s)?.len_days()),
        None => Ok(Window::days(default)?.len_days()),
    }
}

/// 解析参考时间，未提供时取当前时间（只取一次）
pub fn parse_now(input: Option<&str>) -> Result<DateTime<Utc>> {
    match input {
        Some(s) => parse_timestamp(s),
        None => Ok(Utc::now()),
    }
}

/// 按比例渲染条形
pub fn render_bar(percentage: f64) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "{}{}",
        "█".repeat(filled).green(),
        "░".repeat(BAR_WIDTH - filled).dimmed()
    )
}

pub fn print_heading(title: &str) {
    println!();
    println!("{}", title.bold().green());
}

pub fn print_empty(what: &str) {
    println!("  {} No {} yet", "ℹ".bold().blue(), what);
}

/// 打印排行榜（来源、国家、浏览器等）
pub fn print_shares(title: &str, shares: &[GroupShare]) {
    print_heading(title);
    if shares.is_empty() {
        print_empty("data");
        return;
    }
    let width = shares.iter().map(|s| s.label.chars().count()).max().unwrap_or(0);
    for share in shares {
        println!(
            "  {:<width$}  {} {:>6} {}",
            share.label.cyan(),
            render_bar(share.percentage),
            share.count.to_string().green(),
            format!("({:.1}%)", share.percentage).dimmed(),
            width = width
        );
    }
}
