//! 汇总计数与比率指标

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::{Event, Window, round1};
use crate::errors::Result;

/// 单个指标的全量/窗口内计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricSummary {
    pub total_all_time: u64,
    pub in_window: u64,
}

impl MetricSummary {
    pub fn is_empty(&self) -> bool {
        self.total_all_time == 0 && self.in_window == 0
    }
}

/// 浏览 + 点击的组合汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EngagementSummary {
    pub views: MetricSummary,
    pub clicks: MetricSummary,
    /// 全量点击率（%），一位小数
    pub click_rate: f64,
    /// 窗口内点击率（%），一位小数
    pub window_click_rate: f64,
}

/// 汇总单个事件流
///
/// `all_time_total` 为外部维护的冗余计数；提供时作为全量总数，
/// 否则使用事件条数。窗口计数只看原始事件。
pub fn summarize(
    events: &[Event],
    all_time_total: Option<u64>,
    window_days: i64,
    now: DateTime<Utc>,
) -> Result<MetricSummary> {
    let window = Window::days(window_days)?;

    let total_all_time = all_time_total.unwrap_or(events.len() as u64);
    let in_window = events
        .iter()
        .filter(|e| window.contains(e.occurred_at, now))
        .count() as u64;

    debug!(
        "Rollup: summarize {} events, window={}d -> total={}, in_window={}",
        events.len(),
        window_days,
        total_all_time,
        in_window
    );

    Ok(MetricSummary {
        total_all_time,
        in_window,
    })
}

/// 比率指标：`round(numerator / max(denominator, 1) * 100, 1)`
pub fn rate(numerator: u64, denominator: u64) -> f64 {
    round1(numerator as f64 / denominator.max(1) as f64 * 100.0)
}

/// 汇总浏览与点击两个事件流，并计算点击率
pub fn summarize_engagement(
    views: &[Event],
    views_total: Option<u64>,
    clicks: &[Event],
    clicks_total: Option<u64>,
    window_days: i64,
    now: DateTime<Utc>,
) -> Result<EngagementSummary> {
    let views = summarize(views, views_total, window_days, now)?;
    let clicks = summarize(clicks, clicks_total, window_days, now)?;

    Ok(EngagementSummary {
        views,
        clicks,
        click_rate: rate(clicks.total_all_time, views.total_all_time),
        window_click_rate: rate(clicks.in_window, views.in_window),
    })
}
