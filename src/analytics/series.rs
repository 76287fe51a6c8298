//! 按天补齐的时间序列
//!
//! 输出固定长度的序列：从最早一天到 `now` 所在日（含），没有事件的日期计数为 0。
//! 生成的日期与事件时间戳使用同一个时区截取日期，避免跨日偏移。

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tracing::debug;

use super::{Event, Window};
use crate::errors::{Result, RollupError};

/// 序列中的一天
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    /// ISO-8601 日期
    pub date: NaiveDate,
    pub count: u64,
    /// 图表标签，如 "Mar 5"
    pub label: String,
}

/// 以 UTC 截取日期生成序列
pub fn daily_series(events: &[Event], days: i64, now: DateTime<Utc>) -> Result<Vec<DailyPoint>> {
    daily_series_in(events, days, now, &Utc)
}

/// 在指定报表时区内生成序列
pub fn daily_series_in<Tz: TimeZone>(
    events: &[Event],
    days: i64,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<Vec<DailyPoint>> {
    let window = Window::days(days)?;
    if window.is_empty() {
        return Ok(Vec::new());
    }

    let span = window.len_days() as u64;
    let today = now.with_timezone(tz).date_naive();
    let first = today.checked_sub_days(Days::new(span - 1)).ok_or_else(|| {
        RollupError::invalid_argument(format!(
            "Series of {} days ending at {} is out of range",
            span, today
        ))
    })?;

    let mut counts: HashMap<NaiveDate, u64> = HashMap::with_capacity(span as usize);
    for event in events {
        let date = event.occurred_at.with_timezone(tz).date_naive();
        if date >= first && date <= today {
            *counts.entry(date).or_insert(0) += 1;
        }
    }

    let series: Vec<DailyPoint> = first
        .iter_days()
        .take(span as usize)
        .map(|date| DailyPoint {
            count: counts.get(&date).copied().unwrap_or(0),
            label: date.format("%b %-d").to_string(),
            date,
        })
        .collect();

    debug!(
        "Rollup: daily series {} -> {} ({} points, {} events bucketed)",
        first,
        today,
        series.len(),
        counts.values().sum::<u64>()
    );

    Ok(series)
}
