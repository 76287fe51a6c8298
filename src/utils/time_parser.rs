use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::errors::{Result, RollupError};

/// 无时区的时间格式，按 UTC 处理
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// 解析导出数据中的时间戳，支持多种格式：
/// - RFC3339：2024-01-15T10:00:00Z、2024-01-15T10:00:00.123456+08:00
/// - Postgres 文本输出：2024-01-15 10:00:00.123+00
/// - 无时区：2024-01-15 10:00:00（视为 UTC）
/// - 仅日期：2024-01-15（当天 00:00 UTC）
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Postgres 的 timestamptz 文本输出偏移量可能只有小时
    if let Ok(dt) = DateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        && let Some(naive) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(naive.and_utc());
    }

    Err(RollupError::date_parse(format!(
        "Invalid timestamp: '{}'. Supported formats: RFC3339, YYYY-MM-DD HH:MM:SS[.f][+TZ], YYYY-MM-DD",
        input
    )))
}
