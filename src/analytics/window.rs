//! 统计窗口
//!
//! 窗口为 `[now - N 天, now]`。天数必须是非负整数；来自文本（CLI、配置）
//! 的 `NaN`、`inf`、小数或负数在解析阶段即被拒绝。

use chrono::{DateTime, Duration, Utc};

use crate::errors::{Result, RollupError};

/// 允许的最大天数（约 100 年），超出视为调用错误
pub const MAX_DAYS: i64 = 36_525;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    days: i64,
}

impl Window {
    /// 校验天数并创建窗口
    pub fn days(days: i64) -> Result<Self> {
        if days < 0 {
            return Err(RollupError::invalid_argument(format!(
                "Window length must not be negative, got {} days",
                days
            )));
        }
        if days > MAX_DAYS {
            return Err(RollupError::invalid_argument(format!(
                "Window length of {} days exceeds the maximum of {} days",
                days, MAX_DAYS
            )));
        }
        Ok(Self { days })
    }

    /// 从文本解析窗口长度
    ///
    /// 支持格式：`7`、`7d`、`14days`、`2w`
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(RollupError::invalid_argument("Window length cannot be empty"));
        }

        let digits_end = input
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(input.len());
        let (num_str, unit) = input.split_at(digits_end);

        if num_str.is_empty() {
            // 负数、NaN、inf 等都落在这里
            return Err(RollupError::invalid_argument(format!(
                "Invalid window length: '{}'. Expected a non-negative whole number of days",
                input
            )));
        }

        let num: i64 = num_str.parse().map_err(|_| {
            RollupError::invalid_argument(format!("Window length out of range: '{}'", input))
        })?;

        let multiplier = match unit.trim().to_lowercase().as_str() {
            "" | "d" | "day" | "days" => 1,
            "w" | "week" | "weeks" => 7,
            _ => {
                return Err(RollupError::invalid_argument(format!(
                    "Invalid window length: '{}'. Supported units: d, w",
                    input
                )));
            }
        };

        let days = num.checked_mul(multiplier).ok_or_else(|| {
            RollupError::invalid_argument(format!("Window length out of range: '{}'", input))
        })?;

        Self::days(days)
    }

    /// 窗口天数
    pub fn len_days(&self) -> i64 {
        self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days == 0
    }

    /// 窗口起点 `now - N 天`
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        // MAX_DAYS 保证不会溢出；极端的 now 取值下退回最小时间
        now.checked_sub_signed(Duration::days(self.days))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// 事件是否落在 `[now - N 天, now]` 内；非正窗口不包含任何事件
    pub fn contains(&self, occurred_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.days > 0 && occurred_at >= self.start(now) && occurred_at <= now
    }
}
