//! 分析汇总引擎
//!
//! 将原始事件行（页面浏览、链接点击、轮播点击、解锁）聚合为分析页面使用的
//! 统计视图：汇总计数、设备分布、来源/国家排行、按主体排行、按天补齐的时间序列
//! 以及最近活动列表。
//!
//! 所有函数都是纯计算：不做 I/O，不读取全局时钟，`now` 由调用方传入。

pub mod agent;
pub mod device;
pub mod engine;
pub mod leaderboard;
pub mod recent;
pub mod referrer;
pub mod series;
pub mod summary;
pub mod window;

pub use agent::{AgentBreakdown, agent_breakdown};
pub use device::{DeviceBreakdown, DeviceClassifier, DeviceRule, DeviceShare, DeviceType, device_breakdown};
pub use engine::{EventStream, RollupConfig, RollupEngine, RollupReport, RollupRequest};
pub use leaderboard::{
    GroupCount, GroupShare, SubjectCount, SubjectLeaderboard, country_label, per_subject_leaderboard,
    top_countries, top_groups, top_referrers, with_shares,
};
pub use recent::recent_activity;
pub use referrer::{DIRECT_LABEL, normalize_referrer};
pub use series::{DailyPoint, daily_series, daily_series_in};
pub use summary::{EngagementSummary, MetricSummary, rate, summarize, summarize_engagement};
pub use window::Window;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// 国家缺失时使用的分组名
pub const UNKNOWN_LABEL: &str = "Unknown";

/// 事件类型
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    PageView,
    #[default]
    LinkClick,
    RotatorClick,
    Unlock,
}

/// 单条原始事件
///
/// 由跳转/服务路径写入，汇总逻辑只读不改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// 发生时间
    pub occurred_at: DateTime<Utc>,
    /// 来源页面 (Referer header)，可能为空或 "unknown"
    #[serde(default)]
    pub referrer: Option<String>,
    /// 用户代理 (User-Agent header)
    #[serde(default)]
    pub user_agent: Option<String>,
    /// 事件所属主体（bio 链接、轮播目标、父页面等）
    #[serde(default)]
    pub subject_id: Option<String>,
    /// 国家代码，仅轮播点击携带
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub kind: EventKind,
}

impl Event {
    pub fn new(occurred_at: DateTime<Utc>) -> Self {
        Self {
            occurred_at,
            referrer: None,
            user_agent: None,
            subject_id: None,
            country_code: None,
            kind: EventKind::default(),
        }
    }

    pub fn with_kind(mut self, kind: EventKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }

    pub fn with_country(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }
}

/// 被统计的主体（bio 链接、轮播目标 URL 等）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    /// 标题或 URL
    pub label: String,
    /// 其他地方维护的冗余计数，原始日志为空时作为回退值
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl Subject {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            total_count: None,
        }
    }

    pub fn with_total_count(mut self, total_count: u64) -> Self {
        self.total_count = Some(total_count);
        self
    }
}

/// 计算百分比，总数为 0 时返回 0
pub fn percentage(count: u64, total: u64) -> f64 {
    if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// 保留一位小数
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
