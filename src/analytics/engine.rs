//! RollupEngine
//!
//! 持有汇总配置（设备规则表、报表时区、排行榜长度），
//! 一次 `rollup` 调用只捕获一次 `now`，并在汇总、序列和各类分布之间共享，
//! 保证它们对 "今天" 的理解一致。
//!
//! 占比的分母在一次调用内保持一致：分布与排行榜使用原始事件条数，
//! 点击率使用（可能来自冗余计数器的）全量总数。

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::{
    AgentBreakdown, DailyPoint, DeviceBreakdown, DeviceClassifier, EngagementSummary, Event,
    GroupShare, MetricSummary, Subject, SubjectLeaderboard, Window, agent_breakdown,
    daily_series_in, per_subject_leaderboard, recent_activity, summarize, summarize_engagement,
    top_countries, top_referrers, with_shares,
};
use crate::errors::Result;

/// 汇总配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupConfig {
    pub classifier: DeviceClassifier,
    /// 按天分桶使用的报表时区
    pub utc_offset: FixedOffset,
    pub referrer_limit: usize,
    pub country_limit: usize,
    pub agent_limit: usize,
    pub recent_limit: usize,
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            classifier: DeviceClassifier::default(),
            utc_offset: Utc.fix(),
            referrer_limit: 5,
            country_limit: 5,
            agent_limit: 5,
            recent_limit: 10,
        }
    }
}

/// 一个事件流及其可选的冗余总数
#[derive(Debug, Clone, Copy, Default)]
pub struct EventStream<'a> {
    pub events: &'a [Event],
    pub all_time_total: Option<u64>,
}

impl<'a> EventStream<'a> {
    pub fn new(events: &'a [Event]) -> Self {
        Self {
            events,
            all_time_total: None,
        }
    }

    pub fn with_total(mut self, all_time_total: Option<u64>) -> Self {
        self.all_time_total = all_time_total;
        self
    }
}

/// 一次汇总请求
#[derive(Debug, Clone)]
pub struct RollupRequest<'a> {
    /// 主事件流（点击、解锁等），所有分布基于它计算
    pub clicks: EventStream<'a>,
    /// 可选的浏览事件流，提供时计算点击率
    pub views: Option<EventStream<'a>>,
    pub subjects: &'a [Subject],
    pub window_days: i64,
    /// 序列长度，缺省与窗口相同
    pub series_days: Option<i64>,
}

impl<'a> RollupRequest<'a> {
    pub fn new(events: &'a [Event], window_days: i64) -> Self {
        Self {
            clicks: EventStream::new(events),
            views: None,
            subjects: &[],
            window_days,
            series_days: None,
        }
    }

    pub fn with_all_time_total(mut self, total: Option<u64>) -> Self {
        self.clicks.all_time_total = total;
        self
    }

    pub fn with_views(mut self, views: EventStream<'a>) -> Self {
        self.views = Some(views);
        self
    }

    pub fn with_subjects(mut self, subjects: &'a [Subject]) -> Self {
        self.subjects = subjects;
        self
    }

    pub fn with_series_days(mut self, days: i64) -> Self {
        self.series_days = Some(days);
        self
    }
}

/// 一次汇总的全部结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollupReport {
    pub generated_at: DateTime<Utc>,
    pub window_days: i64,
    pub summary: MetricSummary,
    pub engagement: Option<EngagementSummary>,
    pub devices: DeviceBreakdown,
    pub top_referrers: Vec<GroupShare>,
    pub top_countries: Vec<GroupShare>,
    pub subjects: Option<SubjectLeaderboard>,
    pub daily: Vec<DailyPoint>,
    pub recent: Vec<Event>,
    pub agents: AgentBreakdown,
}

impl RollupReport {
    /// 主事件流为空（供展示层统一渲染空状态）
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RollupEngine {
    config: RollupConfig,
}

impl RollupEngine {
    pub fn new(config: RollupConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RollupConfig {
        &self.config
    }

    pub fn summarize(
        &self,
        events: &[Event],
        all_time_total: Option<u64>,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> Result<MetricSummary> {
        summarize(events, all_time_total, window_days, now)
    }

    pub fn device_breakdown(&self, events: &[Event]) -> DeviceBreakdown {
        self.config.classifier.breakdown(events)
    }

    pub fn top_referrers(&self, events: &[Event]) -> Vec<GroupShare> {
        with_shares(
            top_referrers(events, Some(self.config.referrer_limit)),
            events.len() as u64,
        )
    }

    pub fn top_countries(&self, events: &[Event]) -> Vec<GroupShare> {
        with_shares(
            top_countries(events, Some(self.config.country_limit)),
            events.len() as u64,
        )
    }

    pub fn daily_series(
        &self,
        events: &[Event],
        days: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<DailyPoint>> {
        daily_series_in(events, days, now, &self.config.utc_offset)
    }

    /// 执行一次完整汇总
    ///
    /// 参数校验在任何计算之前完成；单条记录的异常（无效来源、缺失 UA 等）
    /// 不会导致失败。
    pub fn rollup(&self, request: &RollupRequest<'_>, now: DateTime<Utc>) -> Result<RollupReport> {
        Window::days(request.window_days)?;
        let series_days = request.series_days.unwrap_or(request.window_days);
        Window::days(series_days)?;

        let events = request.clicks.events;
        info!(
            "Rollup: {} events, {} subjects, window={}d, series={}d",
            events.len(),
            request.subjects.len(),
            request.window_days,
            series_days
        );

        let summary = summarize(
            events,
            request.clicks.all_time_total,
            request.window_days,
            now,
        )?;

        let engagement = match request.views {
            Some(views) => Some(summarize_engagement(
                views.events,
                views.all_time_total,
                events,
                request.clicks.all_time_total,
                request.window_days,
                now,
            )?),
            None => None,
        };

        let subjects = if request.subjects.is_empty() {
            None
        } else {
            Some(per_subject_leaderboard(request.subjects, events))
        };

        let report = RollupReport {
            generated_at: now,
            window_days: request.window_days,
            summary,
            engagement,
            devices: self.device_breakdown(events),
            top_referrers: self.top_referrers(events),
            top_countries: self.top_countries(events),
            subjects,
            daily: self.daily_series(events, series_days, now)?,
            recent: recent_activity(events, self.config.recent_limit)
                .into_iter()
                .cloned()
                .collect(),
            agents: agent_breakdown(events, Some(self.config.agent_limit)),
        };

        debug!(
            "Rollup: done, total={}, in_window={}, referrers={}, countries={}",
            report.summary.total_all_time,
            report.summary.in_window,
            report.top_referrers.len(),
            report.top_countries.len()
        );

        Ok(report)
    }
}
