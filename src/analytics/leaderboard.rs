//! 排行榜
//!
//! 通用分组计数（来源、国家、主体）以及按主体的排行榜。
//! 排序为稳定排序：计数相同的分组保持首次出现的先后顺序。

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::{Event, Subject, UNKNOWN_LABEL, normalize_referrer, percentage};

/// 分组计数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub label: String,
    pub count: u64,
}

/// 带占比的分组计数
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupShare {
    pub label: String,
    pub count: u64,
    pub percentage: f64,
}

/// 为分组附加占比，分母由调用方决定
pub fn with_shares(groups: Vec<GroupCount>, total: u64) -> Vec<GroupShare> {
    groups
        .into_iter()
        .map(|g| GroupShare {
            percentage: percentage(g.count, total),
            label: g.label,
            count: g.count,
        })
        .collect()
}

/// 对标签序列计数并排序，`limit` 为 `None` 时不截断
pub(crate) fn rank_labels<I>(labels: I, limit: Option<usize>) -> Vec<GroupCount>
where
    I: IntoIterator<Item = String>,
{
    // 按首次出现顺序记录分组，保证稳定排序的平局顺序
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<GroupCount> = Vec::new();

    for label in labels {
        match index.get(&label) {
            Some(&i) => groups[i].count += 1,
            None => {
                index.insert(label.clone(), groups.len());
                groups.push(GroupCount { label, count: 1 });
            }
        }
    }

    groups.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(limit) = limit {
        groups.truncate(limit);
    }
    groups
}

/// 通用排行榜：按 `key_fn` 分组计数，降序返回前 `limit` 个
pub fn top_groups<F>(events: &[Event], key_fn: F, limit: Option<usize>) -> Vec<GroupCount>
where
    F: FnMut(&Event) -> String,
{
    rank_labels(events.iter().map(key_fn), limit)
}

/// 国家分组名，缺失或为空时为 "Unknown"
pub fn country_label(country_code: Option<&str>) -> String {
    match country_code.map(str::trim) {
        Some(code) if !code.is_empty() => code.to_string(),
        _ => UNKNOWN_LABEL.to_string(),
    }
}

/// 来源排行（归一化后的主机名）
pub fn top_referrers(events: &[Event], limit: Option<usize>) -> Vec<GroupCount> {
    top_groups(events, |e| normalize_referrer(e.referrer.as_deref()), limit)
}

/// 国家排行
pub fn top_countries(events: &[Event], limit: Option<usize>) -> Vec<GroupCount> {
    top_groups(events, |e| country_label(e.country_code.as_deref()), limit)
}

/// 单个主体的排行条目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectCount {
    pub id: String,
    pub label: String,
    pub count: u64,
    /// 计数来自冗余计数器而非原始事件
    pub from_counter: bool,
    /// 相对最大值的条形宽度（%）
    pub bar_width: f64,
}

/// 按主体的排行榜
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubjectLeaderboard {
    pub entries: Vec<SubjectCount>,
    /// 最大计数，至少为 1
    pub max_count: u64,
}

impl SubjectLeaderboard {
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// 按主体统计事件数
///
/// 原始事件为 0 且主体带有冗余计数时使用冗余计数（原始日志可能不完整）。
pub fn per_subject_leaderboard(subjects: &[Subject], events: &[Event]) -> SubjectLeaderboard {
    let mut raw_counts: HashMap<&str, u64> = HashMap::with_capacity(subjects.len());
    for event in events {
        if let Some(id) = event.subject_id.as_deref() {
            *raw_counts.entry(id).or_insert(0) += 1;
        }
    }

    let mut entries: Vec<SubjectCount> = subjects
        .iter()
        .map(|subject| {
            let raw = raw_counts.get(subject.id.as_str()).copied().unwrap_or(0);
            let (count, from_counter) = match subject.total_count {
                Some(counter) if raw == 0 => (counter, true),
                _ => (raw, false),
            };
            SubjectCount {
                id: subject.id.clone(),
                label: subject.label.clone(),
                count,
                from_counter,
                bar_width: 0.0,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.count.cmp(&a.count));

    let max_count = entries.first().map(|e| e.count).unwrap_or(0).max(1);
    for entry in &mut entries {
        entry.bar_width = entry.count as f64 / max_count as f64 * 100.0;
    }

    debug!(
        "Rollup: per-subject leaderboard over {} subjects, {} events, max={}",
        subjects.len(),
        events.len(),
        max_count
    );

    SubjectLeaderboard { entries, max_count }
}
