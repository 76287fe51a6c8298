//! 导出文件中的原始记录
//!
//! 兼容 Supabase/Postgres 导出常见的列名，转换为引擎使用的 `Event` / `Subject`。

use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::analytics::{Event, EventKind, Subject};
use crate::errors::{Result, RollupError};
use crate::utils::parse_timestamp;

/// ID 在 JSON 中可能是字符串也可能是数字
///
/// CSV 单元格始终以文本到达，因此 `0042` 不会被改写为 `42`。
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::Str(s) => s,
            StringOrNumber::Int(i) => i.to_string(),
            StringOrNumber::UInt(u) => u.to_string(),
            StringOrNumber::Float(f) => f.to_string(),
        }
    }
}

fn opt_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}

/// 计数列：JSON 中为数字，CSV 中为文本
fn opt_count<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let Some(value) = Option::<StringOrNumber>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match value {
        StringOrNumber::Str(s) if s.trim().is_empty() => Ok(None),
        StringOrNumber::Str(s) => s.trim().parse::<u64>().map(Some).map_err(|_| {
            D::Error::custom(format!("expected a non-negative integer count, got '{}'", s))
        }),
        StringOrNumber::Int(i) => u64::try_from(i)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("count must not be negative, got {}", i))),
        StringOrNumber::UInt(u) => Ok(Some(u)),
        StringOrNumber::Float(f) => Err(D::Error::custom(format!(
            "expected an integer count, got {}",
            f
        ))),
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(StringOrNumber::deserialize(deserializer)?.into())
}

/// 事件原始记录
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    #[serde(alias = "created_at", alias = "clicked_at", alias = "timestamp")]
    pub occurred_at: String,
    #[serde(default)]
    pub referrer: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(
        default,
        alias = "link_id",
        alias = "bio_link_id",
        alias = "destination_id",
        deserialize_with = "opt_string_or_number"
    )]
    pub subject_id: Option<String>,
    #[serde(default, alias = "country")]
    pub country_code: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
}

impl EventRecord {
    /// 转换为事件；`row` 仅用于错误信息
    pub fn into_event(self, row: usize) -> Result<Event> {
        let occurred_at = parse_timestamp(&self.occurred_at)
            .map_err(|e| RollupError::date_parse(format!("Row {}: {}", row, e.message())))?;

        let kind = match self.kind.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse::<EventKind>().unwrap_or_else(|_| {
                debug!("Row {}: unknown event kind '{}', using default", row, raw);
                EventKind::default()
            }),
            _ => EventKind::default(),
        };

        Ok(Event {
            occurred_at,
            referrer: self.referrer,
            user_agent: self.user_agent,
            subject_id: self.subject_id,
            country_code: self.country_code,
            kind,
        })
    }
}

/// 主体原始记录
///
/// bio 链接同时带有 `title` 和 `url`，轮播目标只有 `url`，因此各列分别读取，
/// 按 label > title > url 的顺序取展示名。
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "opt_count")]
    pub total_count: Option<u64>,
    #[serde(default, deserialize_with = "opt_count")]
    pub clicks: Option<u64>,
    #[serde(default, deserialize_with = "opt_count")]
    pub views: Option<u64>,
}

impl From<SubjectRecord> for Subject {
    fn from(record: SubjectRecord) -> Self {
        let label = [record.label, record.title, record.url]
            .into_iter()
            .flatten()
            .find(|l| !l.trim().is_empty())
            // 没有任何展示名时用 ID
            .unwrap_or_else(|| record.id.clone());
        Subject {
            id: record.id,
            label,
            total_count: record.total_count.or(record.clicks).or(record.views),
        }
    }
}
