//! 浏览器 / 操作系统分布
//!
//! 使用 woothee 解析 User-Agent，得到浏览器、操作系统排行和爬虫占比。
//! 无法识别的 UA 归入 "Unknown"，缺失 UA 的事件不参与统计。

use serde::Serialize;
use tracing::debug;
use woothee::parser::Parser;

use super::leaderboard::{GroupShare, rank_labels, with_shares};
use super::{Event, UNKNOWN_LABEL, percentage};

const WOOTHEE_UNKNOWN: &str = "UNKNOWN";
const CRAWLER_CATEGORY: &str = "crawler";

/// UA 维度的分布统计
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentBreakdown {
    pub browsers: Vec<GroupShare>,
    pub operating_systems: Vec<GroupShare>,
    /// 爬虫事件数
    pub bots: u64,
    /// 携带 UA 的事件数
    pub with_agent: u64,
    pub bot_percentage: f64,
}

fn known_or_unknown(value: &str) -> String {
    if value.is_empty() || value == WOOTHEE_UNKNOWN {
        UNKNOWN_LABEL.to_string()
    } else {
        value.to_string()
    }
}

/// 统计浏览器与操作系统分布
///
/// 占比与其他分布一样以事件总数为分母；爬虫占比只看携带 UA 的事件。
pub fn agent_breakdown(events: &[Event], limit: Option<usize>) -> AgentBreakdown {
    let parser = Parser::new();

    let mut browsers = Vec::with_capacity(events.len());
    let mut systems = Vec::with_capacity(events.len());
    let mut bots = 0u64;

    for ua in events
        .iter()
        .filter_map(|e| e.user_agent.as_deref())
        .filter(|ua| !ua.trim().is_empty())
    {
        match parser.parse(ua) {
            Some(result) => {
                if result.category == CRAWLER_CATEGORY {
                    bots += 1;
                }
                browsers.push(known_or_unknown(&result.name));
                systems.push(known_or_unknown(&result.os));
            }
            None => {
                browsers.push(UNKNOWN_LABEL.to_string());
                systems.push(UNKNOWN_LABEL.to_string());
            }
        }
    }

    let total = events.len() as u64;
    let with_agent = browsers.len() as u64;
    let breakdown = AgentBreakdown {
        browsers: with_shares(rank_labels(browsers, limit), total),
        operating_systems: with_shares(rank_labels(systems, limit), total),
        bots,
        with_agent,
        bot_percentage: percentage(bots, with_agent),
    };

    debug!(
        "Rollup: agent breakdown {} browsers, {} os, bot={:.1}% of {}",
        breakdown.browsers.len(),
        breakdown.operating_systems.len(),
        breakdown.bot_percentage,
        with_agent
    );

    breakdown
}
