//! 设备类型分类
//!
//! 分类策略是一张有序规则表：按顺序匹配小写 User-Agent 中的关键字，
//! 第一条命中的规则决定设备类型，全部未命中时归入回退类型。
//! 默认规则为 tablet（"tablet"/"ipad"）优先于 mobile（"mobile"），其余为 desktop。

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::trace;

use super::{Event, percentage};

/// 设备类型
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
}

/// 单条分类规则：任一关键字命中即归为 `device`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRule {
    pub device: DeviceType,
    pub needles: Vec<String>,
}

impl DeviceRule {
    pub fn new<I, S>(device: DeviceType, needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            device,
            needles: needles.into_iter().map(Into::into).collect(),
        }
    }

    fn matches(&self, ua_lower: &str) -> bool {
        self.needles
            .iter()
            .any(|needle| !needle.is_empty() && ua_lower.contains(needle.as_str()))
    }
}

/// 默认规则表
pub fn default_device_rules() -> Vec<DeviceRule> {
    vec![
        DeviceRule::new(DeviceType::Tablet, ["tablet", "ipad"]),
        DeviceRule::new(DeviceType::Mobile, ["mobile"]),
    ]
}

/// 基于规则表的设备分类器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceClassifier {
    rules: Vec<DeviceRule>,
    fallback: DeviceType,
}

impl Default for DeviceClassifier {
    fn default() -> Self {
        Self::new(default_device_rules(), DeviceType::Desktop)
    }
}

impl DeviceClassifier {
    /// 创建分类器，关键字统一转为小写
    pub fn new(rules: Vec<DeviceRule>, fallback: DeviceType) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| DeviceRule {
                device: rule.device,
                needles: rule.needles.iter().map(|n| n.to_lowercase()).collect(),
            })
            .collect();
        Self { rules, fallback }
    }

    pub fn rules(&self) -> &[DeviceRule] {
        &self.rules
    }

    pub fn fallback(&self) -> DeviceType {
        self.fallback
    }

    /// 对单个 User-Agent 分类；缺失时归入回退类型
    pub fn classify(&self, user_agent: Option<&str>) -> DeviceType {
        let Some(ua) = user_agent else {
            return self.fallback;
        };
        let ua_lower = ua.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&ua_lower))
            .map(|rule| rule.device)
            .unwrap_or(self.fallback)
    }

    /// 统计事件的设备分布
    pub fn breakdown(&self, events: &[Event]) -> DeviceBreakdown {
        let mut breakdown = DeviceBreakdown::default();
        for event in events {
            let device = self.classify(event.user_agent.as_deref());
            trace!("Rollup: classified {:?} as {}", event.user_agent, device);
            breakdown.increment(device);
        }
        breakdown
    }
}

/// 设备分布计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeviceBreakdown {
    pub mobile: u64,
    pub tablet: u64,
    pub desktop: u64,
}

/// 单个设备类型的计数与占比
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeviceShare {
    pub device: DeviceType,
    pub count: u64,
    pub percentage: f64,
}

impl DeviceBreakdown {
    fn increment(&mut self, device: DeviceType) {
        match device {
            DeviceType::Mobile => self.mobile += 1,
            DeviceType::Tablet => self.tablet += 1,
            DeviceType::Desktop => self.desktop += 1,
        }
    }

    pub fn count(&self, device: DeviceType) -> u64 {
        match device {
            DeviceType::Mobile => self.mobile,
            DeviceType::Tablet => self.tablet,
            DeviceType::Desktop => self.desktop,
        }
    }

    pub fn total(&self) -> u64 {
        self.mobile + self.tablet + self.desktop
    }

    /// 没有任何已分类事件（用于展示 "暂无数据"）
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// 占比（%），总数为 0 时为 0
    pub fn percentage(&self, device: DeviceType) -> f64 {
        percentage(self.count(device), self.total())
    }

    /// 按 mobile / tablet / desktop 顺序列出计数与占比
    pub fn shares(&self) -> Vec<DeviceShare> {
        DeviceType::iter()
            .map(|device| DeviceShare {
                device,
                count: self.count(device),
                percentage: self.percentage(device),
            })
            .collect()
    }
}

/// 使用默认规则表统计设备分布
pub fn device_breakdown(events: &[Event]) -> DeviceBreakdown {
    DeviceClassifier::default().breakdown(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const ANDROID_TABLET: &str = "Mozilla/5.0 (Linux; Android 13; SM-X700) Tablet Mobile Safari/537.36";
    const DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

    fn event(ua: Option<&str>) -> Event {
        let mut e = Event::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        e.user_agent = ua.map(String::from);
        e
    }

    #[test]
    fn test_classify_default_rules() {
        let classifier = DeviceClassifier::default();
        assert_eq!(classifier.classify(Some(IPHONE)), DeviceType::Mobile);
        assert_eq!(classifier.classify(Some(DESKTOP)), DeviceType::Desktop);
        assert_eq!(classifier.classify(None), DeviceType::Desktop);
        assert_eq!(classifier.classify(Some("")), DeviceType::Desktop);
    }

    #[test]
    fn test_tablet_before_mobile() {
        // 两个 UA 都包含 "Mobile"，但 tablet 规则先匹配
        let classifier = DeviceClassifier::default();
        assert_eq!(classifier.classify(Some(IPAD)), DeviceType::Tablet);
        assert_eq!(classifier.classify(Some(ANDROID_TABLET)), DeviceType::Tablet);
    }

    #[test]
    fn test_case_insensitive() {
        let classifier = DeviceClassifier::default();
        assert_eq!(classifier.classify(Some("SOME MOBILE AGENT")), DeviceType::Mobile);
        assert_eq!(classifier.classify(Some("Tablet; iPad")), DeviceType::Tablet);
    }

    #[test]
    fn test_custom_rules() {
        let classifier = DeviceClassifier::new(
            vec![DeviceRule::new(DeviceType::Mobile, ["Android", "iPhone"])],
            DeviceType::Desktop,
        );
        assert_eq!(classifier.classify(Some("android 14")), DeviceType::Mobile);
        assert_eq!(classifier.classify(Some(IPAD)), DeviceType::Desktop);
        assert_eq!(classifier.rules()[0].needles, vec!["android", "iphone"]);
    }

    #[test]
    fn test_breakdown_exhaustive() {
        let events = vec![
            event(Some(IPHONE)),
            event(Some(IPAD)),
            event(Some(DESKTOP)),
            event(None),
        ];
        let breakdown = device_breakdown(&events);
        assert_eq!(breakdown.mobile, 1);
        assert_eq!(breakdown.tablet, 1);
        assert_eq!(breakdown.desktop, 2);
        assert_eq!(breakdown.total(), events.len() as u64);
        assert_eq!(breakdown.percentage(DeviceType::Desktop), 50.0);
    }

    #[test]
    fn test_empty_breakdown() {
        let breakdown = device_breakdown(&[]);
        assert!(breakdown.is_empty());
        for share in breakdown.shares() {
            assert_eq!(share.count, 0);
            assert_eq!(share.percentage, 0.0);
        }
    }

    #[test]
    fn test_device_type_parse() {
        assert_eq!("Tablet".parse::<DeviceType>().unwrap(), DeviceType::Tablet);
        assert_eq!(DeviceType::Mobile.to_string(), "mobile");
        assert!("phablet".parse::<DeviceType>().is_err());
    }
}
