use std::path::Path;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::analytics::device::default_device_rules;
use crate::analytics::window::MAX_DAYS;
use crate::analytics::{DeviceClassifier, DeviceRule, DeviceType, RollupConfig};
use crate::errors::{Result, RollupError};

/// 默认配置文件名
pub const DEFAULT_CONFIG_PATH: &str = "seolnk.toml";

/// 环境变量前缀，分隔符 `__`，如 SEOLNK__ANALYTICS__DEFAULT_WINDOW_DAYS=30
pub const ENV_PREFIX: &str = "SEOLNK";

/// 时区偏移上限（分钟）
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// 静态配置（从 TOML 加载，环境变量覆盖）
///
/// - analytics: 汇总参数（窗口、排行榜长度、报表时区、设备规则）
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StaticConfig {
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML 文件 > 默认值。
    /// `required` 为 true 时文件不存在视为错误（显式指定 `-c` 的情况）。
    pub fn load_from<P: AsRef<Path>>(path: P, required: bool) -> Result<Self> {
        use config::{Config, Environment, File};

        let path = path.as_ref();
        let settings = Config::builder()
            // 1. 从 TOML 文件加载
            .add_source(File::from(path).required(required))
            // 2. 从环境变量覆盖
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: StaticConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.analytics.validate()?;
        self.logging.validate()
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            RollupError::serialization(format!("Failed to serialize config: {}", e))
        })?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 汇总配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsConfig {
    #[serde(default = "default_window_days")]
    pub default_window_days: i64,
    #[serde(default = "default_top_limit")]
    pub referrer_limit: usize,
    #[serde(default = "default_top_limit")]
    pub country_limit: usize,
    #[serde(default = "default_top_limit")]
    pub agent_limit: usize,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    /// 报表时区（相对 UTC 的分钟数），按天分桶时使用
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_fallback_device")]
    pub fallback_device: DeviceType,
    /// 有序设备规则表，先命中者生效
    #[serde(default = "default_device_rules")]
    pub device_rules: Vec<DeviceRule>,
}

impl AnalyticsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.default_window_days < 0 || self.default_window_days > MAX_DAYS {
            return Err(RollupError::config(format!(
                "analytics.default_window_days must be between 0 and {}, got {}",
                MAX_DAYS, self.default_window_days
            )));
        }
        if self.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(RollupError::config(format!(
                "analytics.utc_offset_minutes must be within ±{}, got {}",
                MAX_UTC_OFFSET_MINUTES, self.utc_offset_minutes
            )));
        }
        if let Some(rule) = self.device_rules.iter().find(|r| r.needles.is_empty()) {
            return Err(RollupError::config(format!(
                "analytics.device_rules: rule for '{}' has no needles",
                rule.device
            )));
        }
        Ok(())
    }

    pub fn utc_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            RollupError::config(format!(
                "Invalid analytics.utc_offset_minutes: {}",
                self.utc_offset_minutes
            ))
        })
    }

    /// 转换为引擎配置
    pub fn to_rollup_config(&self) -> Result<RollupConfig> {
        self.validate()?;
        Ok(RollupConfig {
            classifier: DeviceClassifier::new(self.device_rules.clone(), self.fallback_device),
            utc_offset: self.utc_offset()?,
            referrer_limit: self.referrer_limit,
            country_limit: self.country_limit,
            agent_limit: self.agent_limit,
            recent_limit: self.recent_limit,
        })
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "text" 或 "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// 日志文件，为空时输出到 stderr
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<()> {
        match self.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(RollupError::config(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                other
            ))),
        }
    }
}

// Default value functions
fn default_window_days() -> i64 {
    7
}

fn default_top_limit() -> usize {
    5
}

fn default_recent_limit() -> usize {
    10
}

fn default_fallback_device() -> DeviceType {
    DeviceType::Desktop
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_window_days: default_window_days(),
            referrer_limit: default_top_limit(),
            country_limit: default_top_limit(),
            agent_limit: default_top_limit(),
            recent_limit: default_recent_limit(),
            utc_offset_minutes: 0,
            fallback_device: default_fallback_device(),
            device_rules: default_device_rules(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            enable_rotation: false,
            max_backups: default_max_backups(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_matches_engine_default() {
        let config = AnalyticsConfig::default().to_rollup_config().unwrap();
        assert_eq!(config, RollupConfig::default());
    }

    #[test]
    fn test_sample_config_roundtrip() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[analytics]"));
        assert!(sample.contains("device_rules"));
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed, StaticConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("seolnk.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[analytics]
default_window_days = 30
utc_offset_minutes = 480

[[analytics.device_rules]]
device = "mobile"
needles = ["Android", "iPhone"]

[logging]
level = "debug"
"#
        )
        .unwrap();

        let config = StaticConfig::load_from(&path, true).unwrap();
        assert_eq!(config.analytics.default_window_days, 30);
        assert_eq!(config.analytics.device_rules.len(), 1);
        assert_eq!(config.analytics.referrer_limit, 5);
        assert_eq!(config.logging.level, "debug");

        let rollup = config.analytics.to_rollup_config().unwrap();
        assert_eq!(rollup.utc_offset.local_minus_utc(), 480 * 60);
        assert_eq!(rollup.classifier.classify(Some("ipad")), DeviceType::Desktop);
    }

    #[test]
    fn test_missing_optional_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = StaticConfig::load_from(dir.path().join("absent.toml"), false).unwrap();
        assert_eq!(config.analytics.default_window_days, 7);
    }

    #[test]
    fn test_missing_required_file_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = StaticConfig::load_from(dir.path().join("absent.toml"), true).unwrap_err();
        assert!(matches!(err, RollupError::Config(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = AnalyticsConfig {
            default_window_days: -1,
            ..AnalyticsConfig::default()
        };
        assert!(config.validate().is_err());

        config.default_window_days = 7;
        config.utc_offset_minutes = 15 * 60;
        assert!(config.validate().is_err());

        config.utc_offset_minutes = -300;
        config.device_rules.push(DeviceRule::new(DeviceType::Tablet, Vec::<String>::new()));
        assert!(config.validate().is_err());

        let logging = LoggingConfig {
            format: "xml".into(),
            ..LoggingConfig::default()
        };
        assert!(logging.validate().is_err());
    }
}
