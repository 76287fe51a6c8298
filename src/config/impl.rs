use std::path::Path;
use std::sync::OnceLock;

use tracing::debug;

use super::{DEFAULT_CONFIG_PATH, StaticConfig};
use crate::errors::Result;

static CONFIG: OnceLock<StaticConfig> = OnceLock::new();

/// 初始化全局配置
///
/// 显式指定路径时文件必须存在；否则尝试默认路径，不存在则使用默认值。
/// 重复调用时保留第一次的结果。
pub fn init_config(path: Option<&str>) -> Result<&'static StaticConfig> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }

    let config = match path {
        Some(p) => StaticConfig::load_from(p, true)?,
        None => StaticConfig::load_from(DEFAULT_CONFIG_PATH, false)?,
    };

    if Path::new(path.unwrap_or(DEFAULT_CONFIG_PATH)).exists() {
        debug!(
            "Configuration loaded from: {}",
            path.unwrap_or(DEFAULT_CONFIG_PATH)
        );
    }

    Ok(CONFIG.get_or_init(|| config))
}

/// 获取全局配置，未初始化时使用默认值
pub fn get_config() -> &'static StaticConfig {
    CONFIG.get_or_init(StaticConfig::default)
}
