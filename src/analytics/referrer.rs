//! 来源（Referer）归一化

use url::Url;

/// 直接访问的展示名
pub const DIRECT_LABEL: &str = "Direct";

/// 归一化来源
///
/// - 空、缺失或字面量 `"unknown"` → `"Direct"`
/// - 以 `http` 开头 → 解析为 URL 后只取主机名
/// - 解析失败或其他情况 → 原样返回
pub fn normalize_referrer(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(r) if !r.trim().is_empty() && r != "unknown" => r,
        _ => return DIRECT_LABEL.to_string(),
    };

    if raw.starts_with("http")
        && let Ok(url) = Url::parse(raw)
        && let Some(host) = url.host_str()
        && !host.is_empty()
    {
        return host.to_string();
    }

    raw.to_string()
}
