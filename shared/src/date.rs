//! 时间格式模块
//!
//! 表单使用 `<input type="datetime-local">` 的格式 (`YYYY-MM-DDTHH:MM`)，
//! 后端存储带 `Z` 后缀的 ISO 字符串。管理员输入的"墙上时间"原样保存：
//! 本地时间被直接标记为 UTC，不做时区换算。

use chrono::{DateTime, NaiveDateTime};

/// `datetime-local` 输入框格式
pub const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";
/// 发送给后端的格式
pub const BACKEND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
/// 列表/卡片展示格式
pub const DISPLAY_FORMAT: &str = "%a, %b %-d %Y %-I:%M %p";

/// 解析任意来源的时间字符串为墙上时间
///
/// 依次尝试：RFC 3339（取其本地部分）、带秒的 naive 格式、输入框格式。
pub fn parse_wall_clock(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, INPUT_FORMAT))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// 输入框值 -> 后端值
pub fn to_backend(input: &str) -> Option<String> {
    parse_wall_clock(input).map(|dt| dt.format(BACKEND_FORMAT).to_string())
}

/// 后端值 -> 输入框值，无法解析时返回空串（输入框显示为空）
pub fn to_input(backend: &str) -> String {
    parse_wall_clock(backend)
        .map(|dt| dt.format(INPUT_FORMAT).to_string())
        .unwrap_or_default()
}

/// 后端值 -> 展示文本，无法解析时原样返回
pub fn display(backend: &str) -> String {
    parse_wall_clock(backend)
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| backend.to_string())
}

/// 将 `NaiveDateTime` 格式化为输入框值（用于表单默认值）
pub fn input_value(dt: NaiveDateTime) -> String {
    dt.format(INPUT_FORMAT).to_string()
}
