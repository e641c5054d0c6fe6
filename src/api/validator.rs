// ==========================================
// KCCR 产品目录 - 请求参数校验
// ==========================================
// 职责: 路径 id、日期、必填文本等输入归一化
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

/// 解析正整数 id；空串、非数字、≤ 0 均返回 None
pub fn parse_positive_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

/// 必填文本：trim 后非空
pub fn required_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// 可选文本：空串视为 None（不 trim 内容本身）
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// 解析日期时间
///
/// 支持:
/// - RFC 3339（带时区，换算为 UTC）
/// - `YYYY-MM-DDTHH:MM[:SS[.f]]` / `YYYY-MM-DD HH:MM[:SS]`（视为 UTC）
/// - `YYYY-MM-DD`（当日 00:00）
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// JSON 真值判定（false / 0 / "" / null 为假）
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

/// 区分"缺失"与"显式 null"
///
/// 配合 `#[serde(default, deserialize_with = "present_or_null")]`：
/// - 缺失 → None
/// - null → Some(None)
/// - 值 → Some(Some(v))
pub fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
