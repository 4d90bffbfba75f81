//! 金额、日期、图表坐标的展示格式化. 均为纯函数, 不会失败.

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Locale, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::models::Revenue;

pub const DEFAULT_LOCALE: &str = "en-US";
pub const INVALID_DATE: &str = "Invalid Date";

/// 分 -> 美元展示, 例如 `123456 -> "$1,234.56"`, `-5000 -> "-$50.00"`
pub fn format_currency(minor_units: i64) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let abs = minor_units.unsigned_abs();
    format!("{}${}.{:02}", sign, group_thousands(abs / 100), abs % 100)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// 金额允许的最大指数 (小数位或 10 的幂次)
pub const MAX_AMOUNT_EXPONENT: i64 = 12;

/// 指数超出范围的金额在比较或缩放时会展开成巨大的整数, 需先拒绝
pub fn exponent_in_range(amount: &BigDecimal) -> bool {
    let (_, scale) = amount.as_bigint_and_exponent();
    (-MAX_AMOUNT_EXPONENT..=MAX_AMOUNT_EXPONENT).contains(&scale)
}

/// 表单金额 (美元) 转为分, 四舍五入到整数分; 超出 i64 或指数越界时返回 None
pub fn dollars_to_cents(amount: &BigDecimal) -> Option<i64> {
    if !exponent_in_range(amount) || amount.abs() > BigDecimal::from(i64::MAX / 100) {
        return None;
    }
    // 只需保留一位用于舍入的小数
    (&amount.with_scale(3) * &BigDecimal::from(100))
        .round(0)
        .to_i64()
}

/// 分转为两位小数的美元金额 (编辑表单回填)
pub fn cents_to_dollars(minor_units: i64) -> BigDecimal {
    BigDecimal::new(minor_units.into(), 2)
}

/// 解析 ISO-8601 日期/时间并按区域格式化; 解析失败返回 "Invalid Date"
pub fn format_date_to_local(input: &str, locale: Option<&str>) -> String {
    match parse_date(input) {
        Some(date) => format_date(date, locale),
        None => INVALID_DATE.to_string(),
    }
}

/// 日期时间一律按 UTC 取日期部分
fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

pub fn format_date(date: NaiveDate, locale: Option<&str>) -> String {
    let (locale, pattern) = resolve_locale(locale.unwrap_or(DEFAULT_LOCALE));
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
        .format_localized(pattern, locale)
        .to_string()
}

/// BCP 47 标签 ("de-DE") -> chrono 区域 + 日月年顺序; 未知标签退回 en-US
fn resolve_locale(tag: &str) -> (Locale, &'static str) {
    let normalized = tag.trim().replace('-', "_");
    let Ok(locale) = Locale::try_from(normalized.as_str()) else {
        return (Locale::en_US, "%b %-d, %Y");
    };

    let pattern = match normalized.split('_').next() {
        Some("en") if normalized == "en_US" => "%b %-d, %Y",
        Some("de") => "%-d. %b %Y",
        _ => "%-d %b %Y",
    };
    (locale, pattern)
}

/// 收入图表的 Y 轴
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YAxis {
    pub top_label: i64,
    pub y_axis_labels: Vec<String>,
}

/// 最大收入向上取整到 1000 的倍数, 生成 "$NK" 降序标签, 最后一个总是 "$0K"
pub fn generate_y_axis(revenue: &[Revenue]) -> YAxis {
    let highest = revenue
        .iter()
        .map(|r| i64::from(r.revenue))
        .max()
        .unwrap_or(0)
        .max(0);
    let top_label = (highest + 999) / 1000 * 1000;

    let y_axis_labels = (0..=top_label / 1000)
        .rev()
        .map(|k| format!("${}K", k))
        .collect();

    YAxis {
        top_label,
        y_axis_labels,
    }
}
