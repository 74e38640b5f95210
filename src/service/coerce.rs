//! 字段规整: 文本、数值、定长填充、日期

use crate::models::Scalar;
use bigdecimal::{BigDecimal, RoundingMode, Zero};
use chrono::{Datelike, NaiveDate};
use std::borrow::Cow;
use std::str::FromStr;

/// 日期解析失败时的占位
pub const NO_DATE: &str = "00000000";

/// 十进制指数上限, 超出视为无法解析 (避免 `1e999999999` 展开成巨型整数)
const MAX_DECIMAL_SCALE: i64 = 64;

/// 原样转文本, 缺失为空串
pub fn text(v: Option<&Scalar>) -> String {
    v.map(|s| s.to_string()).unwrap_or_default()
}

/// 空值 (缺失、空串、0) 时取默认值
pub fn text_or(v: Option<&Scalar>, default: &str) -> String {
    match v {
        Some(s) if !s.is_blank() => s.to_string(),
        _ => default.to_string(),
    }
}

pub fn is_blank(v: Option<&Scalar>) -> bool {
    v.map_or(true, Scalar::is_blank)
}

/// 可解析的数值文本; 缺失、空串、"null" 返回 None
fn numeric_text(v: Option<&Scalar>) -> Option<Cow<'_, str>> {
    match v? {
        Scalar::Number(n) => Some(Cow::Owned(n.to_string())),
        Scalar::Text(s) => {
            let s = s.trim();
            if s.is_empty() || s == "null" {
                None
            } else {
                Some(Cow::Borrowed(s))
            }
        }
        Scalar::Flag(b) => Some(Cow::Borrowed(if *b { "1" } else { "0" })),
    }
}

/// 缺失、空串或 "null" (0 不算缺失)
pub fn is_missing(v: Option<&Scalar>) -> bool {
    numeric_text(v).is_none()
}

/// 数值强转: 缺失 / 空 / "null" / 无法解析 一律 0.0
///
/// 与 `to_decimal` 同一套规则的 f64 版本, 供库调用方使用; 版式内部金额一律走 `to_decimal`
pub fn to_f64(v: Option<&Scalar>) -> f64 {
    match v {
        Some(Scalar::Number(n)) => n.as_f64().unwrap_or(0.0),
        other => numeric_text(other)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|f| f.is_finite())
            .unwrap_or(0.0),
    }
}

/// 解析为十进制; 空值、无法解析或指数超限返回 None
pub fn parse_decimal(v: Option<&Scalar>) -> Option<BigDecimal> {
    let s = numeric_text(v)?;
    match BigDecimal::from_str(&s) {
        Ok(d) if d.fractional_digit_count().abs() <= MAX_DECIMAL_SCALE => Some(d),
        Ok(_) => {
            tracing::debug!("amount out of range {:?}", s);
            None
        }
        Err(_) => {
            tracing::debug!("unparseable amount {:?}", s);
            None
        }
    }
}

/// 金额强转, 规则同 `to_f64`
pub fn to_decimal(v: Option<&Scalar>) -> BigDecimal {
    parse_decimal(v).unwrap_or_else(BigDecimal::zero)
}

/// 两位小数, 四舍五入 (远离零)
pub fn round2(v: &BigDecimal) -> BigDecimal {
    v.with_scale_round(2, RoundingMode::HalfUp)
}

/// `0.00` 形式文本
pub fn fixed2(v: &BigDecimal) -> String {
    round2(v).to_string()
}

/// 右补空格, 超长截断
pub fn pad_right(value: &str, width: usize) -> String {
    pad(value, width, ' ', false)
}

/// 左补 `fill`, 超长截断 (保留左侧)
pub fn pad_left(value: &str, width: usize, fill: char) -> String {
    pad(value, width, fill, true)
}

fn pad(value: &str, width: usize, fill: char, left: bool) -> String {
    let head: String = value.chars().take(width).collect();
    let filler: String = std::iter::repeat(fill)
        .take(width - head.chars().count())
        .collect();
    if left {
        filler + &head
    } else {
        head + &filler
    }
}

/// 左补零到至少 `width` 位, 不截断; 符号保留在最前
pub fn zfill(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    let zeros = "0".repeat(width - len);
    match value.strip_prefix(|c: char| c == '+' || c == '-') {
        Some(rest) => format!("{}{}{}", &value[..1], zeros, rest),
        None => zeros + value,
    }
}

pub fn only_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// 金额定长字段: `0.00` 文本左补零
pub fn amount_field(v: &BigDecimal, width: usize) -> String {
    pad_left(&fixed2(v), width, '0')
}

/// 日期转 `YYYYMMDD`
///
/// 支持 `YYYY-MM-DD`, `DD/MM/YYYY`, `YYYY/MM/DD`, `DDMMYYYY`; 其他一律 `00000000`
pub fn date_yyyymmdd(value: &str) -> String {
    let s = value.trim();
    if s.is_empty() {
        return NO_DATE.to_string();
    }
    let head: String = s.chars().take(10).collect();

    let format = if s.contains('-') {
        "%Y-%m-%d"
    } else if s.contains('/') {
        let first = s.split('/').next().unwrap_or_default();
        if first.chars().count() == 4 {
            "%Y/%m/%d"
        } else {
            "%d/%m/%Y"
        }
    } else if s.chars().count() == 8 {
        "%d%m%Y"
    } else {
        return NO_DATE.to_string();
    };

    match NaiveDate::parse_from_str(&head, format) {
        Ok(date) if (1000..=9999).contains(&date.year()) => date.format("%Y%m%d").to_string(),
        _ => {
            tracing::debug!("unparseable date {:?}", value);
            NO_DATE.to_string()
        }
    }
}
