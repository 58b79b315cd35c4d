//! 客户编码规范化
//!
//! 上游的 PES_CODIGO 可能是数字、数字字符串或带 `value` 字段的对象。
//! 无法解析时返回 `None`, 调用方视为"无法关联", 从不报错。

use crate::models::{ClientCode, RawClientCode};

/// 将任意形态的客户编码转换为规范数字编码
pub fn normalize_client_code(raw: &RawClientCode) -> Option<ClientCode> {
    match raw {
        RawClientCode::Integer(n) => Some(ClientCode(*n)),
        RawClientCode::Float(f) => integral_float(*f),
        RawClientCode::Text(s) => parse_code_text(s),
        RawClientCode::Wrapped { value } => normalize_client_code(value),
    }
}

/// `Option` 版本, 便于直接作用于可空字段
pub fn normalize_optional(raw: Option<&RawClientCode>) -> Option<ClientCode> {
    raw.and_then(normalize_client_code)
}

fn parse_code_text(text: &str) -> Option<ClientCode> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(ClientCode(n));
    }
    trimmed.parse::<f64>().ok().and_then(integral_float)
}

fn integral_float(f: f64) -> Option<ClientCode> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= i64::MAX as f64 {
        Some(ClientCode(f as i64))
    } else {
        None
    }
}
