use bigdecimal::{BigDecimal, Zero};

use crate::models::RiskLevel;

/// 未结余额超过该值 (且无逾期) 时为黄色
pub const AMBER_OPEN_THRESHOLD: i64 = 5000;

/// 风险分级: 有逾期即红色, 否则未结余额超过阈值为黄色, 其余绿色。
/// 缺失值按 0 处理。
pub fn classify(overdue_total: Option<&BigDecimal>, open_total: Option<&BigDecimal>) -> RiskLevel {
    let zero = BigDecimal::zero();
    let overdue = overdue_total.unwrap_or(&zero);
    let open = open_total.unwrap_or(&zero);

    if *overdue > zero {
        RiskLevel::Red
    } else if *open > BigDecimal::from(AMBER_OPEN_THRESHOLD) {
        RiskLevel::Amber
    } else {
        RiskLevel::Green
    }
}
