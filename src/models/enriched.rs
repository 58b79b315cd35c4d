use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::client::{Client, ClientCode};
use super::separation::Separation;

/// 卡片风险等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Red,
    Amber,
    Green,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Red => "red",
            RiskLevel::Amber => "amber",
            RiskLevel::Green => "green",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 客户财务汇总记录 (派生数据, 不落库)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedClientRecord {
    #[serde(flatten)]
    pub client: Client,
    /// 规范化失败时为 `None`, 此时所有合计为 0
    pub client_code: Option<ClientCode>,
    pub total_billed: BigDecimal,
    pub total_open: BigDecimal,
    pub total_overdue: BigDecimal,
    pub separations: Vec<Separation>,
    pub representative_name: Option<String>,
    pub risk: RiskLevel,
    /// 命中单据中金额字段缺失的数量
    pub missing_amounts: usize,
    /// overdue <= open <= billed 是否成立
    pub totals_consistent: bool,
}

/// 组合层面的汇总
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub clients: usize,
    pub total_billed: BigDecimal,
    pub total_open: BigDecimal,
    pub total_overdue: BigDecimal,
    pub red: usize,
    pub amber: usize,
    pub green: usize,
}

impl PortfolioSummary {
    pub fn from_records(records: &[EnrichedClientRecord]) -> Self {
        let mut summary = PortfolioSummary::default();
        for record in records {
            summary.clients += 1;
            summary.total_billed += &record.total_billed;
            summary.total_open += &record.total_open;
            summary.total_overdue += &record.total_overdue;
            match record.risk {
                RiskLevel::Red => summary.red += 1,
                RiskLevel::Amber => summary.amber += 1,
                RiskLevel::Green => summary.green += 1,
            }
        }
        summary
    }
}

/// 看板报表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientReport {
    pub today: chrono::NaiveDate,
    pub summary: PortfolioSummary,
    pub clients: Vec<EnrichedClientRecord>,
}
