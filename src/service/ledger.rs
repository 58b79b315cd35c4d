use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

use crate::models::{ClientCode, Title};
use crate::service::normalize::normalize_optional;

/// 单个客户的单据合计
#[derive(Debug, Clone, PartialEq)]
pub struct TitleTotals {
    pub open_balance: BigDecimal,
    pub overdue_balance: BigDecimal,
    pub gross_total: BigDecimal,
    pub missing_amounts: usize,
}

impl TitleTotals {
    pub fn zero() -> Self {
        Self {
            open_balance: BigDecimal::zero(),
            overdue_balance: BigDecimal::zero(),
            gross_total: BigDecimal::zero(),
            missing_amounts: 0,
        }
    }

    /// overdue <= open <= gross; 只报告, 不修正
    pub fn is_consistent(&self) -> bool {
        self.overdue_balance <= self.open_balance && self.open_balance <= self.gross_total
    }
}

/// 解析到期日; 无法解析返回 `None`, 该单据永远不进入逾期合计
pub fn parse_due_date(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

/// 按客户编码建立的单据倒排索引
///
/// 单据一次性按规范化编码分组, 之后每个客户的查询只扫描自己的单据。
/// 编码无法规范化的单据不进入任何分组。
#[derive(Debug, Default)]
pub struct TitleLedger<'a> {
    by_client: HashMap<ClientCode, Vec<&'a Title>>,
    unmatched: usize,
}

impl<'a> TitleLedger<'a> {
    pub fn from_titles(titles: &'a [Title]) -> Self {
        let mut by_client: HashMap<ClientCode, Vec<&'a Title>> = HashMap::new();
        let mut unmatched = 0;

        for title in titles {
            match normalize_optional(title.client_code.as_ref()) {
                Some(code) => by_client.entry(code).or_default().push(title),
                None => unmatched += 1,
            }
        }

        if unmatched > 0 {
            tracing::debug!("{} titles have no usable client code", unmatched);
        }

        Self { by_client, unmatched }
    }

    fn titles_for(&self, code: ClientCode) -> &[&'a Title] {
        self.by_client.get(&code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Σ VLRSALDO
    pub fn open_balance(&self, code: ClientCode) -> BigDecimal {
        let mut sum = BigDecimal::zero();
        for title in self.titles_for(code) {
            if let Some(balance) = &title.remaining_balance {
                sum += balance;
            }
        }
        sum
    }

    /// Σ VLRSALDO, 仅限到期日早于 `today` 且余额为正的单据
    pub fn overdue_balance(&self, code: ClientCode, today: NaiveDate) -> BigDecimal {
        let Some(cutoff) = today.and_hms_opt(0, 0, 0) else {
            return BigDecimal::zero();
        };

        let mut sum = BigDecimal::zero();
        for title in self.titles_for(code) {
            let Some(balance) = &title.remaining_balance else {
                continue;
            };
            if *balance <= BigDecimal::zero() {
                continue;
            }
            let overdue = title
                .due_date
                .as_deref()
                .and_then(parse_due_date)
                .is_some_and(|due| due < cutoff);
            if overdue {
                sum += balance;
            }
        }
        sum
    }

    /// Σ VLRTITULO
    pub fn gross_total(&self, code: ClientCode) -> BigDecimal {
        let mut sum = BigDecimal::zero();
        for title in self.titles_for(code) {
            if let Some(amount) = &title.full_amount {
                sum += amount;
            }
        }
        sum
    }

    pub fn missing_amounts(&self, code: ClientCode) -> usize {
        self.titles_for(code)
            .iter()
            .filter(|t| t.has_missing_amount())
            .count()
    }

    pub fn totals(&self, code: ClientCode, today: NaiveDate) -> TitleTotals {
        TitleTotals {
            open_balance: self.open_balance(code),
            overdue_balance: self.overdue_balance(code, today),
            gross_total: self.gross_total(code),
            missing_amounts: self.missing_amounts(code),
        }
    }

    pub fn client_count(&self) -> usize {
        self.by_client.len()
    }

    pub fn unmatched_count(&self) -> usize {
        self.unmatched
    }
}
