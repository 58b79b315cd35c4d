use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use super::client::RawClientCode;

/// 拣货/打包申请 (Separação) 状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeparationStatus {
    Pending,
    Approved,
    Rejected,
}

impl SeparationStatus {
    /// 数据库中的存储值
    pub fn as_db_str(self) -> &'static str {
        match self {
            SeparationStatus::Pending => "pendente",
            SeparationStatus::Approved => "aprovado",
            SeparationStatus::Rejected => "rejeitado",
        }
    }

    /// 兼容葡语与英语写法, 未知值返回 `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pendente" | "pending" => Some(SeparationStatus::Pending),
            "aprovado" | "aprovada" | "approved" => Some(SeparationStatus::Approved),
            "rejeitado" | "rejeitada" | "rejected" => Some(SeparationStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for SeparationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

/// 审批动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparationAction {
    Approve,
    Reject,
}

impl SeparationAction {
    /// 只有待审批的申请可以流转; 其余状态返回 `None`
    pub fn apply(self, current: SeparationStatus) -> Option<SeparationStatus> {
        match (current, self) {
            (SeparationStatus::Pending, SeparationAction::Approve) => {
                Some(SeparationStatus::Approved)
            }
            (SeparationStatus::Pending, SeparationAction::Reject) => {
                Some(SeparationStatus::Rejected)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeparationItem {
    pub item_code: String,
    pub description: Option<String>,
    pub quantity: BigDecimal,
    pub unit_price: Option<BigDecimal>,
    pub total: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Separation {
    pub id: i64,
    #[serde(rename = "PES_CODIGO")]
    pub client_code: Option<RawClientCode>,
    pub status: SeparationStatus,
    pub total_value: BigDecimal,
    pub created_at: Option<NaiveDateTime>,
    pub items: Vec<SeparationItem>,
}

/// 申请主表行
#[derive(Debug, Clone, FromRow)]
pub struct SeparationRow {
    pub id: i64,
    #[sqlx(rename = "PES_CODIGO")]
    pub pes_codigo: Option<i64>,
    pub status: String,
    pub valor_total: Option<BigDecimal>,
    pub created_at: Option<NaiveDateTime>,
}

/// 申请明细行
#[derive(Debug, Clone, FromRow)]
pub struct SeparationItemRow {
    pub separacao_id: i64,
    pub codigo_item: String,
    pub descricao: Option<String>,
    pub quantidade: Option<BigDecimal>,
    pub valor_unitario: Option<BigDecimal>,
    pub valor_total: Option<BigDecimal>,
}

impl From<SeparationItemRow> for SeparationItem {
    fn from(row: SeparationItemRow) -> Self {
        Self {
            item_code: row.codigo_item,
            description: row.descricao,
            quantity: row.quantidade.unwrap_or_default(),
            unit_price: row.valor_unitario,
            total: row.valor_total.unwrap_or_default(),
        }
    }
}

impl SeparationRow {
    /// 未知状态的行被丢弃并记录告警
    pub fn into_separation(self, items: Vec<SeparationItem>) -> Option<Separation> {
        let Some(status) = SeparationStatus::parse(&self.status) else {
            tracing::warn!(
                "Separation {} has unknown status '{}', skipping",
                self.id,
                self.status
            );
            return None;
        };

        Some(Separation {
            id: self.id,
            client_code: self.pes_codigo.map(RawClientCode::Integer),
            status,
            total_value: self.valor_total.unwrap_or_default(),
            created_at: self.created_at,
            items,
        })
    }
}
