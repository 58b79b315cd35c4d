use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

use super::client::RawClientCode;

/// 财务单据 (Título) - 来自外部账簿, 只读
///
/// 金额字段缺失 (`None`) 与金额为零是两种不同状态; 汇总时缺失按 0 计,
/// 但会被单独计数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    #[serde(rename = "PES_CODIGO")]
    pub client_code: Option<RawClientCode>,
    /// 票面金额
    #[serde(rename = "VLRTITULO")]
    pub full_amount: Option<BigDecimal>,
    /// 剩余未付金额
    #[serde(rename = "VLRSALDO")]
    pub remaining_balance: Option<BigDecimal>,
    #[serde(rename = "DTVENCIMENTO")]
    pub due_date: Option<String>,
}

impl Title {
    /// 测试与演示用的便捷构造, 金额用十进制字符串表示
    pub fn new(
        client_code: impl Into<RawClientCode>,
        full_amount: &str,
        remaining_balance: &str,
        due_date: &str,
    ) -> Self {
        Self {
            client_code: Some(client_code.into()),
            full_amount: BigDecimal::from_str(full_amount).ok(),
            remaining_balance: BigDecimal::from_str(remaining_balance).ok(),
            due_date: Some(due_date.to_string()),
        }
    }

    /// 任一金额字段缺失
    pub fn has_missing_amount(&self) -> bool {
        self.full_amount.is_none() || self.remaining_balance.is_none()
    }
}

/// 单据表行; PES_CODIGO 与 DTVENCIMENTO 均以文本读取, 由领域层解析
#[derive(Debug, Clone, FromRow)]
pub struct TitleRow {
    #[sqlx(rename = "PES_CODIGO")]
    pub pes_codigo: Option<String>,
    #[sqlx(rename = "VLRTITULO")]
    pub vlr_titulo: Option<BigDecimal>,
    #[sqlx(rename = "VLRSALDO")]
    pub vlr_saldo: Option<BigDecimal>,
    #[sqlx(rename = "DTVENCIMENTO")]
    pub dt_vencimento: Option<String>,
}

impl From<TitleRow> for Title {
    fn from(row: TitleRow) -> Self {
        Self {
            client_code: row.pes_codigo.map(RawClientCode::Text),
            full_amount: row.vlr_titulo,
            remaining_balance: row.vlr_saldo,
            due_date: row.dt_vencimento,
        }
    }
}
