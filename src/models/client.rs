use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// 规范化后的客户编码 (PES_CODIGO)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientCode(pub i64);

impl ClientCode {
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ClientCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 上游数据中客户编码的原始形态: 数字、字符串或 `{ "value": ... }` 对象
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawClientCode {
    Integer(i64),
    Float(f64),
    Text(String),
    Wrapped { value: Box<RawClientCode> },
}

impl From<i64> for RawClientCode {
    fn from(value: i64) -> Self {
        RawClientCode::Integer(value)
    }
}

impl From<&str> for RawClientCode {
    fn from(value: &str) -> Self {
        RawClientCode::Text(value.to_string())
    }
}

impl From<String> for RawClientCode {
    fn from(value: String) -> Self {
        RawClientCode::Text(value)
    }
}

impl From<ClientCode> for RawClientCode {
    fn from(value: ClientCode) -> Self {
        RawClientCode::Integer(value.0)
    }
}

/// 客户 (BK 财务模块)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "PES_CODIGO")]
    pub code: Option<RawClientCode>,
    #[serde(rename = "APELIDO")]
    pub alias: Option<String>,
    /// 健康开票量 (人工维护, 仅用于风险说明)
    #[serde(rename = "volume_saudavel_faturamento")]
    pub healthy_volume: Option<BigDecimal>,
    #[serde(rename = "fator_correcao")]
    pub correction_factor: Option<i32>,
}

impl Client {
    pub fn new(code: impl Into<RawClientCode>, alias: Option<&str>) -> Self {
        Self {
            code: Some(code.into()),
            alias: alias.map(str::to_string),
            healthy_volume: None,
            correction_factor: None,
        }
    }
}

/// 客户表行
#[derive(Debug, Clone, FromRow)]
pub struct ClientRow {
    #[sqlx(rename = "PES_CODIGO")]
    pub pes_codigo: i64,
    #[sqlx(rename = "APELIDO")]
    pub apelido: Option<String>,
    pub volume_saudavel_faturamento: Option<BigDecimal>,
    pub fator_correcao: Option<i32>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Self {
            code: Some(RawClientCode::Integer(row.pes_codigo)),
            alias: row.apelido,
            healthy_volume: row.volume_saudavel_faturamento,
            correction_factor: row.fator_correcao,
        }
    }
}

/// 管理表单可编辑的客户字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(rename = "volume_saudavel_faturamento")]
    pub healthy_volume: Option<BigDecimal>,
    #[serde(rename = "fator_correcao")]
    pub correction_factor: Option<i32>,
}
