use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::client::RawClientCode;

/// 销售代表编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepresentativeCode(pub i64);

/// 代表名录 (codigo_representante -> nome_representante)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Representative {
    #[sqlx(rename = "codigo_representante")]
    #[serde(rename = "codigo_representante")]
    pub code: i64,
    #[sqlx(rename = "nome_representante")]
    #[serde(rename = "nome_representante")]
    pub name: String,
}

/// 用于关联客户与代表的订单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepresentativeOrder {
    #[serde(rename = "PED_NUMPEDIDO")]
    pub order_number: String,
    #[serde(rename = "REPRESENTANTE")]
    pub representative: Option<i64>,
    #[serde(rename = "PES_CODIGO")]
    pub client_code: Option<RawClientCode>,
    #[serde(rename = "DATA_PEDIDO")]
    pub ordered_at: Option<NaiveDateTime>,
}

/// 订单表行
#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    #[sqlx(rename = "PED_NUMPEDIDO")]
    pub ped_numpedido: String,
    #[sqlx(rename = "REPRESENTANTE")]
    pub representante: Option<i64>,
    #[sqlx(rename = "PES_CODIGO")]
    pub pes_codigo: Option<i64>,
    #[sqlx(rename = "DATA_PEDIDO")]
    pub data_pedido: Option<NaiveDateTime>,
}

impl From<OrderRow> for RepresentativeOrder {
    fn from(row: OrderRow) -> Self {
        Self {
            order_number: row.ped_numpedido,
            representative: row.representante,
            client_code: row.pes_codigo.map(RawClientCode::Integer),
            ordered_at: row.data_pedido,
        }
    }
}
