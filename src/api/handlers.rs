use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::error::{AppError, AppResult};
use crate::models::{
    Client, ClientCode, ClientReport, ClientSettings, EnrichedClientRecord, Separation,
};
use crate::service::export::to_csv_string;
use crate::service::FinancialService;
use axum::{
    extract::{Json, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::sync::Arc;

/// 查询参数: 参考日期与搜索词
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub today: Option<NaiveDate>,
    pub search: Option<String>,
}

impl ReportQuery {
    /// 未指定日期时使用服务器本地日期
    fn reference_date(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 客户财务看板
pub async fn client_report(
    State(service): State<Arc<FinancialService>>,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> AppResult<Json<ClientReport>> {
    let report = service
        .client_report(query.reference_date(), query.search.as_deref())
        .await?;
    Ok(Json(report))
}

/// 看板导出 CSV
pub async fn export_client_report(
    State(service): State<Arc<FinancialService>>,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> AppResult<Response> {
    let report = service
        .client_report(query.reference_date(), query.search.as_deref())
        .await?;
    let body = to_csv_string(&report.clients)?;

    let filename = format!("attachment; filename=\"clientes-{}.csv\"", report.today);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, filename),
        ],
        body,
    )
        .into_response())
}

/// 单个客户
pub async fn client_record(
    State(service): State<Arc<FinancialService>>,
    ApiPath(code): ApiPath<String>,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> AppResult<Json<EnrichedClientRecord>> {
    let code = parse_code(&code)?;
    let record = service.client_record(code, query.reference_date()).await?;
    Ok(Json(record))
}

/// 管理表单更新
pub async fn update_client_settings(
    State(service): State<Arc<FinancialService>>,
    ApiPath(code): ApiPath<String>,
    ApiJson(settings): ApiJson<ClientSettings>,
) -> AppResult<Json<Client>> {
    let code = parse_code(&code)?;
    let client = service.update_client_settings(code, settings).await?;
    Ok(Json(client))
}

pub async fn approve_separation(
    State(service): State<Arc<FinancialService>>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Separation>> {
    Ok(Json(service.approve_separation(id).await?))
}

pub async fn reject_separation(
    State(service): State<Arc<FinancialService>>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Separation>> {
    Ok(Json(service.reject_separation(id).await?))
}

fn parse_code(raw: &str) -> AppResult<ClientCode> {
    crate::service::normalize_client_code(&raw.into())
        .ok_or_else(|| AppError::Validation(format!("invalid client code '{}'", raw)))
}
