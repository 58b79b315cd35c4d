pub mod extract;
pub mod handlers;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::service::FinancialService;

pub use handlers::*;

/// 构建路由
pub fn router(service: Arc<FinancialService>) -> Router {
    let financial_routes = Router::new()
        .route("/api/clients/financial", get(handlers::client_report))
        .route(
            "/api/clients/financial/export",
            get(handlers::export_client_report),
        )
        .route("/api/clients/:code/financial", get(handlers::client_record))
        .route(
            "/api/clients/:code/settings",
            put(handlers::update_client_settings),
        )
        .route(
            "/api/separations/:id/approve",
            post(handlers::approve_separation),
        )
        .route(
            "/api/separations/:id/reject",
            post(handlers::reject_separation),
        )
        .with_state(service);

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(financial_routes)
}
