use client_exposure::{api, create_pool, AppConfig, FinancialService, PgLedgerSource, SnapshotCache};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!(
        "Starting server on {}:{} (cache ttl {}s, query timeout {}s)",
        config.server.host,
        config.server.port,
        config.cache.ttl_secs,
        config.database.query_timeout_secs
    );

    // 创建数据库连接池
    let pool = create_pool(&config.database).await?;
    info!("Database pool created");

    let cache = Arc::new(SnapshotCache::new(config.cache.ttl()));
    let service = Arc::new(FinancialService::new(
        Arc::new(PgLedgerSource::new(pool)),
        cache,
        config.database.query_timeout(),
    ));

    let app = api::router(service).layer(ServiceBuilder::new());

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /api/clients/financial           - client exposure report");
    info!("  GET  /api/clients/financial/export    - CSV export");
    info!("  GET  /api/clients/:code/financial     - single client");
    info!("  PUT  /api/clients/:code/settings      - healthy volume / correction factor");
    info!("  POST /api/separations/:id/approve|reject");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
