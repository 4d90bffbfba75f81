use acme_dashboard::{build_router, create_pool, AppConfig, AppState, DashboardRepository, PgRepository};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 创建数据库连接池
    let pool = create_pool(&config.database).await?;
    info!("Database pool created");

    let repo: Arc<dyn DashboardRepository> = Arc::new(PgRepository::new(pool));
    let app = build_router(AppState::new(repo, &config));

    // 启动服务器
    let addr = config.listen_addr();
    info!("Server listening on {}", addr);
    info!("Endpoints:");
    info!("  GET  /dashboard                   - overview (cards, revenue chart, latest invoices)");
    info!("  GET  /dashboard/invoices          - search + paginate invoices");
    info!("  POST /dashboard/invoices          - create invoice");
    info!("  GET  /dashboard/customers         - customer summaries");
    info!("  POST /login, POST /logout         - credentials session");
    if config.seed.enabled {
        info!("  GET  /api/seed                    - load demo data");
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
