use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use std::time::Duration;

use crate::config::DatabaseConfig;

/// 按配置建立连接池; 连接上限、获取超时和慢查询阈值均来自 `[database]`
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let slow_after = Duration::from_secs(config.slow_statement_secs);
    let connect_options = PgConnectOptions::from_str(&config.url)?
        .log_slow_statements(tracing::log::LevelFilter::Warn, slow_after);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(connect_options)
        .await?;

    tracing::debug!(
        max_connections = config.max_connections,
        slow_statement_secs = config.slow_statement_secs,
        "Postgres pool ready"
    );
    Ok(pool)
}
