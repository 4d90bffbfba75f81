use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// 慢查询日志阈值 (秒)
    pub slow_statement_secs: u64,
}

/// 会话策略与路由配置
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub cookie_name: String,
    pub secure_cookie: bool,
    /// 会话和令牌的最长有效期 (秒)
    pub session_max_age_secs: i64,
    /// 令牌签发超过该时长后, 下一次受保护请求会重新签发 (秒)
    pub session_update_age_secs: i64,
    pub login_path: String,
    pub home_path: String,
    pub protected_prefix: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[hidden]")
            .field("cookie_name", &self.cookie_name)
            .field("secure_cookie", &self.secure_cookie)
            .field("session_max_age_secs", &self.session_max_age_secs)
            .field("session_update_age_secs", &self.session_update_age_secs)
            .field("login_path", &self.login_path)
            .field("home_path", &self.home_path)
            .field("protected_prefix", &self.protected_prefix)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/acme_dashboard".to_string(),
                max_connections: 20,
                acquire_timeout_secs: 10,
                slow_statement_secs: 5,
            },
            auth: AuthConfig::default(),
            seed: SeedConfig { enabled: true },
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            cookie_name: "acme.session-token".to_string(),
            secure_cookie: false,
            session_max_age_secs: 30 * 60,
            session_update_age_secs: 5 * 60,
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
            protected_prefix: "/dashboard".to_string(),
        }
    }
}

impl AppConfig {
    /// 加载配置: 内置默认值 -> config/default.toml -> ACME__* 环境变量
    /// 签名密钥没有默认值, 必须通过 ACME__AUTH__JWT_SECRET 提供
    pub fn load() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&AppConfig::default())?;

        let mut builder = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("ACME").separator("__"));

        // 兼容常见的 DATABASE_URL
        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", url)?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()
    }

    pub fn validate(self) -> Result<Self, config::ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "auth.jwt_secret is not set (ACME__AUTH__JWT_SECRET)".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
