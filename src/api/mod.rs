pub mod handlers;
pub mod routes;
pub mod session;

use std::sync::Arc;

use crate::auth::SessionKeys;
use crate::config::{AppConfig, AuthConfig};
use crate::db::DashboardRepository;
use crate::service::{AuthService, DashboardService, InvoiceActions, PathRevalidator, Revalidator};

pub use routes::build_router;

/// 共享状态: 各服务共用同一个仓储与失效表
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<DashboardService>,
    pub actions: Arc<InvoiceActions>,
    pub auth: Arc<AuthService>,
    pub revalidator: Arc<dyn Revalidator>,
    pub repo: Arc<dyn DashboardRepository>,
    pub auth_config: Arc<AuthConfig>,
    pub seed_enabled: bool,
}

impl AppState {
    pub fn new(repo: Arc<dyn DashboardRepository>, config: &AppConfig) -> Self {
        let revalidator: Arc<dyn Revalidator> = Arc::new(PathRevalidator::new());
        let keys = SessionKeys::new(&config.auth);

        Self {
            dashboard: Arc::new(DashboardService::new(repo.clone())),
            actions: Arc::new(InvoiceActions::new(repo.clone(), revalidator.clone())),
            auth: Arc::new(AuthService::new(repo.clone(), keys)),
            revalidator,
            repo,
            auth_config: Arc::new(config.auth.clone()),
            seed_enabled: config.seed.enabled,
        }
    }
}
