pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;
pub mod utils;

pub use api::{build_router, AppState};
pub use config::AppConfig;
pub use db::{create_pool, DashboardRepository, PgRepository};
pub use error::{AppError, AppResult};
pub use service::{DashboardService, InvoiceActions};
