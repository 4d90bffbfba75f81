pub mod pool;
pub mod queries;
pub mod repository;
pub mod seed;

pub use pool::create_pool;
pub use repository::{DashboardRepository, PgRepository};
pub use seed::{SeedError, SeedSummary};
