use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::queries;
use super::seed::{self, SeedError, SeedSummary};
use crate::models::{
    CardMetrics, CustomerField, CustomerTableRow, Invoice, InvoiceDraft, InvoiceRecord,
    InvoiceTableRow, LatestInvoiceRow, NewInvoice, Revenue, User,
};

/// 仪表盘的存储接口: 每个读写操作一个方法
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    async fn fetch_revenue(&self) -> Result<Vec<Revenue>, sqlx::Error>;

    async fn fetch_latest_invoices(&self) -> Result<Vec<LatestInvoiceRow>, sqlx::Error>;

    async fn fetch_card_metrics(&self) -> Result<CardMetrics, sqlx::Error>;

    async fn fetch_filtered_invoices(
        &self,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<InvoiceTableRow>, sqlx::Error>;

    async fn count_filtered_invoices(&self, query: &str) -> Result<i64, sqlx::Error>;

    async fn fetch_invoice_by_id(&self, id: Uuid) -> Result<Option<InvoiceRecord>, sqlx::Error>;

    async fn fetch_customers(&self) -> Result<Vec<CustomerField>, sqlx::Error>;

    async fn fetch_filtered_customers(&self, query: &str)
        -> Result<Vec<CustomerTableRow>, sqlx::Error>;

    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, sqlx::Error>;

    /// 返回是否有行被更新
    async fn update_invoice(&self, id: Uuid, draft: &InvoiceDraft) -> Result<bool, sqlx::Error>;

    /// 返回是否有行被删除
    async fn delete_invoice(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;

    async fn seed(&self, generated: &[NewInvoice]) -> Result<SeedSummary, SeedError>;
}

/// PostgreSQL 实现
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DashboardRepository for PgRepository {
    async fn fetch_revenue(&self) -> Result<Vec<Revenue>, sqlx::Error> {
        queries::fetch_revenue(&self.pool).await
    }

    async fn fetch_latest_invoices(&self) -> Result<Vec<LatestInvoiceRow>, sqlx::Error> {
        queries::fetch_latest_invoices(&self.pool).await
    }

    async fn fetch_card_metrics(&self) -> Result<CardMetrics, sqlx::Error> {
        queries::fetch_card_metrics(&self.pool).await
    }

    async fn fetch_filtered_invoices(
        &self,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<InvoiceTableRow>, sqlx::Error> {
        queries::fetch_filtered_invoices(&self.pool, query, limit, offset).await
    }

    async fn count_filtered_invoices(&self, query: &str) -> Result<i64, sqlx::Error> {
        queries::count_filtered_invoices(&self.pool, query).await
    }

    async fn fetch_invoice_by_id(&self, id: Uuid) -> Result<Option<InvoiceRecord>, sqlx::Error> {
        queries::fetch_invoice_by_id(&self.pool, id).await
    }

    async fn fetch_customers(&self) -> Result<Vec<CustomerField>, sqlx::Error> {
        queries::fetch_customers(&self.pool).await
    }

    async fn fetch_filtered_customers(
        &self,
        query: &str,
    ) -> Result<Vec<CustomerTableRow>, sqlx::Error> {
        queries::fetch_filtered_customers(&self.pool, query).await
    }

    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, sqlx::Error> {
        queries::insert_invoice(&self.pool, invoice).await
    }

    async fn update_invoice(&self, id: Uuid, draft: &InvoiceDraft) -> Result<bool, sqlx::Error> {
        queries::update_invoice(&self.pool, id, draft).await
    }

    async fn delete_invoice(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        queries::delete_invoice(&self.pool, id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        queries::find_user_by_email(&self.pool, email).await
    }

    async fn seed(&self, generated: &[NewInvoice]) -> Result<SeedSummary, SeedError> {
        seed::seed_database(&self.pool, generated).await
    }
}
