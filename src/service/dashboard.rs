use std::sync::Arc;
use uuid::Uuid;

use crate::db::DashboardRepository;
use crate::error::{AppError, AppResult};
use crate::models::{
    CardData, CustomerField, CustomerRow, CustomersPage, DashboardOverview, InvoiceEditView,
    InvoiceRow, InvoicesPage, LatestInvoice, Revenue, RevenueChart, sort_by_month,
};
use crate::utils::{
    cents_to_dollars, format_currency, format_date, generate_pagination, generate_y_axis,
    page_offset, total_pages, ITEMS_PER_PAGE,
};

/// 收入图表高度 (像素)
pub const CHART_HEIGHT: u32 = 350;

/// 仪表盘读取服务: 查询存储并整理成展示用的视图模型
pub struct DashboardService {
    repo: Arc<dyn DashboardRepository>,
}

impl DashboardService {
    pub fn new(repo: Arc<dyn DashboardRepository>) -> Self {
        Self { repo }
    }

    /// 按日历月份返回, 不依赖存储的返回顺序
    pub async fn fetch_revenue(&self) -> AppResult<Vec<Revenue>> {
        let mut revenue = self
            .repo
            .fetch_revenue()
            .await
            .map_err(|e| AppError::database("Failed to fetch revenue data.", e))?;

        sort_by_month(&mut revenue);
        Ok(revenue)
    }

    pub async fn fetch_latest_invoices(&self) -> AppResult<Vec<LatestInvoice>> {
        let rows = self
            .repo
            .fetch_latest_invoices()
            .await
            .map_err(|e| AppError::database("Failed to fetch the latest invoices.", e))?;

        Ok(rows
            .into_iter()
            .map(|row| LatestInvoice {
                id: row.id,
                name: row.name,
                image_url: row.image_url,
                email: row.email,
                amount: format_currency(i64::from(row.amount)),
            })
            .collect())
    }

    pub async fn fetch_card_data(&self) -> AppResult<CardData> {
        let metrics = self
            .repo
            .fetch_card_metrics()
            .await
            .map_err(|e| AppError::database("Failed to fetch card data.", e))?;

        Ok(CardData {
            number_of_invoices: metrics.number_of_invoices,
            number_of_customers: metrics.number_of_customers,
            total_paid_invoices: format_currency(metrics.total_paid),
            total_pending_invoices: format_currency(metrics.total_pending),
        })
    }

    pub async fn fetch_filtered_invoices(&self, query: &str, page: u32) -> AppResult<Vec<InvoiceRow>> {
        let rows = self
            .repo
            .fetch_filtered_invoices(
                query,
                i64::from(ITEMS_PER_PAGE),
                page_offset(page, ITEMS_PER_PAGE),
            )
            .await
            .map_err(|e| AppError::database("Failed to fetch invoices.", e))?;

        Ok(rows
            .into_iter()
            .map(|row| InvoiceRow {
                id: row.id,
                customer_id: row.customer_id,
                name: row.name,
                email: row.email,
                image_url: row.image_url,
                date: format_date(row.date, None),
                amount: format_currency(i64::from(row.amount)),
                status: row.status,
            })
            .collect())
    }

    pub async fn fetch_invoices_pages(&self, query: &str) -> AppResult<u32> {
        let count = self
            .repo
            .count_filtered_invoices(query)
            .await
            .map_err(|e| AppError::database("Failed to fetch total number of invoices.", e))?;

        Ok(total_pages(count, ITEMS_PER_PAGE))
    }

    /// 金额转换为美元供编辑表单使用; 不存在时返回 None
    pub async fn fetch_invoice_by_id(&self, id: Uuid) -> AppResult<Option<InvoiceEditView>> {
        let record = self
            .repo
            .fetch_invoice_by_id(id)
            .await
            .map_err(|e| AppError::database("Failed to fetch invoice.", e))?;

        Ok(record.map(|r| InvoiceEditView {
            id: r.id,
            customer_id: r.customer_id,
            amount: cents_to_dollars(i64::from(r.amount)),
            status: r.status,
        }))
    }

    pub async fn fetch_customers(&self) -> AppResult<Vec<CustomerField>> {
        self.repo
            .fetch_customers()
            .await
            .map_err(|e| AppError::database("Failed to fetch all customers.", e))
    }

    pub async fn fetch_filtered_customers(&self, query: &str) -> AppResult<Vec<CustomerRow>> {
        let rows = self
            .repo
            .fetch_filtered_customers(query)
            .await
            .map_err(|e| AppError::database("Failed to fetch customer table.", e))?;

        Ok(rows
            .into_iter()
            .map(|row| CustomerRow {
                id: row.id,
                name: row.name,
                email: row.email,
                image_url: row.image_url,
                total_invoices: row.total_invoices,
                total_pending: format_currency(row.total_pending),
                total_paid: format_currency(row.total_paid),
            })
            .collect())
    }

    /// 收入读取失败时渲染空图表, 不影响仪表盘其余部分
    pub async fn revenue_chart(&self) -> RevenueChart {
        let revenue = match self.fetch_revenue().await {
            Ok(revenue) => revenue,
            Err(e) => {
                tracing::warn!("Rendering empty revenue chart: {}", e);
                Vec::new()
            }
        };

        RevenueChart {
            y_axis: generate_y_axis(&revenue),
            revenue,
            chart_height: CHART_HEIGHT,
        }
    }

    pub async fn overview(&self, signed_in_as: &str) -> AppResult<DashboardOverview> {
        let (cards, latest_invoices, revenue_chart) = tokio::join!(
            self.fetch_card_data(),
            self.fetch_latest_invoices(),
            self.revenue_chart(),
        );

        Ok(DashboardOverview {
            signed_in_as: signed_in_as.to_string(),
            cards: cards?,
            latest_invoices: latest_invoices?,
            revenue_chart,
        })
    }

    pub async fn invoices_page(&self, query: &str, page: u32, revision: u64) -> AppResult<InvoicesPage> {
        let (total_pages, invoices) = tokio::try_join!(
            self.fetch_invoices_pages(query),
            self.fetch_filtered_invoices(query, page),
        )?;

        Ok(InvoicesPage {
            query: query.to_string(),
            current_page: page,
            total_pages,
            pagination: generate_pagination(page, total_pages),
            invoices,
            revision,
        })
    }

    pub async fn customers_page(&self, query: &str) -> AppResult<CustomersPage> {
        Ok(CustomersPage {
            query: query.to_string(),
            customers: self.fetch_filtered_customers(query).await?,
        })
    }
}
