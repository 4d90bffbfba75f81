//! 页面视图模型: 金额、日期均已格式化为展示字符串

use serde::Serialize;
use uuid::Uuid;

use super::{CustomerField, InvoiceEditView, Revenue};
use crate::utils::{PageToken, YAxis};

#[derive(Debug, Clone, Serialize)]
pub struct LatestInvoice {
    pub id: Uuid,
    pub name: String,
    pub image_url: String,
    pub email: String,
    pub amount: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardData {
    pub number_of_invoices: i64,
    pub number_of_customers: i64,
    pub total_paid_invoices: String,
    pub total_pending_invoices: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub date: String,
    pub amount: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    pub total_pending: String,
    pub total_paid: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevenueChart {
    pub revenue: Vec<Revenue>,
    pub y_axis: YAxis,
    pub chart_height: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub signed_in_as: String,
    pub cards: CardData,
    pub latest_invoices: Vec<LatestInvoice>,
    pub revenue_chart: RevenueChart,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoicesPage {
    pub query: String,
    pub current_page: u32,
    pub total_pages: u32,
    pub pagination: Vec<PageToken>,
    pub invoices: Vec<InvoiceRow>,
    /// 列表修订号, 每次发票写入后递增
    pub revision: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomersPage {
    pub query: String,
    pub customers: Vec<CustomerRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceFormPage {
    pub invoice: Option<InvoiceEditView>,
    pub customers: Vec<CustomerField>,
}
