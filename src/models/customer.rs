use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// 客户表 (customers)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

/// 下拉框选项
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CustomerField {
    pub id: Uuid,
    pub name: String,
}

/// 客户列表行, 含发票聚合
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CustomerTableRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    pub total_pending: i64,
    pub total_paid: i64,
}
