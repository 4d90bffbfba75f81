use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 发票状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            _ => Err(()),
        }
    }
}

/// 发票表 (invoices)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub amount: i32,   // 最小货币单位 (分)
    pub status: String,
    pub date: NaiveDate,
}

/// 编辑表单读取的发票字段
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub amount: i32,
    pub status: String,
}

/// 发票列表行 (联表客户)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct InvoiceTableRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub date: NaiveDate,
    pub amount: i32,
    pub status: String,
}

/// 最新发票 (仪表盘)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LatestInvoiceRow {
    pub id: Uuid,
    pub name: String,
    pub image_url: String,
    pub email: String,
    pub amount: i32,
}

/// 已校验的发票写入内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    pub customer_id: Uuid,
    pub amount_cents: i32,
    pub status: InvoiceStatus,
}

/// 新发票 (带签发日期)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub customer_id: Uuid,
    pub amount_cents: i32,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// 卡片统计
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct CardMetrics {
    pub number_of_invoices: i64,
    pub number_of_customers: i64,
    pub total_paid: i64,
    pub total_pending: i64,
}

/// 编辑表单视图: 金额以元(美元)展示
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceEditView {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub amount: BigDecimal,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_only_known_values() {
        assert_eq!("pending".parse::<InvoiceStatus>(), Ok(InvoiceStatus::Pending));
        assert_eq!("paid".parse::<InvoiceStatus>(), Ok(InvoiceStatus::Paid));
        assert!("PAID".parse::<InvoiceStatus>().is_err());
        assert!("overdue".parse::<InvoiceStatus>().is_err());
        assert_eq!(InvoiceStatus::Paid.to_string(), "paid");
    }
}
