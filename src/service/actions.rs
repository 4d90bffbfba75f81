//! 发票写操作: 校验 -> 写入 -> 失效 -> 跳转

use bigdecimal::{BigDecimal, Zero};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::revalidate::Revalidator;
use crate::db::DashboardRepository;
use crate::models::{InvoiceDraft, InvoiceStatus, NewInvoice};
use crate::utils::{dollars_to_cents, exponent_in_range};

pub const INVOICES_PATH: &str = "/dashboard/invoices";

pub const MSG_SELECT_CUSTOMER: &str = "Please select a customer";
pub const MSG_AMOUNT_NOT_POSITIVE: &str = "Amount must be greater than $0";
pub const MSG_AMOUNT_INVALID: &str = "Please enter a valid amount";
pub const MSG_AMOUNT_TOO_LARGE: &str = "Amount is too large";
pub const MSG_SELECT_STATUS: &str = "Please select a status";
pub const MSG_CORRECT_ERRORS: &str = "Please correct the errors below and try again.";

/// 创建/编辑发票表单; 金额为美元文本
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct InvoiceForm {
    #[serde(default, alias = "customerId")]
    #[validate(
        required(message = "Please select a customer"),
        length(min = 1, message = "Please select a customer")
    )]
    pub customer_id: Option<String>,

    #[serde(default)]
    pub amount: Option<String>,

    #[serde(default)]
    #[validate(required(message = "Please select a status"))]
    pub status: Option<String>,
}

/// 字段级错误信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    #[serde(rename = "customerId", skip_serializing_if = "Vec::is_empty")]
    pub customer_id: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub amount: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.customer_id.is_empty() && self.amount.is_empty() && self.status.is_empty()
    }
}

/// 返回给表单的状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    pub message: Option<String>,
}

impl FormState {
    pub fn message(message: &str) -> Self {
        Self {
            errors: None,
            message: Some(message.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// 写入成功, 跳转到目标路径
    Redirect(String),
    /// 写入成功, 刷新当前视图即可
    Completed(FormState),
    /// 校验失败, 未写入
    Rejected(FormState),
    /// 目标发票不存在
    NotFound(FormState),
    /// 存储写入失败
    Failed(FormState),
}

impl InvoiceForm {
    /// 校验并转换为可写入的发票内容
    pub fn parse(&self) -> Result<InvoiceDraft, FieldErrors> {
        let mut errors = FieldErrors::default();

        if let Err(e) = self.validate() {
            for (field, errs) in e.field_errors() {
                let messages = errs
                    .iter()
                    .filter_map(|err| err.message.as_ref().map(|m| m.to_string()));
                match &*field {
                    "customer_id" => errors.customer_id.extend(messages),
                    "status" => errors.status.extend(messages),
                    _ => {}
                }
            }
            errors.customer_id.dedup();
        }

        let customer_id = match self.customer_id.as_deref().map(str::trim) {
            Some(raw) if errors.customer_id.is_empty() => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.customer_id.push(MSG_SELECT_CUSTOMER.to_string());
                    None
                }
            },
            _ => None,
        };

        let amount_cents = match parse_amount(self.amount.as_deref()) {
            Ok(cents) => Some(cents),
            Err(message) => {
                errors.amount.push(message.to_string());
                None
            }
        };

        let status = match self.status.as_deref().map(str::trim) {
            Some(raw) if errors.status.is_empty() => match InvoiceStatus::from_str(raw) {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.status.push(MSG_SELECT_STATUS.to_string());
                    None
                }
            },
            _ => None,
        };

        match (customer_id, amount_cents, status) {
            (Some(customer_id), Some(amount_cents), Some(status)) if errors.is_empty() => {
                Ok(InvoiceDraft {
                    customer_id,
                    amount_cents,
                    status,
                })
            }
            _ => Err(errors),
        }
    }
}

/// 美元文本 -> 分; 空值视为 0
fn parse_amount(raw: Option<&str>) -> Result<i32, &'static str> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(MSG_AMOUNT_NOT_POSITIVE);
    }

    let amount = BigDecimal::from_str(raw).map_err(|_| MSG_AMOUNT_INVALID)?;
    // 先检查指数, 之后的比较和缩放才是廉价的
    if !exponent_in_range(&amount) {
        let (_, scale) = amount.as_bigint_and_exponent();
        return Err(if scale < 0 { MSG_AMOUNT_TOO_LARGE } else { MSG_AMOUNT_INVALID });
    }
    if amount <= BigDecimal::zero() {
        return Err(MSG_AMOUNT_NOT_POSITIVE);
    }

    let cents = dollars_to_cents(&amount)
        .and_then(|c| i32::try_from(c).ok())
        .ok_or(MSG_AMOUNT_TOO_LARGE)?;

    // 舍入后为 0 分的金额同样无效
    if cents <= 0 {
        return Err(MSG_AMOUNT_NOT_POSITIVE);
    }
    Ok(cents)
}

fn rejected(errors: FieldErrors) -> ActionOutcome {
    ActionOutcome::Rejected(FormState {
        errors: Some(errors),
        message: Some(MSG_CORRECT_ERRORS.to_string()),
    })
}

/// 发票写操作服务
pub struct InvoiceActions {
    repo: Arc<dyn DashboardRepository>,
    revalidator: Arc<dyn Revalidator>,
}

impl InvoiceActions {
    pub fn new(repo: Arc<dyn DashboardRepository>, revalidator: Arc<dyn Revalidator>) -> Self {
        Self { repo, revalidator }
    }

    pub async fn create_invoice(&self, form: &InvoiceForm) -> ActionOutcome {
        let draft = match form.parse() {
            Ok(draft) => draft,
            Err(errors) => return rejected(errors),
        };

        let invoice = NewInvoice {
            customer_id: draft.customer_id,
            amount_cents: draft.amount_cents,
            status: draft.status,
            date: Utc::now().date_naive(),
        };

        match self.repo.insert_invoice(&invoice).await {
            Ok(created) => {
                tracing::info!("Created invoice {} for customer {}", created.id, created.customer_id);
                self.revalidator.revalidate(INVOICES_PATH);
                ActionOutcome::Redirect(INVOICES_PATH.to_string())
            }
            Err(e) => {
                tracing::error!("Error inserting invoice: {:?}", e);
                ActionOutcome::Failed(FormState::message("Failed to create invoice"))
            }
        }
    }

    pub async fn update_invoice(&self, id: Uuid, form: &InvoiceForm) -> ActionOutcome {
        let draft = match form.parse() {
            Ok(draft) => draft,
            Err(errors) => return rejected(errors),
        };

        match self.repo.update_invoice(id, &draft).await {
            Ok(true) => {
                tracing::info!("Updated invoice {}", id);
                self.revalidator.revalidate(INVOICES_PATH);
                ActionOutcome::Redirect(INVOICES_PATH.to_string())
            }
            Ok(false) => {
                tracing::warn!("Invoice {} not found, nothing updated", id);
                ActionOutcome::NotFound(FormState::message("Invoice not found"))
            }
            Err(e) => {
                tracing::error!("Error updating invoice {}: {:?}", id, e);
                ActionOutcome::Failed(FormState::message("Failed to update invoice"))
            }
        }
    }

    /// 删除不跳转, 仅失效列表
    pub async fn delete_invoice(&self, id: Uuid) -> ActionOutcome {
        match self.repo.delete_invoice(id).await {
            Ok(deleted) => {
                if !deleted {
                    tracing::warn!("Invoice {} already absent", id);
                }
                self.revalidator.revalidate(INVOICES_PATH);
                ActionOutcome::Completed(FormState::message("Deleted invoice"))
            }
            Err(e) => {
                tracing::error!("Error deleting invoice {}: {:?}", id, e);
                ActionOutcome::Failed(FormState::message("Failed to delete invoice"))
            }
        }
    }
}
