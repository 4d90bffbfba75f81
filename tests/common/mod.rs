#![allow(dead_code)]

use acme_dashboard::auth::{hash_password, SessionKeys};
use acme_dashboard::db::seed::{demo_customers, demo_invoices, demo_revenue, DEMO_USER};
use acme_dashboard::db::{DashboardRepository, SeedError, SeedSummary};
use acme_dashboard::models::{
    CardMetrics, Customer, CustomerField, CustomerTableRow, Invoice, InvoiceDraft, InvoiceRecord,
    InvoiceStatus, InvoiceTableRow, LatestInvoiceRow, NewInvoice, Revenue, User,
};
use acme_dashboard::{build_router, AppConfig, AppState};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const DEMO_EMAIL: &str = "user@nextmail.com";
pub const DEMO_PASSWORD: &str = "123456";

#[derive(Default)]
struct Store {
    customers: Vec<Customer>,
    invoices: Vec<Invoice>,
    revenue: Vec<Revenue>,
    users: Vec<User>,
}

/// 内存仓储: 与 PostgreSQL 查询保持相同的过滤与排序语义
#[derive(Default)]
pub struct MemoryRepository {
    store: Mutex<Store>,
    fail_all: AtomicBool,
    fail_revenue: AtomicBool,
}

impl MemoryRepository {
    pub fn empty() -> Self {
        Self::default()
    }

    /// 演示客户、发票、收入以及一个可登录的用户
    pub fn with_demo_data() -> Self {
        let repo = Self::default();
        {
            let mut store = repo.store.lock().unwrap();
            store.customers = demo_customers();
            store.invoices = demo_invoices().iter().map(to_invoice).collect();
            store.revenue = demo_revenue();
            store.users.push(User {
                id: DEMO_USER.id,
                name: DEMO_USER.name.to_string(),
                email: DEMO_USER.email.to_string(),
                password: hash_password(DEMO_USER.password).unwrap(),
            });
        }
        repo
    }

    pub fn fail_everything(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    pub fn fail_revenue(&self, fail: bool) {
        self.fail_revenue.store(fail, Ordering::SeqCst);
    }

    pub fn set_revenue(&self, revenue: Vec<Revenue>) {
        self.store.lock().unwrap().revenue = revenue;
    }

    pub fn invoices(&self) -> Vec<Invoice> {
        self.store.lock().unwrap().invoices.clone()
    }

    pub fn customer_ids(&self) -> Vec<Uuid> {
        self.store.lock().unwrap().customers.iter().map(|c| c.id).collect()
    }

    pub fn push_invoice(&self, invoice: &NewInvoice) -> Invoice {
        let invoice = to_invoice(invoice);
        self.store.lock().unwrap().invoices.push(invoice.clone());
        invoice
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

fn to_invoice(invoice: &NewInvoice) -> Invoice {
    Invoice {
        id: Uuid::new_v4(),
        customer_id: invoice.customer_id,
        amount: invoice.amount_cents,
        status: invoice.status.to_string(),
        date: invoice.date,
    }
}

fn matches(query: &str, fields: &[String]) -> bool {
    let query = query.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&query))
}

#[async_trait]
impl DashboardRepository for MemoryRepository {
    async fn fetch_revenue(&self) -> Result<Vec<Revenue>, sqlx::Error> {
        self.check()?;
        if self.fail_revenue.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(self.store.lock().unwrap().revenue.clone())
    }

    async fn fetch_latest_invoices(&self) -> Result<Vec<LatestInvoiceRow>, sqlx::Error> {
        self.check()?;
        let store = self.store.lock().unwrap();
        let mut invoices = store.invoices.clone();
        invoices.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(invoices
            .iter()
            .filter_map(|inv| {
                let customer = store.customers.iter().find(|c| c.id == inv.customer_id)?;
                Some(LatestInvoiceRow {
                    id: inv.id,
                    name: customer.name.clone(),
                    image_url: customer.image_url.clone(),
                    email: customer.email.clone(),
                    amount: inv.amount,
                })
            })
            .take(5)
            .collect())
    }

    async fn fetch_card_metrics(&self) -> Result<CardMetrics, sqlx::Error> {
        self.check()?;
        let store = self.store.lock().unwrap();
        let sum = |status: &str| -> i64 {
            store
                .invoices
                .iter()
                .filter(|i| i.status == status)
                .map(|i| i64::from(i.amount))
                .sum()
        };

        Ok(CardMetrics {
            number_of_invoices: store.invoices.len() as i64,
            number_of_customers: store.customers.len() as i64,
            total_paid: sum("paid"),
            total_pending: sum("pending"),
        })
    }

    async fn fetch_filtered_invoices(
        &self,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<InvoiceTableRow>, sqlx::Error> {
        self.check()?;
        let store = self.store.lock().unwrap();
        let mut rows: Vec<InvoiceTableRow> = store
            .invoices
            .iter()
            .filter_map(|inv| {
                let customer = store.customers.iter().find(|c| c.id == inv.customer_id)?;
                Some(InvoiceTableRow {
                    id: inv.id,
                    customer_id: inv.customer_id,
                    name: customer.name.clone(),
                    email: customer.email.clone(),
                    image_url: customer.image_url.clone(),
                    date: inv.date,
                    amount: inv.amount,
                    status: inv.status.clone(),
                })
            })
            .filter(|row| {
                matches(
                    query,
                    &[
                        row.name.clone(),
                        row.email.clone(),
                        row.amount.to_string(),
                        row.date.to_string(),
                        row.status.clone(),
                    ],
                )
            })
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_filtered_invoices(&self, query: &str) -> Result<i64, sqlx::Error> {
        let rows = self.fetch_filtered_invoices(query, i64::MAX, 0).await?;
        Ok(rows.len() as i64)
    }

    async fn fetch_invoice_by_id(&self, id: Uuid) -> Result<Option<InvoiceRecord>, sqlx::Error> {
        self.check()?;
        let store = self.store.lock().unwrap();
        Ok(store.invoices.iter().find(|i| i.id == id).map(|i| InvoiceRecord {
            id: i.id,
            customer_id: i.customer_id,
            amount: i.amount,
            status: i.status.clone(),
        }))
    }

    async fn fetch_customers(&self) -> Result<Vec<CustomerField>, sqlx::Error> {
        self.check()?;
        let store = self.store.lock().unwrap();
        let mut customers: Vec<CustomerField> = store
            .customers
            .iter()
            .map(|c| CustomerField {
                id: c.id,
                name: c.name.clone(),
            })
            .collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    async fn fetch_filtered_customers(
        &self,
        query: &str,
    ) -> Result<Vec<CustomerTableRow>, sqlx::Error> {
        self.check()?;
        let store = self.store.lock().unwrap();
        let mut rows: Vec<CustomerTableRow> = store
            .customers
            .iter()
            .filter(|c| matches(query, &[c.name.clone(), c.email.clone()]))
            .map(|c| {
                let owned: Vec<&Invoice> =
                    store.invoices.iter().filter(|i| i.customer_id == c.id).collect();
                let sum = |status: &str| -> i64 {
                    owned
                        .iter()
                        .filter(|i| i.status == status)
                        .map(|i| i64::from(i.amount))
                        .sum()
                };
                CustomerTableRow {
                    id: c.id,
                    name: c.name.clone(),
                    email: c.email.clone(),
                    image_url: c.image_url.clone(),
                    total_invoices: owned.len() as i64,
                    total_pending: sum("pending"),
                    total_paid: sum("paid"),
                }
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, sqlx::Error> {
        self.check()?;
        Ok(self.push_invoice(invoice))
    }

    async fn update_invoice(&self, id: Uuid, draft: &InvoiceDraft) -> Result<bool, sqlx::Error> {
        self.check()?;
        let mut store = self.store.lock().unwrap();
        match store.invoices.iter_mut().find(|i| i.id == id) {
            Some(invoice) => {
                invoice.customer_id = draft.customer_id;
                invoice.amount = draft.amount_cents;
                invoice.status = draft.status.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_invoice(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        self.check()?;
        let mut store = self.store.lock().unwrap();
        let before = store.invoices.len();
        store.invoices.retain(|i| i.id != id);
        Ok(store.invoices.len() != before)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        self.check()?;
        let store = self.store.lock().unwrap();
        Ok(store.users.iter().find(|u| u.email == email).cloned())
    }

    async fn seed(&self, generated: &[NewInvoice]) -> Result<SeedSummary, SeedError> {
        self.check()?;
        let mut store = self.store.lock().unwrap();
        let mut summary = SeedSummary::default();

        for customer in demo_customers() {
            if !store.customers.iter().any(|c| c.id == customer.id) {
                store.customers.push(customer);
                summary.customers += 1;
            }
        }
        for invoice in generated {
            store.invoices.push(to_invoice(invoice));
            summary.generated_invoices += 1;
        }
        Ok(summary)
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config
}

pub fn test_app(repo: Arc<MemoryRepository>) -> Router {
    test_app_with(repo, test_config())
}

pub fn test_app_with(repo: Arc<MemoryRepository>, config: AppConfig) -> Router {
    let repo: Arc<dyn DashboardRepository> = repo;
    build_router(AppState::new(repo, &config))
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// `name=value` 形式的会话 Cookie, 可直接放入请求头
pub fn session_cookie_of(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("acme.session-token="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

/// 以演示用户身份, 在指定时间签发的会话 Cookie
pub fn session_issued_at(config: &AppConfig, issued_at: i64) -> String {
    let user = User {
        id: DEMO_USER.id,
        name: DEMO_USER.name.to_string(),
        email: DEMO_USER.email.to_string(),
        password: String::new(),
    };
    let token = SessionKeys::new(&config.auth).issue_at(&user, issued_at).unwrap();
    format!("{}={}", config.auth.cookie_name, token)
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

pub async fn login(app: &Router) -> String {
    use tower::ServiceExt;

    let body = format!("email={}&password={}", DEMO_EMAIL.replace('@', "%40"), DEMO_PASSWORD);
    let response = app
        .clone()
        .oneshot(post_form("/login", &body, None))
        .await
        .unwrap();
    session_cookie_of(&response).expect("login should set a session cookie")
}

pub fn status_of(invoice: &Invoice) -> InvoiceStatus {
    invoice.status.parse().unwrap()
}
