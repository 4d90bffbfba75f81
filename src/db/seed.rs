//! 演示数据初始化: 建表 + 固定数据 + 近 12 个月的随机已付发票, 整体在一个事务内

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use uuid::{uuid, Uuid};

use crate::auth::{hash_password, PasswordError};
use crate::models::{Customer, InvoiceStatus, NewInvoice, Revenue};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// 各表实际写入的行数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub users: u64,
    pub customers: u64,
    pub invoices: u64,
    pub revenue: u64,
    pub generated_invoices: u64,
}

pub struct SeedUser {
    pub id: Uuid,
    pub name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
}

pub const DEMO_USER: SeedUser = SeedUser {
    id: uuid!("410544b2-4001-4271-9855-fec4b6a6442a"),
    name: "User",
    email: "user@nextmail.com",
    password: "123456",
};

const CUSTOMERS: [(Uuid, &str, &str, &str); 6] = [
    (uuid!("d6e15727-9fe1-4961-8c5b-ea44a9bd81aa"), "Evil Rabbit", "evil@rabbit.com", "/customers/evil-rabbit.png"),
    (uuid!("3958dc9e-712f-4377-85e9-fec4b6a6442a"), "Delba de Oliveira", "delba@oliveira.com", "/customers/delba-de-oliveira.png"),
    (uuid!("3958dc9e-742f-4377-85e9-fec4b6a6442a"), "Lee Robinson", "lee@robinson.com", "/customers/lee-robinson.png"),
    (uuid!("76d65c26-f784-44a2-ac19-586678f7d33f"), "Michael Novotny", "michael@novotny.com", "/customers/michael-novotny.png"),
    (uuid!("cc27c14a-0acf-4f4a-a6c9-d45682c144b9"), "Amy Burns", "amy@burns.com", "/customers/amy-burns.png"),
    (uuid!("13d07535-c59e-4157-a011-f8d2ef4e0cbb"), "Balazs Orban", "balazs@orban.com", "/customers/balazs-orban.png"),
];

/// (客户下标, 金额分, 状态, 日期)
const INVOICES: [(usize, i32, InvoiceStatus, &str); 13] = [
    (0, 15795, InvoiceStatus::Pending, "2022-12-06"),
    (1, 20348, InvoiceStatus::Pending, "2022-11-14"),
    (4, 3040, InvoiceStatus::Paid, "2022-10-29"),
    (3, 44800, InvoiceStatus::Paid, "2023-09-10"),
    (5, 34577, InvoiceStatus::Pending, "2023-08-05"),
    (2, 54246, InvoiceStatus::Pending, "2023-07-16"),
    (0, 666, InvoiceStatus::Pending, "2023-06-27"),
    (3, 32545, InvoiceStatus::Paid, "2023-06-09"),
    (4, 1250, InvoiceStatus::Paid, "2023-06-17"),
    (5, 8546, InvoiceStatus::Paid, "2023-06-07"),
    (1, 500, InvoiceStatus::Paid, "2023-08-19"),
    (5, 8945, InvoiceStatus::Paid, "2023-06-03"),
    (2, 1000, InvoiceStatus::Paid, "2022-06-05"),
];

const REVENUE: [(&str, i32); 12] = [
    ("Jan", 2000),
    ("Feb", 1800),
    ("Mar", 2200),
    ("Apr", 2500),
    ("May", 2300),
    ("Jun", 3200),
    ("Jul", 3500),
    ("Aug", 3700),
    ("Sep", 2500),
    ("Oct", 2800),
    ("Nov", 3000),
    ("Dec", 4800),
];

pub fn demo_customers() -> Vec<Customer> {
    CUSTOMERS
        .iter()
        .map(|(id, name, email, image_url)| Customer {
            id: *id,
            name: name.to_string(),
            email: email.to_string(),
            image_url: image_url.to_string(),
        })
        .collect()
}

pub fn demo_invoices() -> Vec<NewInvoice> {
    INVOICES
        .iter()
        .filter_map(|(customer, amount, status, date)| {
            Some(NewInvoice {
                customer_id: CUSTOMERS[*customer].0,
                amount_cents: *amount,
                status: *status,
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?,
            })
        })
        .collect()
}

pub fn demo_revenue() -> Vec<Revenue> {
    REVENUE.iter().map(|(m, r)| Revenue::new(*m, *r)).collect()
}

/// 截至 today 所在月份的近 12 个月, 每月 1 号生成 3-5 张随机客户、随机金额的已付发票
pub fn monthly_paid_invoices<R: Rng>(rng: &mut R, today: NaiveDate) -> Vec<NewInvoice> {
    let current = today.year() * 12 + today.month0() as i32;
    let mut invoices = Vec::new();

    for month_offset in (0..12).rev() {
        let index = current - month_offset;
        let Some(date) = NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1) else {
            continue;
        };

        let count = rng.gen_range(3..=5);
        for _ in 0..count {
            let (customer_id, ..) = CUSTOMERS[rng.gen_range(0..CUSTOMERS.len())];
            invoices.push(NewInvoice {
                customer_id,
                amount_cents: rng.gen_range(10_000..50_000),
                status: InvoiceStatus::Paid,
                date,
            });
        }
    }

    invoices
}

/// 执行初始化; 任一语句失败则整体回滚
pub async fn seed_database(
    pool: &PgPool,
    generated: &[NewInvoice],
) -> Result<SeedSummary, SeedError> {
    let hashed_password = hash_password(DEMO_USER.password)?;

    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    create_schema(&mut tx).await?;

    summary.users = sqlx::query(
        r#"
        INSERT INTO users (id, name, email, password)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (id) DO NOTHING
        "#
    )
    .bind(DEMO_USER.id)
    .bind(DEMO_USER.name)
    .bind(DEMO_USER.email)
    .bind(&hashed_password)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    for customer in demo_customers() {
        summary.customers += sqlx::query(
            r#"
            INSERT INTO customers (id, name, email, image_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.image_url)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    // 固定发票没有固定主键, 以 (客户, 金额, 状态, 日期) 判重
    for invoice in demo_invoices() {
        summary.invoices += sqlx::query(
            r#"
            INSERT INTO invoices (customer_id, amount, status, date)
            SELECT $1, $2, $3, $4
            WHERE NOT EXISTS (
                SELECT 1 FROM invoices
                WHERE customer_id = $1 AND amount = $2 AND status = $3 AND date = $4
            )
            "#
        )
        .bind(invoice.customer_id)
        .bind(invoice.amount_cents)
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    for rev in demo_revenue() {
        summary.revenue += sqlx::query(
            r#"
            INSERT INTO revenue (month, revenue)
            VALUES ($1, $2)
            ON CONFLICT (month) DO NOTHING
            "#
        )
        .bind(&rev.month)
        .bind(rev.revenue)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    for invoice in generated {
        summary.generated_invoices += sqlx::query(
            r#"
            INSERT INTO invoices (customer_id, amount, status, date)
            VALUES ($1, $2, $3, $4)
            "#
        )
        .bind(invoice.customer_id)
        .bind(invoice.amount_cents)
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;

    tracing::info!("Seed completed: {:?}", summary);
    Ok(summary)
}

async fn create_schema(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            image_url VARCHAR(255) NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS invoices (
            id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
            customer_id UUID NOT NULL,
            amount INT NOT NULL CHECK (amount > 0),
            status VARCHAR(255) NOT NULL CHECK (status IN ('pending', 'paid')),
            date DATE NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS revenue (
            month VARCHAR(4) NOT NULL UNIQUE,
            revenue INT NOT NULL
        )
        "#,
    ];

    for statement in statements {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn demo_data_is_consistent() {
        assert_eq!(demo_customers().len(), 6);
        assert_eq!(demo_invoices().len(), INVOICES.len());
        assert_eq!(demo_revenue().len(), 12);
        assert!(demo_invoices().iter().all(|i| i.amount_cents > 0));
    }

    #[test]
    fn generated_invoices_cover_trailing_twelve_months() {
        let mut rng = StdRng::seed_from_u64(7);
        let today = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
        let invoices = monthly_paid_invoices(&mut rng, today);

        let mut months: Vec<NaiveDate> = invoices.iter().map(|i| i.date).collect();
        months.dedup();
        assert_eq!(months.len(), 12);
        assert_eq!(months.first(), NaiveDate::from_ymd_opt(2023, 4, 1).as_ref());
        assert_eq!(months.last(), NaiveDate::from_ymd_opt(2024, 3, 1).as_ref());

        for month in &months {
            let n = invoices.iter().filter(|i| i.date == *month).count();
            assert!((3..=5).contains(&n), "{} invoices in {}", n, month);
        }

        let known: Vec<Uuid> = CUSTOMERS.iter().map(|c| c.0).collect();
        for invoice in &invoices {
            assert_eq!(invoice.status, InvoiceStatus::Paid);
            assert!((10_000..50_000).contains(&invoice.amount_cents));
            assert!(known.contains(&invoice.customer_id));
        }
    }
}
