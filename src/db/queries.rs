use crate::models::{
    CardMetrics, CustomerField, CustomerTableRow, Invoice, InvoiceDraft, InvoiceRecord,
    InvoiceTableRow, LatestInvoiceRow, NewInvoice, Revenue, User,
};
use sqlx::PgPool;
use uuid::Uuid;

/// 仪表盘 "最新发票" 条数
pub const LATEST_INVOICES_LIMIT: i64 = 5;

/// 构造 ILIKE 子串匹配模式; 查询中的 `%` `_` `\` 按字面匹配
pub fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// 查询月度收入 (按日历月份)
pub async fn fetch_revenue(pool: &PgPool) -> Result<Vec<Revenue>, sqlx::Error> {
    sqlx::query_as::<_, Revenue>(
        r#"
        SELECT month, revenue
        FROM revenue
        ORDER BY to_date(month, 'Mon')
        "#
    )
    .fetch_all(pool)
    .await
}

/// 查询最新发票 (按日期降序)
pub async fn fetch_latest_invoices(pool: &PgPool) -> Result<Vec<LatestInvoiceRow>, sqlx::Error> {
    sqlx::query_as::<_, LatestInvoiceRow>(
        r#"
        SELECT invoices.id, customers.name, customers.image_url, customers.email, invoices.amount
        FROM invoices
        JOIN customers ON invoices.customer_id = customers.id
        ORDER BY invoices.date DESC
        LIMIT $1
        "#
    )
    .bind(LATEST_INVOICES_LIMIT)
    .fetch_all(pool)
    .await
}

/// 卡片统计; 空表时各项为 0
pub async fn fetch_card_metrics(pool: &PgPool) -> Result<CardMetrics, sqlx::Error> {
    sqlx::query_as::<_, CardMetrics>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM invoices) AS number_of_invoices,
            (SELECT COUNT(*) FROM customers) AS number_of_customers,
            COALESCE((SELECT SUM(amount) FROM invoices WHERE status = 'paid'), 0)::BIGINT AS total_paid,
            COALESCE((SELECT SUM(amount) FROM invoices WHERE status = 'pending'), 0)::BIGINT AS total_pending
        "#
    )
    .fetch_one(pool)
    .await
}

/// 按关键字过滤发票并分页 (按日期降序)
pub async fn fetch_filtered_invoices(
    pool: &PgPool,
    query: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<InvoiceTableRow>, sqlx::Error> {
    sqlx::query_as::<_, InvoiceTableRow>(
        r#"
        SELECT invoices.id,
               invoices.customer_id,
               customers.name,
               customers.email,
               customers.image_url,
               invoices.date,
               invoices.amount,
               invoices.status
        FROM invoices
        JOIN customers ON invoices.customer_id = customers.id
        WHERE customers.name ILIKE $1
           OR customers.email ILIKE $1
           OR invoices.amount::text ILIKE $1
           OR invoices.date::text ILIKE $1
           OR invoices.status ILIKE $1
        ORDER BY invoices.date DESC
        LIMIT $2 OFFSET $3
        "#
    )
    .bind(like_pattern(query))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// 统计匹配关键字的发票数量
pub async fn count_filtered_invoices(pool: &PgPool, query: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM invoices
        JOIN customers ON invoices.customer_id = customers.id
        WHERE customers.name ILIKE $1
           OR customers.email ILIKE $1
           OR invoices.amount::text ILIKE $1
           OR invoices.date::text ILIKE $1
           OR invoices.status ILIKE $1
        "#
    )
    .bind(like_pattern(query))
    .fetch_one(pool)
    .await
}

/// 查询单张发票
pub async fn fetch_invoice_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<InvoiceRecord>, sqlx::Error> {
    sqlx::query_as::<_, InvoiceRecord>(
        r#"
        SELECT id, customer_id, amount, status
        FROM invoices
        WHERE id = $1
        "#
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// 全部客户 (下拉框)
pub async fn fetch_customers(pool: &PgPool) -> Result<Vec<CustomerField>, sqlx::Error> {
    sqlx::query_as::<_, CustomerField>(
        r#"
        SELECT id, name
        FROM customers
        ORDER BY name ASC
        "#
    )
    .fetch_all(pool)
    .await
}

/// 按名称/邮箱过滤客户, 附带发票数与待付/已付合计
pub async fn fetch_filtered_customers(
    pool: &PgPool,
    query: &str,
) -> Result<Vec<CustomerTableRow>, sqlx::Error> {
    sqlx::query_as::<_, CustomerTableRow>(
        r#"
        SELECT customers.id,
               customers.name,
               customers.email,
               customers.image_url,
               COUNT(invoices.id) AS total_invoices,
               COALESCE(SUM(CASE WHEN invoices.status = 'pending' THEN invoices.amount ELSE 0 END), 0)::BIGINT AS total_pending,
               COALESCE(SUM(CASE WHEN invoices.status = 'paid' THEN invoices.amount ELSE 0 END), 0)::BIGINT AS total_paid
        FROM customers
        LEFT JOIN invoices ON customers.id = invoices.customer_id
        WHERE customers.name ILIKE $1
           OR customers.email ILIKE $1
        GROUP BY customers.id, customers.name, customers.email, customers.image_url
        ORDER BY customers.name ASC
        "#
    )
    .bind(like_pattern(query))
    .fetch_all(pool)
    .await
}

/// 新增发票
pub async fn insert_invoice(pool: &PgPool, invoice: &NewInvoice) -> Result<Invoice, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        r#"
        INSERT INTO invoices (customer_id, amount, status, date)
        VALUES ($1, $2, $3, $4)
        RETURNING id, customer_id, amount, status, date
        "#
    )
    .bind(invoice.customer_id)
    .bind(invoice.amount_cents)
    .bind(invoice.status.as_str())
    .bind(invoice.date)
    .fetch_one(pool)
    .await
}

/// 覆盖发票的客户/金额/状态; 返回是否命中
pub async fn update_invoice(
    pool: &PgPool,
    id: Uuid,
    draft: &InvoiceDraft,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE invoices
        SET customer_id = $1, amount = $2, status = $3
        WHERE id = $4
        "#
    )
    .bind(draft.customer_id)
    .bind(draft.amount_cents)
    .bind(draft.status.as_str())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 删除发票; 返回是否命中
pub async fn delete_invoice(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 按邮箱查询登录用户
pub async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password
        FROM users
        WHERE email = $1
        "#
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}
