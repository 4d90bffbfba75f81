use crate::auth::SessionClaims;
use crate::db::seed::monthly_paid_invoices;
use crate::error::{AppError, AppResult};
use crate::models::{CustomersPage, DashboardOverview, InvoiceFormPage, InvoicesPage};
use crate::service::{safe_redirect, ActionOutcome, AuthError, InvoiceForm, LoginForm, INVOICES_PATH};
use crate::utils::parse_page;
use axum::{
    extract::{Form, Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::session::{removal_cookie, session_cookie};
use super::AppState;

/// 列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub query: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginPageQuery {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn home() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to Acme.".to_string(),
    })
}

pub async fn login_page(
    State(state): State<AppState>,
    Query(params): Query<LoginPageQuery>,
) -> Json<serde_json::Value> {
    let redirect_to = safe_redirect(
        params.callback_url.as_deref(),
        &state.auth_config.protected_prefix,
    );
    Json(json!({ "message": "Please log in to continue.", "redirectTo": redirect_to }))
}

/// 凭据登录; 成功后写入会话 Cookie 并跳转
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.auth.authenticate(&form).await {
        Ok((_, token)) => {
            let target = safe_redirect(form.redirect_to.as_deref(), &state.auth_config.protected_prefix);
            (
                jar.add(session_cookie(&state.auth_config, token)),
                Redirect::to(&target),
            )
                .into_response()
        }
        Err(e @ AuthError::InvalidCredentials) => AppError::Unauthorized(e.to_string()).into_response(),
        Err(e) => {
            tracing::error!("Login failed: {:?}", e);
            AppError::Internal(e.to_string()).into_response()
        }
    }
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    (
        jar.remove(removal_cookie(&state.auth_config)),
        Redirect::to(&state.auth_config.home_path),
    )
        .into_response()
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<SessionClaims>,
) -> AppResult<Json<DashboardOverview>> {
    Ok(Json(state.dashboard.overview(&session.email).await?))
}

pub async fn invoices(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> AppResult<Json<InvoicesPage>> {
    let query = params.query.unwrap_or_default();
    let page = parse_page(params.page.as_deref());
    let revision = state.revalidator.revision(INVOICES_PATH);

    Ok(Json(state.dashboard.invoices_page(&query, page, revision).await?))
}

pub async fn create_invoice_page(State(state): State<AppState>) -> AppResult<Json<InvoiceFormPage>> {
    Ok(Json(InvoiceFormPage {
        invoice: None,
        customers: state.dashboard.fetch_customers().await?,
    }))
}

pub async fn edit_invoice_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<InvoiceFormPage>> {
    let (invoice, customers) = tokio::try_join!(
        state.dashboard.fetch_invoice_by_id(id),
        state.dashboard.fetch_customers(),
    )?;

    let Some(invoice) = invoice else {
        return Err(AppError::NotFound(format!("Invoice {} not found", id)));
    };

    Ok(Json(InvoiceFormPage {
        invoice: Some(invoice),
        customers,
    }))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    Form(form): Form<InvoiceForm>,
) -> Response {
    outcome_response(state.actions.create_invoice(&form).await)
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<InvoiceForm>,
) -> Response {
    outcome_response(state.actions.update_invoice(id, &form).await)
}

pub async fn delete_invoice(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    outcome_response(state.actions.delete_invoice(id).await)
}

pub async fn customers(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> AppResult<Json<CustomersPage>> {
    let query = params.query.unwrap_or_default();
    Ok(Json(state.dashboard.customers_page(&query).await?))
}

/// 初始化演示数据
pub async fn seed(State(state): State<AppState>) -> Response {
    if !state.seed_enabled {
        return AppError::NotFound("Seeding is disabled".to_string()).into_response();
    }

    let generated = monthly_paid_invoices(&mut rand::thread_rng(), Utc::now().date_naive());

    match state.repo.seed(&generated).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(json!({ "message": "Database seeded successfully", "summary": summary })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Seed error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

fn outcome_response(outcome: ActionOutcome) -> Response {
    match outcome {
        ActionOutcome::Redirect(path) => Redirect::to(&path).into_response(),
        ActionOutcome::Completed(state) => (StatusCode::OK, Json(state)).into_response(),
        ActionOutcome::Rejected(state) => (StatusCode::UNPROCESSABLE_ENTITY, Json(state)).into_response(),
        ActionOutcome::NotFound(state) => (StatusCode::NOT_FOUND, Json(state)).into_response(),
        ActionOutcome::Failed(state) => (StatusCode::INTERNAL_SERVER_ERROR, Json(state)).into_response(),
    }
}
