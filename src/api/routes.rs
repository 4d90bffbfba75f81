use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::session::{redirect_if_signed_in, require_session};
use super::AppState;

/// 组装路由: 受保护的 /dashboard 区域, 公共页面, 以及无需会话的端点
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/dashboard", get(handlers::dashboard))
        .route(
            "/dashboard/invoices",
            get(handlers::invoices).post(handlers::create_invoice),
        )
        .route("/dashboard/invoices/create", get(handlers::create_invoice_page))
        .route("/dashboard/invoices/:id", post(handlers::update_invoice))
        .route("/dashboard/invoices/:id/edit", get(handlers::edit_invoice_page))
        .route("/dashboard/invoices/:id/delete", post(handlers::delete_invoice))
        .route("/dashboard/customers", get(handlers::customers))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    let public = Router::new()
        .route("/", get(handlers::home))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route_layer(from_fn_with_state(state.clone(), redirect_if_signed_in));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/logout", post(handlers::logout))
        .route("/api/seed", get(handlers::seed))
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
