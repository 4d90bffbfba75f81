//! 会话 Cookie 与路由守卫

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;

use super::AppState;
use crate::auth::SessionClaims;
use crate::config::AuthConfig;

pub fn session_cookie(config: &AuthConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(config.secure_cookie)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(config.session_max_age_secs))
        .build()
}

pub fn removal_cookie(config: &AuthConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), "")).path("/").build()
}

/// 从 Cookie 中读取并校验会话
pub fn current_session(state: &AppState, jar: &CookieJar) -> Option<SessionClaims> {
    let cookie = jar.get(&state.auth_config.cookie_name)?;
    match state.auth.keys().validate(cookie.value()) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!("Ignoring session cookie: {}", e);
            None
        }
    }
}

/// 受保护路由: 未登录跳转登录页, 令牌超过 update age 时续期
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(claims) = current_session(&state, &jar) else {
        let callback = request
            .uri()
            .path_and_query()
            .map(|p| p.as_str())
            .unwrap_or(state.auth_config.protected_prefix.as_str());
        let location = login_redirect(&state.auth_config, callback);
        return Redirect::to(&location).into_response();
    };

    let keys = state.auth.keys();
    let renewed = if keys.needs_refresh(&claims, Utc::now().timestamp()) {
        match keys.reissue(&claims) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!("Failed to renew session for {}: {}", claims.sub, e);
                None
            }
        }
    } else {
        None
    };

    request.extensions_mut().insert(claims);
    let response = next.run(request).await;

    match renewed {
        Some(token) => (jar.add(session_cookie(&state.auth_config, token)), response).into_response(),
        None => response,
    }
}

/// 公共页面: 已登录用户直接进入受保护区域
pub async fn redirect_if_signed_in(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    if current_session(&state, &jar).is_some() {
        return Redirect::to(&state.auth_config.protected_prefix).into_response();
    }
    next.run(request).await
}

/// 登录页地址, 带上原请求路径作为 callbackUrl
fn login_redirect(config: &AuthConfig, callback: &str) -> String {
    format!(
        "{}?callbackUrl={}",
        config.login_path,
        urlencoding::encode(callback)
    )
}
