use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use validator::Validate;

use crate::auth::{verify_password, JwtError, SessionKeys};
use crate::db::DashboardRepository;
use crate::models::User;

/// 登录表单
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[serde(default, alias = "redirectTo")]
    pub redirect_to: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Something went wrong.")]
    Unavailable(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        Self::Unavailable(e.to_string())
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        Self::Unavailable(e.to_string())
    }
}

/// 凭据登录
pub struct AuthService {
    repo: Arc<dyn DashboardRepository>,
    keys: SessionKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn DashboardRepository>, keys: SessionKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    /// 校验凭据并签发会话令牌
    pub async fn authenticate(&self, form: &LoginForm) -> Result<(User, String), AuthError> {
        if form.validate().is_err() {
            return Err(AuthError::InvalidCredentials);
        }

        let Some(user) = self.repo.find_user_by_email(&form.email).await? else {
            tracing::info!("Login attempt for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        match verify_password(&form.password, &user.password) {
            Ok(true) => {}
            Ok(false) => return Err(AuthError::InvalidCredentials),
            Err(e) => {
                tracing::error!("Stored password hash for user {} is unusable: {}", user.id, e);
                return Err(AuthError::Unavailable(e.to_string()));
            }
        }

        let token = self.keys.issue(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok((user, token))
    }
}

/// 登录后跳转目标只接受站内路径
pub fn safe_redirect(target: Option<&str>, fallback: &str) -> String {
    match target.map(str::trim) {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\") => {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_targets_stay_on_site() {
        assert_eq!(safe_redirect(Some("/dashboard/invoices"), "/dashboard"), "/dashboard/invoices");
        assert_eq!(safe_redirect(None, "/dashboard"), "/dashboard");
        assert_eq!(safe_redirect(Some(""), "/dashboard"), "/dashboard");
        assert_eq!(safe_redirect(Some("https://evil.example"), "/dashboard"), "/dashboard");
        assert_eq!(safe_redirect(Some("//evil.example"), "/dashboard"), "/dashboard");
    }

    #[test]
    fn login_form_rules() {
        let form = LoginForm {
            email: "user@nextmail.com".to_string(),
            password: "123456".to_string(),
            redirect_to: None,
        };
        assert!(form.validate().is_ok());

        let short = LoginForm {
            password: "123".to_string(),
            ..form.clone()
        };
        assert!(short.validate().is_err());

        let bad_email = LoginForm {
            email: "user".to_string(),
            ..form
        };
        assert!(bad_email.validate().is_err());
    }
}
