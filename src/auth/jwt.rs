//! 会话令牌 (HS256 JWT)

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::models::User;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("failed to encode token: {0}")]
    Encoding(String),

    #[error("token has expired")]
    Expired,

    #[error("invalid token")]
    Invalid,
}

/// 会话声明
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    max_age_secs: i64,
    update_age_secs: i64,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("keys", &"[hidden]")
            .field("max_age_secs", &self.max_age_secs)
            .field("update_age_secs", &self.update_age_secs)
            .finish()
    }
}

impl SessionKeys {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            max_age_secs: config.session_max_age_secs,
            update_age_secs: config.session_update_age_secs,
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, JwtError> {
        self.issue_at(user, Utc::now().timestamp())
    }

    pub fn issue_at(&self, user: &User, issued_at: i64) -> Result<String, JwtError> {
        let claims = SessionClaims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            iat: issued_at,
            exp: issued_at + self.max_age_secs,
        };
        self.encode(&claims)
    }

    /// 续期: 保留身份, 重置签发时间与过期时间
    pub fn reissue(&self, claims: &SessionClaims) -> Result<String, JwtError> {
        let now = Utc::now().timestamp();
        self.encode(&SessionClaims {
            iat: now,
            exp: now + self.max_age_secs,
            ..claims.clone()
        })
    }

    fn encode(&self, claims: &SessionClaims) -> Result<String, JwtError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| JwtError::Encoding(e.to_string()))
    }

    pub fn validate(&self, token: &str) -> Result<SessionClaims, JwtError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid,
            })
    }

    /// 签发超过 update age 的令牌需要续期
    pub fn needs_refresh(&self, claims: &SessionClaims, now: i64) -> bool {
        now - claims.iat >= self.update_age_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "User".to_string(),
            email: "user@nextmail.com".to_string(),
            password: String::new(),
        }
    }

    fn keys() -> SessionKeys {
        SessionKeys::new(&AuthConfig {
            jwt_secret: "unit-test-secret".to_string(),
            ..AuthConfig::default()
        })
    }

    #[test]
    fn issued_token_validates() {
        let keys = keys();
        let user = user();
        let claims = keys.validate(&keys.issue(&user).unwrap()).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "user@nextmail.com");
        assert_eq!(claims.exp - claims.iat, 1800);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys();
        let token = keys.issue_at(&user(), Utc::now().timestamp() - 3600).unwrap();
        assert!(matches!(keys.validate(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let other = SessionKeys::new(&AuthConfig {
            jwt_secret: "another-secret".to_string(),
            ..AuthConfig::default()
        });
        let token = other.issue(&user()).unwrap();
        assert!(matches!(keys().validate(&token), Err(JwtError::Invalid)));
        assert!(matches!(keys().validate("garbage"), Err(JwtError::Invalid)));
    }

    #[test]
    fn refresh_after_update_age() {
        let keys = keys();
        let now = Utc::now().timestamp();
        let fresh = keys.validate(&keys.issue_at(&user(), now - 60).unwrap()).unwrap();
        let stale = keys.validate(&keys.issue_at(&user(), now - 301).unwrap()).unwrap();
        assert!(!keys.needs_refresh(&fresh, now));
        assert!(keys.needs_refresh(&stale, now));

        let renewed = keys.validate(&keys.reissue(&stale).unwrap()).unwrap();
        assert_eq!(renewed.sub, stale.sub);
        assert!(renewed.iat >= now);
    }
}
