pub mod jwt;
pub mod password;

pub use jwt::{JwtError, SessionClaims, SessionKeys};
pub use password::{hash_password, verify_password, PasswordError};
