pub mod actions;
pub mod auth;
pub mod dashboard;
pub mod revalidate;

pub use actions::{ActionOutcome, FieldErrors, FormState, InvoiceActions, InvoiceForm, INVOICES_PATH};
pub use auth::{safe_redirect, AuthError, AuthService, LoginForm};
pub use dashboard::DashboardService;
pub use revalidate::{PathRevalidator, Revalidator};
