//! Axum integration for the counsel-guard access policy
//!
//! - [`enforce_access_policy`]: request interception layer for `axum::middleware::from_fn`
//! - [`GuardedSession`]: extractor applying the same policy inside a handler
//! - [`access_router`]: login and logout endpoints

mod config;
mod error;
mod middleware;
mod pages;
mod router;
mod session;

pub use config::{CG_LOGIN_TITLE, CG_REDIRECT_ALL_METHODS};
pub use error::IntoResponseError;
pub use middleware::enforce_access_policy;
pub use router::{access_router, access_router_no_trace};
pub use session::{AccessRedirect, GuardedSession};

// Re-export the core types handlers need
pub use counsel_guard::{
    CG_ADMIN_DASHBOARD, CG_COUNSELOR_DASHBOARD, CG_LOGIN_PATH, CG_LOGOUT_PATH, CounselorStatus,
    RedirectDecision, Role, Session,
};
