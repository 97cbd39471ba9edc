//! counsel_guard - Role-based access policy for the counseling dashboard
//!
//! This crate decides, for every navigation into the admin or counselor portal,
//! whether the page may render or where the visitor is sent instead. The same pure
//! decision table backs both enforcement points: the request interception layer
//! (see `counsel-guard-axum`) and the client-side [`ComponentGuard`].

mod config;
mod credential;
mod errors;
mod guard;
mod policy;
mod session;
mod utils;

pub use config::{
    CG_ADMIN_DASHBOARD, CG_ASSET_PREFIXES, CG_COOKIE_MAX_AGE, CG_COUNSELOR_DASHBOARD,
    CG_LOGIN_PATH, CG_LOGOUT_PATH, CG_ROLE_COOKIE, CG_STATUS_COOKIE, CG_TOKEN_COOKIE,
};

pub use credential::{
    Credential, CredentialError, decode_credential, decode_credential_with, decode_role,
};

pub use errors::GuardError;

pub use guard::{ComponentGuard, Navigator, apply_decision};

pub use policy::{
    RedirectDecision, Route, RouteCategory, classify, dashboard_root, decide, evaluate,
    is_asset_path, login_redirect_target,
};

pub use session::{
    CounselorStatus, Role, Session, SessionStore, prepare_sign_in_headers,
    prepare_sign_out_headers, session_from_cookies, session_from_headers,
};

pub use utils::UtilError;
