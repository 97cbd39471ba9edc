//! Central configuration for the counsel_guard crate

use std::sync::LazyLock;

/// Path of the login page
/// Default: "/login"
pub static CG_LOGIN_PATH: LazyLock<String> =
    LazyLock::new(|| std::env::var("CG_LOGIN_PATH").unwrap_or_else(|_| "/login".to_string()));

/// Path of the logout endpoint
/// Default: "/logout"
pub static CG_LOGOUT_PATH: LazyLock<String> =
    LazyLock::new(|| std::env::var("CG_LOGOUT_PATH").unwrap_or_else(|_| "/logout".to_string()));

/// Root of the admin portal, where admins land after sign-in
/// Default: "/admin/dashboard"
pub static CG_ADMIN_DASHBOARD: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CG_ADMIN_DASHBOARD").unwrap_or_else(|_| "/admin/dashboard".to_string())
});

/// Root of the counselor portal
/// Default: "/counselor/dashboard"
pub static CG_COUNSELOR_DASHBOARD: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CG_COUNSELOR_DASHBOARD").unwrap_or_else(|_| "/counselor/dashboard".to_string())
});

pub(crate) const DEFAULT_ASSET_PREFIXES: &str = "/_next,/static,/assets,/images,/favicon.ico";

/// Path prefixes that bypass the access policy entirely (framework internals, images, ...)
pub static CG_ASSET_PREFIXES: LazyLock<Vec<String>> = LazyLock::new(|| {
    parse_prefix_list(
        &std::env::var("CG_ASSET_PREFIXES").unwrap_or_else(|_| DEFAULT_ASSET_PREFIXES.to_string()),
    )
});

/// Cookie carrying the integer-coded role
pub static CG_ROLE_COOKIE: LazyLock<String> =
    LazyLock::new(|| std::env::var("CG_ROLE_COOKIE").unwrap_or_else(|_| "role".to_string()));

/// Cookie carrying the integer-coded counselor status
pub static CG_STATUS_COOKIE: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CG_STATUS_COOKIE").unwrap_or_else(|_| "counselorStatus".to_string())
});

/// Cookie carrying the bearer credential issued by the API
pub static CG_TOKEN_COOKIE: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CG_TOKEN_COOKIE").unwrap_or_else(|_| "accessToken".to_string())
});

pub static CG_COOKIE_MAX_AGE: LazyLock<i64> = LazyLock::new(|| {
    std::env::var("CG_COOKIE_MAX_AGE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(86400) // One day if not set or invalid
});

/// HS256 secret used to verify credentials. When unset, claims are read without
/// signature verification.
pub(crate) static CG_JWT_SECRET: LazyLock<Option<Vec<u8>>> = LazyLock::new(|| {
    std::env::var("CG_JWT_SECRET")
        .ok()
        .filter(|s| !s.is_empty())
        .map(String::into_bytes)
});

pub(crate) fn parse_prefix_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| s.starts_with('/'))
        .map(|s| s.trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
