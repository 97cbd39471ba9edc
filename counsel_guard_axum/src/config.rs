//! Configuration of the axum integration

use std::sync::LazyLock;

/// When true, state-changing requests are redirected like page loads instead of
/// answered with 401/403.
/// Default: false
pub static CG_REDIRECT_ALL_METHODS: LazyLock<bool> = LazyLock::new(|| {
    std::env::var("CG_REDIRECT_ALL_METHODS")
        .map(|val| val.to_lowercase() == "true")
        .unwrap_or(false)
});

/// Title shown on the login page
pub static CG_LOGIN_TITLE: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CG_LOGIN_TITLE").unwrap_or_else(|_| "Counseling Dashboard".to_string())
});
