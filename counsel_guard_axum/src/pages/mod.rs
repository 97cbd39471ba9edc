mod login;
mod logout;

use axum::{Router, routing::get};

use counsel_guard::{CG_LOGIN_PATH, CG_LOGOUT_PATH};

/// Login and logout endpoints, mounted at their configured paths.
pub(crate) fn router() -> Router<()> {
    Router::new()
        .route(
            CG_LOGIN_PATH.as_str(),
            get(login::login_page).post(login::login_submit),
        )
        .route(CG_LOGOUT_PATH.as_str(), get(logout::logout))
}
