use axum::response::{IntoResponse, Redirect, Response};

use counsel_guard::{CG_LOGIN_PATH, prepare_sign_out_headers};

use crate::error::IntoResponseError;

/// Expire the session cookies and return to the login page.
pub(super) async fn logout() -> Response {
    match prepare_sign_out_headers().into_response_error() {
        Ok(headers) => {
            tracing::info!("Signed out");
            (headers, Redirect::to(CG_LOGIN_PATH.as_str())).into_response()
        }
        Err(err) => err.into_response(),
    }
}
