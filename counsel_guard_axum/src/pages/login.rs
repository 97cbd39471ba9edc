use askama::Template;
use axum::{
    extract::{Form, Query},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use counsel_guard::{
    CG_LOGIN_PATH, GuardError, Route, RouteCategory, Session, dashboard_root, evaluate,
    prepare_sign_in_headers, prepare_sign_out_headers,
};

use crate::config::CG_LOGIN_TITLE;
use crate::error::IntoResponseError;
use crate::session::GuardedSession;

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate<'a> {
    title: &'a str,
    login_path: &'a str,
    redirect: Option<&'a str>,
    error: Option<&'a str>,
}

#[derive(Deserialize)]
pub(super) struct LoginQuery {
    redirect: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct LoginForm {
    token: String,
    redirect: Option<String>,
}

fn render_login(redirect: Option<&str>, error: Option<&str>) -> Result<Html<String>, (StatusCode, String)> {
    let template = LoginTemplate {
        title: CG_LOGIN_TITLE.as_str(),
        login_path: CG_LOGIN_PATH.as_str(),
        redirect: redirect.filter(|r| !r.is_empty()),
        error,
    };
    template
        .render()
        .map(Html)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// Login page. Signed-in visitors are sent to their dashboard by the extractor.
pub(super) async fn login_page(
    _: GuardedSession,
    Query(params): Query<LoginQuery>,
) -> Result<Html<String>, (StatusCode, String)> {
    render_login(params.redirect.as_deref(), None)
}

/// Accept a credential issued by the API and establish the session cookies.
pub(super) async fn login_submit(Form(form): Form<LoginForm>) -> Response {
    let redirect = form.redirect.as_deref();

    let (credential, headers) = match prepare_sign_in_headers(&form.token) {
        Ok(result) => result,
        Err(GuardError::Blocked) => return refuse_blocked(),
        Err(e) => {
            tracing::warn!("Sign-in rejected: {}", e);
            return match render_login(redirect, Some("Invalid or expired access token.")) {
                Ok(html) => (StatusCode::UNAUTHORIZED, html).into_response(),
                Err(err) => err.into_response(),
            };
        }
    };

    let session = credential.session();
    let target = redirect
        .and_then(|candidate| safe_redirect_target(candidate, &session))
        .or_else(|| dashboard_root(credential.role).map(str::to_string))
        .unwrap_or_else(|| "/".to_string());

    tracing::info!(
        "Signed in {:?} as {:?}, continuing to {}",
        credential.subject,
        credential.role,
        target
    );
    (headers, Redirect::to(&target)).into_response()
}

/// 403 login page that also drops any cookies left from an earlier session.
fn refuse_blocked() -> Response {
    let headers = match prepare_sign_out_headers().into_response_error() {
        Ok(headers) => headers,
        Err(err) => return err.into_response(),
    };
    match render_login(None, Some("This account has been blocked.")) {
        Ok(html) => (StatusCode::FORBIDDEN, headers, html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Accept a post-login destination only if it is a local path the new session may
/// open. Anything else would be an open redirect or a redirect loop.
pub(crate) fn safe_redirect_target(candidate: &str, session: &Session) -> Option<String> {
    let is_local = candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.contains('\\')
        && !candidate.chars().any(char::is_control);
    if !is_local {
        tracing::warn!("Ignoring non-local redirect target: {:?}", candidate);
        return None;
    }

    if Route::parse(candidate).category() == RouteCategory::Login {
        return None;
    }

    evaluate(candidate, session)
        .is_allow()
        .then(|| candidate.to_string())
}
