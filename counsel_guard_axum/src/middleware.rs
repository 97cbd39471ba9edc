use axum::{
    extract::{OriginalUri, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use http::{Extensions, Method, Uri};

use counsel_guard::{
    RedirectDecision, Route, RouteCategory, Session, evaluate, prepare_sign_out_headers,
    session_from_headers,
};

use super::config::CG_REDIRECT_ALL_METHODS;
use super::error::IntoResponseError;

/// Path and query the client asked for, before any `nest` stripped a prefix.
pub(crate) fn requested_path_and_query<'a>(extensions: &'a Extensions, uri: &'a Uri) -> &'a str {
    let uri = extensions
        .get::<OriginalUri>()
        .map(|OriginalUri(original)| original)
        .unwrap_or(uri);
    uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/")
}

/// A credential posted to the login page. It replaces whatever session the
/// request carries, so the Login row of the policy does not apply to it.
pub(crate) fn is_sign_in_submission(method: &Method, path_and_query: &str) -> bool {
    *method == Method::POST && Route::parse(path_and_query).category() == RouteCategory::Login
}

/// Turn a non-allow decision into an HTTP response.
///
/// Page loads (GET/HEAD) follow the redirect. Other methods get 401 when the
/// session is anonymous and 403 otherwise, since redirecting a form post or an
/// XHR loses the request. Sign-out decisions expire the session cookies either way.
pub(crate) fn decision_response(
    decision: &RedirectDecision,
    session: &Session,
    method: &Method,
) -> Response {
    let Some(target) = decision.target() else {
        tracing::error!("decision_response called for an allowed request");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let mut response = if *method == Method::GET || *method == Method::HEAD || *CG_REDIRECT_ALL_METHODS
    {
        tracing::debug!("Redirecting to {}", target);
        Redirect::to(target).into_response()
    } else if session.authenticated_role().is_none() || decision.clears_session() {
        tracing::debug!("Unauthorized");
        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    } else {
        tracing::debug!("Forbidden");
        (StatusCode::FORBIDDEN, "Forbidden").into_response()
    };

    if decision.clears_session() {
        match prepare_sign_out_headers().into_response_error() {
            Ok(headers) => response.headers_mut().extend(headers),
            Err((status, msg)) => {
                tracing::error!("Failed to build sign-out headers: {}", msg);
                return (status, msg).into_response();
            }
        }
    }
    response
}

/// Request interception layer.
///
/// Reads the session cookies, applies the access policy to the requested path and
/// either runs the handler (with the [`Session`] in request extensions) or answers
/// with a redirect / error status.
///
/// ```no_run
/// use axum::{Router, middleware::from_fn, routing::get};
/// use counsel_guard_axum::enforce_access_policy;
///
/// let app: Router = Router::new()
///     .route("/admin/dashboard", get(|| async { "admin" }))
///     .layer(from_fn(enforce_access_policy));
/// ```
pub async fn enforce_access_policy(mut req: Request, next: Next) -> Response {
    let path_and_query = requested_path_and_query(req.extensions(), req.uri());
    if is_sign_in_submission(req.method(), path_and_query) {
        tracing::debug!("Passing sign-in submission through to {}", path_and_query);
        return next.run(req).await;
    }

    let session = session_from_headers(req.headers());
    let decision = evaluate(path_and_query, &session);

    match decision {
        RedirectDecision::Allow => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        decision => {
            if decision.clears_session() {
                tracing::info!("Signing out blocked account");
            }
            decision_response(&decision, &session, req.method())
        }
    }
}
