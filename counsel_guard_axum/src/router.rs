//! Router for the sign-in surface

use axum::Router;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Create a router with the login and logout endpoints
///
/// The endpoints are mounted at their configured paths (`CG_LOGIN_PATH`,
/// `CG_LOGOUT_PATH`), so merge this router at the application root.
pub fn access_router() -> Router {
    access_router_no_trace().layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`access_router`] without the HTTP tracing middleware.
pub fn access_router_no_trace() -> Router {
    super::pages::router()
}
