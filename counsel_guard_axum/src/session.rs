use axum::{
    extract::FromRequestParts,
    response::{IntoResponse, Response},
};
use http::{Method, request::Parts};

use counsel_guard::{RedirectDecision, Role, Session, evaluate, session_from_headers};

use super::middleware::{decision_response, requested_path_and_query};

/// Rejection of [`GuardedSession`]: the decision the policy reached instead of Allow.
#[derive(Debug)]
pub struct AccessRedirect {
    decision: RedirectDecision,
    session: Session,
    method: Method,
}

impl AccessRedirect {
    pub fn decision(&self) -> &RedirectDecision {
        &self.decision
    }
}

impl IntoResponse for AccessRedirect {
    fn into_response(self) -> Response {
        tracing::debug!("IntoResponse for AccessRedirect");
        decision_response(&self.decision, &self.session, &self.method)
    }
}

/// Session of a request the access policy allowed, available as an Axum extractor.
///
/// Handlers outside the [`enforce_access_policy`](crate::enforce_access_policy)
/// layer can take this argument to get the same protection: the extractor applies
/// the policy to the requested path and rejects with the redirect otherwise.
/// Behind the layer it reuses the session the layer already built.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use counsel_guard_axum::GuardedSession;
///
/// async fn bookings(GuardedSession(session): GuardedSession) -> String {
///     format!("Hello, {:?}!", session.role)
/// }
///
/// let app: Router = Router::new().route("/counselor/bookings", get(bookings));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GuardedSession(pub Session);

impl GuardedSession {
    pub fn role(&self) -> Option<Role> {
        self.0.authenticated_role()
    }
}

impl<S> FromRequestParts<S> for GuardedSession
where
    S: Send + Sync,
{
    type Rejection = AccessRedirect;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let session = match parts.extensions.get::<Session>() {
            Some(session) => *session,
            None => session_from_headers(&parts.headers),
        };

        let decision = evaluate(
            requested_path_and_query(&parts.extensions, &parts.uri),
            &session,
        );

        match decision {
            RedirectDecision::Allow => Ok(GuardedSession(session)),
            decision => Err(AccessRedirect {
                decision,
                session,
                method: parts.method.clone(),
            }),
        }
    }
}
