use crate::config::{CG_ADMIN_DASHBOARD, CG_COUNSELOR_DASHBOARD, CG_LOGIN_PATH};
use crate::policy::route::{Route, RouteCategory, is_asset_path};
use crate::session::{Role, Session};

/// Outcome of applying the access policy to a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    /// Render the requested page.
    Allow,
    /// Navigate to `target` instead.
    Redirect { target: String },
    /// Clear the stored credential, then navigate to `target`.
    SignOut { target: String },
}

impl RedirectDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, RedirectDecision::Allow)
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            RedirectDecision::Allow => None,
            RedirectDecision::Redirect { target } | RedirectDecision::SignOut { target } => {
                Some(target)
            }
        }
    }

    pub fn clears_session(&self) -> bool {
        matches!(self, RedirectDecision::SignOut { .. })
    }
}

/// Dashboard root of a role, or `None` for an unrecognized one.
pub fn dashboard_root(role: Role) -> Option<&'static str> {
    match role {
        Role::Admin => Some(CG_ADMIN_DASHBOARD.as_str()),
        Role::Counselor => Some(CG_COUNSELOR_DASHBOARD.as_str()),
        Role::Unknown => None,
    }
}

/// Login URL that forwards back to `route` once signed in.
pub fn login_redirect_target(route: &Route) -> String {
    format!(
        "{}?redirect={}",
        CG_LOGIN_PATH.as_str(),
        urlencoding::encode(&route.path_and_query())
    )
}

/// The access policy. Pure: the same route and session always give the same answer.
///
/// Authentication is checked before the role, so an anonymous visitor of either
/// area is always sent to login.
pub fn decide(route: &Route, session: &Session) -> RedirectDecision {
    let category = route.category();
    if category == RouteCategory::Public {
        return RedirectDecision::Allow;
    }

    let Some(role) = session.authenticated_role() else {
        return if category.is_protected() {
            RedirectDecision::Redirect {
                target: login_redirect_target(route),
            }
        } else {
            RedirectDecision::Allow
        };
    };

    if session.is_blocked() {
        return RedirectDecision::SignOut {
            target: CG_LOGIN_PATH.to_string(),
        };
    }

    let required = match category {
        RouteCategory::AdminArea => Some(Role::Admin),
        RouteCategory::CounselorArea => Some(Role::Counselor),
        RouteCategory::Login | RouteCategory::Public => None,
    };

    if required == Some(role) {
        return RedirectDecision::Allow;
    }

    match dashboard_root(role) {
        Some(root) => RedirectDecision::Redirect {
            target: root.to_string(),
        },
        // authenticated_role() only yields known roles
        None => RedirectDecision::Redirect {
            target: login_redirect_target(route),
        },
    }
}

/// Apply the policy to a raw `path?query`, asset paths included.
pub fn evaluate(path_and_query: &str, session: &Session) -> RedirectDecision {
    if is_asset_path(path_and_query) {
        return RedirectDecision::Allow;
    }
    let decision = decide(&Route::parse(path_and_query), session);
    tracing::debug!(
        "Access decision for {} with role {:?}: {:?}",
        path_and_query,
        session.authenticated_role(),
        decision
    );
    decision
}
