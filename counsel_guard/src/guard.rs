//! Component-level enforcement for client-side navigation.
//!
//! The interception layer only sees cookies. Navigations that never reach the
//! server are checked here instead, against the hydrated [`SessionStore`], with
//! the same [`decide`](crate::decide) table.

use crate::policy::{RedirectDecision, Route, decide, is_asset_path};
use crate::session::{Session, SessionStore};

/// Router collaborator the guard drives.
pub trait Navigator {
    /// Navigate to `path` instead of rendering the current page.
    fn redirect_to(&mut self, path: &str);

    /// Drop the stored credential (cookies, local storage, ...).
    fn clear_session(&mut self);
}

/// Carry out a decision through a navigator. Returns whether rendering may proceed.
pub fn apply_decision<N: Navigator + ?Sized>(decision: &RedirectDecision, navigator: &mut N) -> bool {
    match decision {
        RedirectDecision::Allow => true,
        RedirectDecision::Redirect { target } => {
            navigator.redirect_to(target);
            false
        }
        RedirectDecision::SignOut { target } => {
            navigator.clear_session();
            navigator.redirect_to(target);
            false
        }
    }
}

/// Guard for one rendered page.
#[derive(Debug, Clone)]
pub struct ComponentGuard {
    route: Route,
    asset: bool,
}

impl ComponentGuard {
    pub fn new(path_and_query: &str) -> Self {
        Self {
            route: Route::parse(path_and_query),
            asset: is_asset_path(path_and_query),
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn decision(&self, session: &Session) -> RedirectDecision {
        if self.asset {
            RedirectDecision::Allow
        } else {
            decide(&self.route, session)
        }
    }

    /// Check the page against the store's current session.
    ///
    /// A sign-out decision also clears the store, so other guards see it.
    pub fn check<N: Navigator + ?Sized>(&self, store: &SessionStore, navigator: &mut N) -> bool {
        self.enforce(&store.session(), store, navigator).is_allow()
    }

    /// Re-run the guard on every change of `store` until the page is left.
    /// Returns the decision that ended the watch.
    pub async fn watch<N: Navigator + ?Sized>(
        &self,
        store: &SessionStore,
        navigator: &mut N,
    ) -> RedirectDecision {
        let mut rx = store.subscribe();
        loop {
            let session = *rx.borrow_and_update();
            let decision = self.enforce(&session, store, navigator);
            if !decision.is_allow() {
                return decision;
            }
            if rx.changed().await.is_err() {
                tracing::trace!("Session store closed; guard for {} stops", self.route.path());
                return RedirectDecision::Allow;
            }
        }
    }

    fn enforce<N: Navigator + ?Sized>(
        &self,
        session: &Session,
        store: &SessionStore,
        navigator: &mut N,
    ) -> RedirectDecision {
        let decision = self.decision(session);
        if decision.clears_session() {
            tracing::info!("Signing out blocked account on {}", self.route.path());
            store.sign_out();
        }
        apply_decision(&decision, navigator);
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{CounselorStatus, Role};

    #[derive(Debug, Default)]
    struct RecordingNavigator {
        redirects: Vec<String>,
        cleared: usize,
    }

    impl Navigator for RecordingNavigator {
        fn redirect_to(&mut self, path: &str) {
            self.redirects.push(path.to_string());
        }

        fn clear_session(&mut self) {
            self.cleared += 1;
        }
    }

    #[test]
    fn test_apply_decision() {
        let mut nav = RecordingNavigator::default();
        assert!(apply_decision(&RedirectDecision::Allow, &mut nav));
        assert!(nav.redirects.is_empty());

        let decision = RedirectDecision::SignOut {
            target: "/login".to_string(),
        };
        assert!(!apply_decision(&decision, &mut nav));
        assert_eq!(nav.redirects, vec!["/login"]);
        assert_eq!(nav.cleared, 1);
    }

    #[test]
    fn test_check_agrees_with_interception_table() {
        let store = SessionStore::new();
        let mut nav = RecordingNavigator::default();

        let guard = ComponentGuard::new("/admin/dashboard");
        assert!(!guard.check(&store, &mut nav));
        assert_eq!(nav.redirects, vec!["/login?redirect=%2Fadmin%2Fdashboard"]);

        store.set(Session::signed_in(Role::Admin, None));
        assert!(guard.check(&store, &mut nav));
        assert_eq!(nav.redirects.len(), 1);
    }

    #[test]
    fn test_check_signs_out_blocked_counselor() {
        let store = SessionStore::new();
        store.set(Session::signed_in(
            Role::Counselor,
            Some(CounselorStatus::Blocked),
        ));
        let mut nav = RecordingNavigator::default();

        let guard = ComponentGuard::new("/counselor/dashboard");
        assert!(!guard.check(&store, &mut nav));
        assert_eq!(nav.cleared, 1);
        assert_eq!(nav.redirects, vec!["/login"]);
        assert_eq!(store.session(), Session::anonymous());
    }

    #[test]
    fn test_asset_page_always_renders() {
        let store = SessionStore::new();
        let mut nav = RecordingNavigator::default();
        assert!(ComponentGuard::new("/_next/data/page.json").check(&store, &mut nav));
        assert!(nav.redirects.is_empty());
    }

    #[tokio::test]
    async fn test_watch_reacts_to_sign_out() {
        let store = SessionStore::new();
        store.set(Session::signed_in(Role::Counselor, None));
        let mut nav = RecordingNavigator::default();

        let guard = ComponentGuard::new("/counselor/sessions?day=1");
        let (decision, ()) = tokio::join!(guard.watch(&store, &mut nav), async {
            tokio::task::yield_now().await;
            store.sign_out();
        });

        let expected = "/login?redirect=%2Fcounselor%2Fsessions%3Fday%3D1";
        assert_eq!(decision.target(), Some(expected));
        assert_eq!(nav.redirects, vec![expected]);
        assert_eq!(nav.cleared, 0);
    }

    #[tokio::test]
    async fn test_watch_clears_store_when_counselor_is_blocked() {
        let store = SessionStore::new();
        store.set(Session::signed_in(
            Role::Counselor,
            Some(CounselorStatus::Active),
        ));
        let mut nav = RecordingNavigator::default();

        let guard = ComponentGuard::new("/counselor/dashboard");
        let (decision, ()) = tokio::join!(guard.watch(&store, &mut nav), async {
            tokio::task::yield_now().await;
            store.set(Session::signed_in(
                Role::Counselor,
                Some(CounselorStatus::Blocked),
            ));
        });

        assert!(decision.clears_session());
        assert_eq!(nav.cleared, 1);
        assert_eq!(nav.redirects, vec!["/login"]);
        assert_eq!(store.session(), Session::anonymous());
    }

    #[tokio::test]
    async fn test_watch_returns_immediately_when_not_allowed() {
        let store = SessionStore::new();
        let mut nav = RecordingNavigator::default();

        let decision = ComponentGuard::new("/admin").watch(&store, &mut nav).await;
        assert_eq!(decision.target(), Some("/login?redirect=%2Fadmin"));
        assert_eq!(nav.redirects.len(), 1);
    }
}
