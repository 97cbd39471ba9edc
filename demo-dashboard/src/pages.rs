use askama::Template;
use axum::{
    Router,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{Html, IntoResponse},
    routing::get,
};

use counsel_guard_axum::{
    CG_ADMIN_DASHBOARD, CG_COUNSELOR_DASHBOARD, CG_LOGIN_PATH, CG_LOGOUT_PATH, CounselorStatus,
    GuardedSession, Role,
};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    login_path: &'a str,
    logout_path: &'a str,
    dashboard: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "admin.html")]
struct AdminTemplate<'a> {
    section: &'a str,
    logout_path: &'a str,
}

#[derive(Template)]
#[template(path = "counselor.html")]
struct CounselorTemplate<'a> {
    section: &'a str,
    pending: bool,
    logout_path: &'a str,
}

type PageResult = Result<Html<String>, (StatusCode, String)>;

fn render(template: impl Template) -> PageResult {
    template
        .render()
        .map(Html)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

pub(crate) async fn index(GuardedSession(session): GuardedSession) -> PageResult {
    let dashboard = match session.authenticated_role() {
        Some(Role::Admin) => Some(CG_ADMIN_DASHBOARD.as_str()),
        Some(Role::Counselor) => Some(CG_COUNSELOR_DASHBOARD.as_str()),
        _ => None,
    };
    render(IndexTemplate {
        login_path: CG_LOGIN_PATH.as_str(),
        logout_path: CG_LOGOUT_PATH.as_str(),
        dashboard,
    })
}

pub(crate) async fn stylesheet() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/css")],
        "body { font-family: sans-serif; margin: 2rem; }\n",
    )
}

pub(crate) fn admin_router() -> Router {
    Router::new()
        .route("/dashboard", get(admin_dashboard))
        .route("/counselors", get(admin_counselors))
}

pub(crate) fn counselor_router() -> Router {
    Router::new()
        .route("/dashboard", get(counselor_dashboard))
        .route("/schedule", get(counselor_schedule))
}

async fn admin_dashboard(_: GuardedSession) -> PageResult {
    render(AdminTemplate {
        section: "Overview",
        logout_path: CG_LOGOUT_PATH.as_str(),
    })
}

async fn admin_counselors(_: GuardedSession) -> PageResult {
    render(AdminTemplate {
        section: "Counselors",
        logout_path: CG_LOGOUT_PATH.as_str(),
    })
}

fn counselor_page(session: GuardedSession, section: &str) -> PageResult {
    let pending = session.0.counselor_status == Some(CounselorStatus::Pending);
    render(CounselorTemplate {
        section,
        pending,
        logout_path: CG_LOGOUT_PATH.as_str(),
    })
}

async fn counselor_dashboard(session: GuardedSession) -> PageResult {
    counselor_page(session, "Overview")
}

async fn counselor_schedule(session: GuardedSession) -> PageResult {
    counselor_page(session, "Schedule")
}
