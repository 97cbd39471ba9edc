mod decision;
mod route;

pub use decision::{RedirectDecision, dashboard_root, decide, evaluate, login_redirect_target};
pub use route::{Route, RouteCategory, classify, is_asset_path};
