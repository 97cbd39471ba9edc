use axum::{Router, middleware::from_fn, routing::get};
use dotenvy::dotenv;

use counsel_guard_axum::{access_router, enforce_access_policy};

mod pages;
mod server;

use crate::server::{init_tracing, spawn_http_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_tracing(env!("CARGO_CRATE_NAME"));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    let app = Router::new()
        .route("/", get(pages::index))
        .route("/static/dashboard.css", get(pages::stylesheet))
        .nest("/admin", pages::admin_router())
        .nest("/counselor", pages::counselor_router())
        .merge(access_router())
        .layer(from_fn(enforce_access_policy));

    spawn_http_server(port, app).await??;
    Ok(())
}
