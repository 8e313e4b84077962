mod models;
mod handlers;
mod services;
mod middleware;
mod config;
mod errors;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_sessions::cookie::SameSite;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use crate::{config::Config, services::Store};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::load().expect("Failed to load configuration");
    let config_state = config.clone();

    let redis_client = Arc::new(
        redis::Client::open(config.redis.url).expect("Failed to connect to Redis"),
    );
    let store = Store::new(redis_client);

    // Fixed administrator record, created on first startup
    handlers::seed_admin(&store)
        .await
        .expect("Failed to seed administrator account");

    // Session store setup
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_name("session");

    let app = Router::new()
        // Landing + auth routes
        .route("/", get(handlers::serve_landing))
        .route("/login", post(handlers::handle_login))
        .route("/register", post(handlers::handle_register))
        .route("/logout", get(handlers::handle_logout))
        // Dashboard routes
        .route("/dashboard", get(handlers::serve_dashboard))
        .route("/projects", post(handlers::create_project))
        .route("/projects/delete/:project_id", get(handlers::delete_project))
        .route("/profile", post(handlers::update_profile))
        .route("/theme/toggle", get(handlers::toggle_theme))
        // Admin routes
        .route("/admin", get(handlers::serve_admin_panel))
        .route("/admin/projects/status", post(handlers::update_project_status))
        // Static files
        .nest_service("/static", ServeDir::new("static"))
        // Middleware
        .layer(from_fn(middleware::require_auth))
        .layer(session_layer)
        // State
        .with_state((store, config_state));

    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        config.server.host, config.server.port
    ))
    .await
    .expect("Failed to bind server");

    tracing::info!("Server running on {}:{}", config.server.host, config.server.port);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Failed to start server");
}
