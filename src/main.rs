//! Tokio / Axum entry point for the user/auth/QR microservice.

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_auth::{handlers, AppConfig, AuthService, UserStore};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let store = UserStore::new(pool);
    store
        .run_migrations()
        .await
        .expect("Failed to run migrations");

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AuthService::new(store, config));

    let app = handlers::router(state).layer(CorsLayer::permissive());

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!("Listening on {bind_addr}");

    axum::serve(listener, app).await.expect("Server error");
}
