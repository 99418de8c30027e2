use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use stayhash::config::AppConfig;
use stayhash::db;
use stayhash::handlers;
use stayhash::services::oracle::HttpPriceOracle;
use stayhash::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let oracle = HttpPriceOracle::new(config.oracle_url.clone());

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        oracle: Box::new(oracle),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/booking", post(handlers::booking::create_booking))
        .route(
            "/api/booking/:id",
            get(handlers::booking::get_booking).delete(handlers::booking::delete_booking),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
