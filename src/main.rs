use std::sync::{Arc, Mutex};

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use little_lemon::config::AppConfig;
use little_lemon::db;
use little_lemon::handlers;
use little_lemon::services::remote::http::HttpMenuSource;
use little_lemon::services::remote::MenuSource;
use little_lemon::services::sync::MenuSynchronizer;
use little_lemon::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let db = Arc::new(Mutex::new(conn));

    let state = Arc::new(AppState::new(db.clone(), config.clone()));

    let source: Arc<dyn MenuSource> = Arc::new(HttpMenuSource::new(
        config.menu_url.clone(),
        config.fetch_timeout,
    ));
    tracing::info!("syncing menu from {}", config.menu_url);

    // Once per launch; the HTTP surface serves local data until it lands.
    let synchronizer = MenuSynchronizer::new(db, source);
    let menu = Arc::clone(&state.menu);
    tokio::spawn(async move {
        synchronizer.run(&menu).await;
    });

    let app = handlers::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
