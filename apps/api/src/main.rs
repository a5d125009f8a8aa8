mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod personalization;
mod profile;
mod roadmaps;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::profile::store::PgProfileStore;
use crate::roadmaps::loader::FsRoadmapLoader;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Roadmap API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (student and user profiles)
    let db = create_pool(&config.database_url, config.db_max_connections).await?;

    // Initialize generation client
    let llm = LlmClient::new(
        config.generation_api_url.clone(),
        config.generation_api_key.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    info!(
        "Canonical roadmaps served from {}",
        config.roadmap_dir.display()
    );

    // Build app state
    let state = AppState {
        profiles: Arc::new(PgProfileStore::new(db)),
        roadmaps: Arc::new(FsRoadmapLoader::new(config.roadmap_dir.clone())),
        generator: Arc::new(llm),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
