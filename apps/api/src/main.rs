mod candidates;
mod config;
mod db;
mod email;
mod embeddings;
mod errors;
mod jd;
mod llm_client;
mod matching;
mod models;
mod routes;
mod state;
mod vector_store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::embeddings::OpenAiEmbedder;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::vector_store::ChromaClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Recruit API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client (model injected from config — no runtime switching)
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_model.clone());
    info!("LLM client initialized (model: {})", llm.model());

    // Initialize embedding client
    let embedder = Arc::new(OpenAiEmbedder::new(
        &config.embedding_url,
        config.embedding_api_key.clone(),
        config.embedding_model.clone(),
    ));
    info!("Embedding client initialized (model: {})", config.embedding_model);

    // Initialize vector store collections
    let chroma = ChromaClient::new(&config.vector_store_url);
    let candidates = Arc::new(chroma.get_or_create_collection("candidates").await?);
    let jds = Arc::new(chroma.get_or_create_collection("job_descriptions").await?);

    // Build app state
    let state = AppState {
        db,
        llm,
        embedder,
        candidates,
        jds,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
