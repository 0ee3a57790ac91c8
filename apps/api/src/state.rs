use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::embeddings::EmbeddingProvider;
use crate::llm_client::LlmClient;
use crate::vector_store::ChromaCollection;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    /// Embedding generation behind a trait so tests can substitute mocks.
    pub embedder: Arc<dyn EmbeddingProvider>,
    /// Candidate collection — retrieval target for the matching workflow.
    pub candidates: Arc<ChromaCollection>,
    /// Job-description collection.
    pub jds: Arc<ChromaCollection>,
    /// Kept for handlers that need runtime knobs beyond the wired clients.
    #[allow(dead_code)]
    pub config: Config,
}
