//! Vector store client (Chroma REST API) behind a trait seam.
//!
//! A `ChromaCollection` wraps one named collection and supports `add` and
//! `query`. Query results come back as three same-length parallel sequences
//! (`ids`, `metadatas`, `embeddings`) in the store's similarity-ranked order —
//! the matching workflow re-scores independently and makes no further
//! assumption about that ranking.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed query response: {0}")]
    Shape(String),
}

/// Nearest-neighbor query results as parallel sequences.
/// Invariant: `ids`, `metadatas`, and `embeddings` have equal length.
#[derive(Debug, Clone, Default)]
pub struct RetrievedDocuments {
    pub ids: Vec<String>,
    pub metadatas: Vec<Value>,
    pub embeddings: Vec<Vec<f32>>,
}

/// Given a query vector, returns the k nearest stored vectors with metadata.
#[async_trait]
pub trait CandidateRetriever: Send + Sync {
    async fn query(
        &self,
        embedding: &[f32],
        n_results: usize,
    ) -> Result<RetrievedDocuments, VectorStoreError>;
}

#[derive(Clone)]
pub struct ChromaClient {
    client: Client,
    base_url: String,
}

impl ChromaClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolves a collection by name, creating it if it does not exist.
    pub async fn get_or_create_collection(
        &self,
        name: &str,
    ) -> Result<ChromaCollection, VectorStoreError> {
        #[derive(Serialize)]
        struct CreateCollectionRequest<'a> {
            name: &'a str,
            get_or_create: bool,
        }

        #[derive(Deserialize)]
        struct CollectionInfo {
            id: String,
        }

        let response = self
            .client
            .post(format!("{}/api/v1/collections", self.base_url))
            .json(&CreateCollectionRequest {
                name,
                get_or_create: true,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let collection: CollectionInfo = response.json().await?;
        info!(
            "Vector store collection '{name}' ready (id: {})",
            collection.id
        );

        Ok(ChromaCollection {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            collection_id: collection.id,
            name: name.to_string(),
        })
    }
}

/// Handle to one Chroma collection.
#[derive(Clone)]
pub struct ChromaCollection {
    client: Client,
    base_url: String,
    collection_id: String,
    name: String,
}

impl ChromaCollection {
    /// Upserts one document with its embedding and flat metadata.
    pub async fn add(
        &self,
        id: &str,
        embedding: &[f32],
        metadata: &Value,
    ) -> Result<(), VectorStoreError> {
        #[derive(Serialize)]
        struct AddRequest<'a> {
            ids: Vec<&'a str>,
            embeddings: Vec<&'a [f32]>,
            metadatas: Vec<&'a Value>,
        }

        let response = self
            .client
            .post(format!(
                "{}/api/v1/collections/{}/add",
                self.base_url, self.collection_id
            ))
            .json(&AddRequest {
                ids: vec![id],
                embeddings: vec![embedding],
                metadatas: vec![metadata],
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Added document {id} to collection '{}'", self.name);
        Ok(())
    }
}

/// Chroma wraps each result set in an outer list (one per query vector);
/// we always send exactly one query vector and unwrap the first entry.
#[derive(Debug, Deserialize)]
struct ChromaQueryResponse {
    ids: Vec<Vec<String>>,
    metadatas: Option<Vec<Vec<Value>>>,
    embeddings: Option<Vec<Vec<Vec<f32>>>>,
}

#[async_trait]
impl CandidateRetriever for ChromaCollection {
    async fn query(
        &self,
        embedding: &[f32],
        n_results: usize,
    ) -> Result<RetrievedDocuments, VectorStoreError> {
        #[derive(Serialize)]
        struct QueryRequest<'a> {
            query_embeddings: Vec<&'a [f32]>,
            n_results: usize,
            include: Vec<&'a str>,
        }

        let response = self
            .client
            .post(format!(
                "{}/api/v1/collections/{}/query",
                self.base_url, self.collection_id
            ))
            .json(&QueryRequest {
                query_embeddings: vec![embedding],
                n_results,
                include: vec!["metadatas", "embeddings"],
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChromaQueryResponse = response.json().await?;

        let ids = body.ids.into_iter().next().unwrap_or_default();
        let metadatas = body
            .metadatas
            .and_then(|m| m.into_iter().next())
            .unwrap_or_default();
        let embeddings = body
            .embeddings
            .and_then(|e| e.into_iter().next())
            .unwrap_or_default();

        if ids.len() != metadatas.len() || ids.len() != embeddings.len() {
            return Err(VectorStoreError::Shape(format!(
                "parallel sequences disagree: {} ids, {} metadatas, {} embeddings",
                ids.len(),
                metadatas.len(),
                embeddings.len()
            )));
        }

        debug!(
            "Query against '{}' returned {} documents",
            self.name,
            ids.len()
        );

        Ok(RetrievedDocuments {
            ids,
            metadatas,
            embeddings,
        })
    }
}
