//! Axum route handlers for the Candidate API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::candidates::{search_candidates_by_query, store_candidates, CandidateHit};
use crate::errors::AppError;
use crate::models::candidate::CandidateProfile;
use crate::state::AppState;

const DEFAULT_SEARCH_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
pub struct StoreCandidatesRequest {
    pub candidates: Vec<CandidateProfile>,
}

#[derive(Debug, Serialize)]
pub struct StoreCandidatesResponse {
    pub stored: usize,
    pub candidate_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub candidates: Vec<CandidateHit>,
}

/// POST /api/v1/candidates/store
///
/// Embeds and stores candidate profiles in the vector store.
pub async fn handle_store_candidates(
    State(state): State<AppState>,
    Json(request): Json<StoreCandidatesRequest>,
) -> Result<Json<StoreCandidatesResponse>, AppError> {
    if request.candidates.is_empty() {
        return Err(AppError::Validation(
            "candidates cannot be empty".to_string(),
        ));
    }

    let candidate_ids = store_candidates(
        state.embedder.as_ref(),
        &state.candidates,
        &request.candidates,
    )
    .await?;

    Ok(Json(StoreCandidatesResponse {
        stored: candidate_ids.len(),
        candidate_ids,
    }))
}

/// GET /api/v1/candidates/search?query=...&limit=...
pub async fn handle_search_candidates(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    if params.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let candidates = search_candidates_by_query(
        &state.llm,
        state.embedder.as_ref(),
        state.candidates.as_ref(),
        params.query.trim(),
        params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
    )
    .await?;

    Ok(Json(SearchResponse { candidates }))
}
