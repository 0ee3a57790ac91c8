//! Axum route handlers for the Matching API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::scoring::{match_jd_to_candidates, ScoredMatch};
use crate::matching::workflow::{run_workflow, WorkflowOptions, WorkflowState, DEFAULT_TOP_K};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchRunRequest {
    pub jd_text: String,
    #[serde(default)]
    pub top_k: Option<usize>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchScoreRequest {
    pub title: String,
    #[serde(default)]
    pub n_results: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MatchScoreResponse {
    pub matches: Vec<ScoredMatch>,
}

/// POST /api/v1/match/run
///
/// Runs the full matching workflow for a raw job description and returns the
/// final state. Callers should treat unset fields plus a non-empty `errors`
/// list as partial success.
pub async fn handle_match_run(
    State(state): State<AppState>,
    Json(request): Json<MatchRunRequest>,
) -> Result<Json<WorkflowState>, AppError> {
    let defaults = WorkflowOptions::default();
    let options = WorkflowOptions {
        top_k: request.top_k.unwrap_or(DEFAULT_TOP_K),
        role: request.role.unwrap_or(defaults.role),
        company: request.company.unwrap_or(defaults.company),
    };

    let final_state = run_workflow(
        &request.jd_text,
        &options,
        state.embedder.as_ref(),
        state.candidates.as_ref(),
        &state.llm,
    )
    .await?;

    Ok(Json(final_state))
}

/// POST /api/v1/match/score
///
/// Alternate scoring strategy: looks up a stored JD by title and asks the LLM
/// to score each retrieved candidate directly.
pub async fn handle_match_score(
    State(state): State<AppState>,
    Json(request): Json<MatchScoreRequest>,
) -> Result<Json<MatchScoreResponse>, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let matches = match_jd_to_candidates(
        &state.db,
        state.embedder.as_ref(),
        state.candidates.as_ref(),
        &state.llm,
        request.title.trim(),
        request.n_results.unwrap_or(DEFAULT_TOP_K),
    )
    .await?;

    Ok(Json(MatchScoreResponse { matches }))
}
