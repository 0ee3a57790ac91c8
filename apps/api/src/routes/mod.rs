pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::candidates::handlers as candidate_handlers;
use crate::email::handlers as email_handlers;
use crate::jd::handlers as jd_handlers;
use crate::matching::handlers as match_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job Description API
        .route(
            "/api/v1/jd",
            post(jd_handlers::handle_create_jd).get(jd_handlers::handle_get_jd),
        )
        .route("/api/v1/jd/upload", post(jd_handlers::handle_upload_jd))
        .route("/api/v1/jd/titles", get(jd_handlers::handle_list_titles))
        // Candidate API
        .route(
            "/api/v1/candidates/store",
            post(candidate_handlers::handle_store_candidates),
        )
        .route(
            "/api/v1/candidates/search",
            get(candidate_handlers::handle_search_candidates),
        )
        // Matching API
        .route("/api/v1/match/run", post(match_handlers::handle_match_run))
        .route(
            "/api/v1/match/score",
            post(match_handlers::handle_match_score),
        )
        // Email API
        .route(
            "/api/v1/emails/generate",
            post(email_handlers::handle_generate_emails),
        )
        .with_state(state)
}
