//! Axum route handlers for the Email API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::email::{candidate_subject, generate_candidate_email, generate_hr_email, hr_subject};
use crate::errors::AppError;
use crate::jd::get_jd_by_title;
use crate::state::AppState;

/// Minimum score a candidate must have before shortlist emails are drafted.
const SHORTLIST_SCORE_THRESHOLD: u32 = 60;

#[derive(Debug, Deserialize)]
pub struct GenerateEmailsRequest {
    pub title: String,
    pub candidate_name: String,
    pub candidate_email: String,
    pub score: u32,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratedEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateEmailsResponse {
    pub candidate_email: GeneratedEmail,
    pub hr_email: GeneratedEmail,
}

/// POST /api/v1/emails/generate
///
/// Drafts the candidate-facing and HR-facing shortlist emails for a scored
/// candidate. Delivery is left to an external relay.
pub async fn handle_generate_emails(
    State(state): State<AppState>,
    Json(request): Json<GenerateEmailsRequest>,
) -> Result<Json<GenerateEmailsResponse>, AppError> {
    if request.score <= SHORTLIST_SCORE_THRESHOLD {
        return Err(AppError::Validation(format!(
            "Candidate score must be greater than {SHORTLIST_SCORE_THRESHOLD} to generate shortlist emails"
        )));
    }

    let jd = get_jd_by_title(&state.db, request.title.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("Job description not found".to_string()))?;

    let candidate_body = generate_candidate_email(
        &state.llm,
        &request.candidate_name,
        &jd.job_role,
        &jd.company_name,
    )
    .await
    .map_err(|e| AppError::Llm(e.to_string()))?;

    let hr_body = generate_hr_email(
        &state.llm,
        &request.candidate_name,
        &jd.job_role,
        f64::from(request.score),
        &request.reason,
    )
    .await
    .map_err(|e| AppError::Llm(e.to_string()))?;

    Ok(Json(GenerateEmailsResponse {
        candidate_email: GeneratedEmail {
            to: request.candidate_email,
            subject: candidate_subject(&jd.job_role),
            body: candidate_body,
        },
        hr_email: GeneratedEmail {
            to: jd.hr_email,
            subject: hr_subject(&request.candidate_name, &jd.job_role),
            body: hr_body,
        },
    }))
}
