//! Axum route handlers for the Job Description API.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jd::{
    extract_pdf_text, fetch_jd_titles, generate_structured_jd, get_jd_by_title, save_structured_jd,
};
use crate::models::job_description::{JobDescriptionRow, StructuredJd};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateJdRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CreateJdResponse {
    pub jd_id: Uuid,
    pub message: String,
    pub structured_jd: StructuredJd,
}

#[derive(Debug, Deserialize)]
pub struct JdTitleQuery {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct JdTitlesResponse {
    pub titles: Vec<String>,
}

/// POST /api/v1/jd
///
/// Structures raw job details via the LLM, persists the row, and embeds the
/// description into the JD collection.
pub async fn handle_create_jd(
    State(state): State<AppState>,
    Json(request): Json<CreateJdRequest>,
) -> Result<Json<CreateJdResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let structured_jd = generate_structured_jd(&state.llm, &request.text).await?;
    let jd_id = save_structured_jd(
        &state.db,
        state.embedder.as_ref(),
        &state.jds,
        &structured_jd,
    )
    .await?;

    Ok(Json(CreateJdResponse {
        jd_id,
        message: "JD generated, saved, and embedded successfully".to_string(),
        structured_jd,
    }))
}

/// POST /api/v1/jd/upload
///
/// Accepts a multipart PDF upload, extracts its text, then runs the same
/// structure-persist-embed flow as `POST /api/v1/jd`.
pub async fn handle_upload_jd(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CreateJdResponse>, AppError> {
    let mut text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let is_pdf = field.content_type() == Some("application/pdf")
            || field
                .file_name()
                .map(|name| name.to_lowercase().ends_with(".pdf"))
                .unwrap_or(false);
        if !is_pdf {
            return Err(AppError::UnsupportedMediaType(
                "Only PDF uploads are supported".to_string(),
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        text = Some(extract_pdf_text(&bytes)?);
    }

    let text = text.ok_or_else(|| {
        AppError::Validation("Multipart payload must contain a 'file' field".to_string())
    })?;

    let structured_jd = generate_structured_jd(&state.llm, &text).await?;
    let jd_id = save_structured_jd(
        &state.db,
        state.embedder.as_ref(),
        &state.jds,
        &structured_jd,
    )
    .await?;

    Ok(Json(CreateJdResponse {
        jd_id,
        message: "JD generated, saved, and embedded successfully".to_string(),
        structured_jd,
    }))
}

/// GET /api/v1/jd?title=...
///
/// Returns the newest JD whose role matches the title substring.
pub async fn handle_get_jd(
    State(state): State<AppState>,
    Query(query): Query<JdTitleQuery>,
) -> Result<Json<JobDescriptionRow>, AppError> {
    let jd = get_jd_by_title(&state.db, query.title.trim())
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Job description with title containing '{}' not found",
                query.title.trim()
            ))
        })?;

    Ok(Json(jd))
}

/// GET /api/v1/jd/titles
pub async fn handle_list_titles(
    State(state): State<AppState>,
) -> Result<Json<JdTitlesResponse>, AppError> {
    let titles = fetch_jd_titles(&state.db).await?;
    Ok(Json(JdTitlesResponse { titles }))
}
