//! Job descriptions: LLM structuring of raw text, persistence, and embedding
//! into the vector store.

pub mod handlers;
mod prompts;

use serde_json::json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::embeddings::EmbeddingProvider;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::job_description::{JobDescriptionRow, StructuredJd};
use crate::vector_store::ChromaCollection;
use self::prompts::{JD_GENERATE_PROMPT_TEMPLATE, JD_GENERATE_SYSTEM};

/// Structures raw job details into a full `StructuredJd` via the LLM.
pub async fn generate_structured_jd(
    llm: &LlmClient,
    text: &str,
) -> Result<StructuredJd, AppError> {
    let prompt = JD_GENERATE_PROMPT_TEMPLATE.replace("{text}", text);
    llm.call_json::<StructuredJd>(&prompt, JD_GENERATE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("JD generation failed: {e}")))
}

/// Persists a structured JD and embeds its description into the JD collection.
/// Returns the new row id.
pub async fn save_structured_jd(
    pool: &PgPool,
    embedder: &dyn EmbeddingProvider,
    jd_index: &ChromaCollection,
    jd: &StructuredJd,
) -> Result<Uuid, AppError> {
    let jd_id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO job_descriptions
            (id, company_name, company_url, required_skills, location,
             experience_range, job_role, job_description, hr_email, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now())
        "#,
    )
    .bind(jd_id)
    .bind(&jd.company_name)
    .bind(&jd.company_url)
    .bind(&jd.required_skills)
    .bind(&jd.location)
    .bind(&jd.experience_range)
    .bind(&jd.job_role)
    .bind(&jd.job_description)
    .bind(&jd.hr_email)
    .execute(pool)
    .await?;

    let embedding = embedder
        .embed(&jd.job_description)
        .await
        .map_err(|e| AppError::Embedding(e.to_string()))?;

    let metadata = json!({
        "source": "ai_generated",
        "length": jd.job_description.len(),
        "jd_id": jd_id.to_string(),
    });
    jd_index
        .add(&Uuid::new_v4().to_string(), &embedding, &metadata)
        .await
        .map_err(|e| AppError::VectorStore(e.to_string()))?;

    info!("Saved and embedded JD {} ({})", jd_id, jd.job_role);
    Ok(jd_id)
}

/// Case-insensitive substring lookup on `job_role`.
pub async fn get_jd_by_title(
    pool: &PgPool,
    title: &str,
) -> Result<Option<JobDescriptionRow>, sqlx::Error> {
    sqlx::query_as::<_, JobDescriptionRow>(
        "SELECT * FROM job_descriptions WHERE job_role ILIKE '%' || $1 || '%' \
         ORDER BY created_at DESC LIMIT 1",
    )
    .bind(title)
    .fetch_optional(pool)
    .await
}

/// All stored job roles, newest first.
pub async fn fetch_jd_titles(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT job_role FROM job_descriptions ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|(role,)| role).collect())
}

/// Extracts plain text from an uploaded PDF.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, AppError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::Validation(format!("Failed to extract PDF text: {e}")))?;

    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "Uploaded PDF contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}
