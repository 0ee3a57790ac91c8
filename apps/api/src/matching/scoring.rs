//! Match scoring helpers.
//!
//! The canonical pipeline score is cosine-derived (see `workflow.rs`); the LLM
//! only writes the justification. `llm_match_score` is the alternate strategy
//! behind `POST /api/v1/match/score`, where the LLM emits
//! `Score: X% Reason: ...` and we parse it.

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use crate::embeddings::EmbeddingProvider;
use crate::errors::AppError;
use crate::jd::get_jd_by_title;
use crate::llm_client::{LlmError, TextGenerator};
use crate::matching::prompts::{
    MATCH_SCORE_PROMPT_TEMPLATE, MATCH_SCORE_SYSTEM, REASON_PROMPT_TEMPLATE, REASON_SYSTEM,
};
use crate::models::candidate::CandidateMetadata;
use crate::vector_store::CandidateRetriever;

/// Fallback score when the LLM response does not follow the expected format.
const UNPARSEABLE_SCORE: u32 = 50;

/// Max JD characters included in a reason prompt.
const REASON_JD_CHARS: usize = 500;

/// One-line candidate profile used inside prompts.
pub fn candidate_summary(metadata: &CandidateMetadata) -> String {
    format!(
        "Name: {}, Skills: {}, Experience: {} years",
        metadata.name, metadata.skills, metadata.experience
    )
}

/// Asks the LLM to justify an already-computed match score.
pub async fn generate_reason(
    generator: &dyn TextGenerator,
    jd_text: &str,
    metadata: &CandidateMetadata,
    score: f64,
) -> Result<String, LlmError> {
    let jd_excerpt: String = jd_text.chars().take(REASON_JD_CHARS).collect();
    let prompt = REASON_PROMPT_TEMPLATE
        .replace("{score}", &score.to_string())
        .replace("{jd_text}", &jd_excerpt)
        .replace("{candidate}", &candidate_summary(metadata));

    generator.generate(REASON_SYSTEM, &prompt).await
}

/// Alternate strategy: the LLM both scores and explains the match.
/// Returns `(score, reason)` with score in `[0, 100]`.
pub async fn llm_match_score(
    generator: &dyn TextGenerator,
    jd_text: &str,
    metadata: &CandidateMetadata,
) -> Result<(u32, String), LlmError> {
    let prompt = MATCH_SCORE_PROMPT_TEMPLATE
        .replace("{jd_text}", jd_text)
        .replace("{candidate}", &candidate_summary(metadata));

    let response = generator.generate(MATCH_SCORE_SYSTEM, &prompt).await?;
    Ok(parse_score_reason(&response))
}

/// Parses `Score: X% Reason: explanation`. Malformed output falls back to
/// a score of 50 with the raw response as the reason.
pub fn parse_score_reason(text: &str) -> (u32, String) {
    let Some((score_part, reason_part)) = text.split_once("Reason:") else {
        return (UNPARSEABLE_SCORE, text.trim().to_string());
    };

    let score = score_part
        .replace("Score:", "")
        .replace('%', "")
        .trim()
        .parse::<u32>();

    match score {
        Ok(score) => (score.min(100), reason_part.trim().to_string()),
        Err(_) => (UNPARSEABLE_SCORE, text.trim().to_string()),
    }
}

/// A candidate scored by the alternate LLM strategy.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMatch {
    pub candidate_id: String,
    pub name: String,
    pub skills: String,
    pub experience: i64,
    pub email: String,
    pub score: u32,
    pub reason: String,
}

/// Looks up a stored JD by title, retrieves nearest candidates, and scores
/// each one with the LLM.
pub async fn match_jd_to_candidates(
    pool: &PgPool,
    embedder: &dyn EmbeddingProvider,
    retriever: &dyn CandidateRetriever,
    generator: &dyn TextGenerator,
    title: &str,
    n_results: usize,
) -> Result<Vec<ScoredMatch>, AppError> {
    let jd = get_jd_by_title(pool, title)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Job description with title containing '{title}' not found"
            ))
        })?;

    let jd_embedding = embedder
        .embed(&jd.job_description)
        .await
        .map_err(|e| AppError::Embedding(e.to_string()))?;

    let documents = retriever
        .query(&jd_embedding, n_results)
        .await
        .map_err(|e| AppError::VectorStore(e.to_string()))?;

    let mut matches = Vec::with_capacity(documents.ids.len());
    for (id, metadata_value) in documents.ids.iter().zip(documents.metadatas.iter()) {
        let metadata: CandidateMetadata =
            serde_json::from_value(metadata_value.clone()).unwrap_or_default();

        let (score, reason) = llm_match_score(generator, &jd.job_description, &metadata)
            .await
            .map_err(|e| AppError::Llm(e.to_string()))?;

        matches.push(ScoredMatch {
            candidate_id: id.clone(),
            name: metadata.name,
            skills: metadata.skills,
            experience: metadata.experience,
            email: metadata.email,
            score,
            reason,
        });
    }

    info!("Scored {} candidates for JD '{}'", matches.len(), jd.job_role);
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_score_reason() {
        let (score, reason) =
            parse_score_reason("Score: 87% Reason: Strong overlap in Python and ML.");
        assert_eq!(score, 87);
        assert_eq!(reason, "Strong overlap in Python and ML.");
    }

    #[test]
    fn test_parse_clamps_score_above_100() {
        let (score, _) = parse_score_reason("Score: 140% Reason: over-enthusiastic model");
        assert_eq!(score, 100);
    }

    #[test]
    fn test_parse_malformed_falls_back_to_50() {
        let raw = "The candidate seems fine overall.";
        let (score, reason) = parse_score_reason(raw);
        assert_eq!(score, 50);
        assert_eq!(reason, raw);
    }

    #[test]
    fn test_parse_non_numeric_score_falls_back() {
        let raw = "Score: high Reason: vibes";
        let (score, reason) = parse_score_reason(raw);
        assert_eq!(score, 50);
        assert_eq!(reason, raw);
    }

    #[test]
    fn test_candidate_summary_format() {
        let metadata = CandidateMetadata {
            name: "Alice".to_string(),
            skills: "Python, ML".to_string(),
            experience: 4,
            email: "alice@example.com".to_string(),
        };
        assert_eq!(
            candidate_summary(&metadata),
            "Name: Alice, Skills: Python, ML, Experience: 4 years"
        );
    }
}
