//! Candidate ingestion and free-text search over the candidate collection.

pub mod handlers;
mod prompts;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::embeddings::EmbeddingProvider;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::candidate::{CandidateMetadata, CandidateProfile};
use crate::vector_store::{CandidateRetriever, ChromaCollection};
use self::prompts::{QUERY_PARSE_PROMPT_TEMPLATE, QUERY_PARSE_SYSTEM};

/// Structured form of a free-text candidate search query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedQuery {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub min_experience: Option<u32>,
    #[serde(default)]
    pub other_requirements: Option<String>,
}

/// One hit from a candidate search.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateHit {
    pub candidate_id: String,
    pub metadata: CandidateMetadata,
}

/// Embeds each profile and stores it in the candidate collection under a
/// fresh UUID with flat metadata. Returns the assigned ids.
pub async fn store_candidates(
    embedder: &dyn EmbeddingProvider,
    candidate_index: &ChromaCollection,
    profiles: &[CandidateProfile],
) -> Result<Vec<String>, AppError> {
    let mut ids = Vec::with_capacity(profiles.len());

    for profile in profiles {
        let embedding = embedder
            .embed(&profile.embedding_text())
            .await
            .map_err(|e| AppError::Embedding(e.to_string()))?;

        let candidate_id = Uuid::new_v4().to_string();
        let metadata = serde_json::to_value(profile.metadata())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize metadata: {e}")))?;

        candidate_index
            .add(&candidate_id, &embedding, &metadata)
            .await
            .map_err(|e| AppError::VectorStore(e.to_string()))?;

        ids.push(candidate_id);
    }

    info!("Stored {} candidate profiles", ids.len());
    Ok(ids)
}

/// Parses a free-text search query into structured skills/experience filters.
pub async fn parse_search_query(llm: &LlmClient, query: &str) -> Result<ParsedQuery, AppError> {
    let prompt = QUERY_PARSE_PROMPT_TEMPLATE.replace("{query}", query);
    llm.call_json::<ParsedQuery>(&prompt, QUERY_PARSE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Query parsing failed: {e}")))
}

/// Searches candidates by free text: LLM-parse the query, embed the raw text,
/// over-fetch from the store, then filter by skill substring match.
pub async fn search_candidates_by_query(
    llm: &LlmClient,
    embedder: &dyn EmbeddingProvider,
    retriever: &dyn CandidateRetriever,
    query: &str,
    limit: usize,
) -> Result<Vec<CandidateHit>, AppError> {
    let parsed = parse_search_query(llm, query).await?;

    let query_embedding = embedder
        .embed(query)
        .await
        .map_err(|e| AppError::Embedding(e.to_string()))?;

    // Over-fetch so the skill filter still has enough left to fill `limit`.
    let documents = retriever
        .query(&query_embedding, limit * 2)
        .await
        .map_err(|e| AppError::VectorStore(e.to_string()))?;

    let mut hits = Vec::new();
    for (id, metadata_value) in documents.ids.into_iter().zip(documents.metadatas) {
        let metadata: CandidateMetadata =
            serde_json::from_value(metadata_value).unwrap_or_default();

        if matches_skill_filter(&metadata, &parsed.skills) {
            hits.push(CandidateHit {
                candidate_id: id,
                metadata,
            });
            if hits.len() >= limit {
                break;
            }
        }
    }

    info!("Search '{query}' matched {} candidates", hits.len());
    Ok(hits)
}

/// True when no skills were requested, or any requested skill appears in the
/// candidate's skill list (case-insensitive substring).
fn matches_skill_filter(metadata: &CandidateMetadata, skills: &[String]) -> bool {
    if skills.is_empty() {
        return true;
    }
    let candidate_skills = metadata.skills.to_lowercase();
    skills
        .iter()
        .any(|skill| candidate_skills.contains(&skill.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata_with_skills(skills: &str) -> CandidateMetadata {
        CandidateMetadata {
            name: "Alice".to_string(),
            skills: skills.to_string(),
            experience: 4,
            email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn test_empty_skill_filter_matches_everyone() {
        assert!(matches_skill_filter(&metadata_with_skills("Python"), &[]));
    }

    #[test]
    fn test_skill_filter_is_case_insensitive() {
        let metadata = metadata_with_skills("Python, Machine Learning");
        assert!(matches_skill_filter(&metadata, &["python".to_string()]));
        assert!(matches_skill_filter(
            &metadata,
            &["MACHINE LEARNING".to_string()]
        ));
    }

    #[test]
    fn test_skill_filter_rejects_non_matching() {
        let metadata = metadata_with_skills("Java, Spring Boot");
        assert!(!matches_skill_filter(&metadata, &["Python".to_string()]));
    }

    #[test]
    fn test_any_requested_skill_suffices() {
        let metadata = metadata_with_skills("React, TypeScript");
        assert!(matches_skill_filter(
            &metadata,
            &["Python".to_string(), "React".to_string()]
        ));
    }

    #[test]
    fn test_parsed_query_deserializes_with_nulls() {
        let json = r#"{"skills": ["Python"], "min_experience": null, "other_requirements": "remote"}"#;
        let parsed: ParsedQuery = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.skills, vec!["Python"]);
        assert!(parsed.min_experience.is_none());
        assert_eq!(parsed.other_requirements.as_deref(), Some("remote"));
    }
}
