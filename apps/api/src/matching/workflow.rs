//! The recruitment matching workflow.
//!
//! Four stages run in fixed order over a per-invocation state record:
//! embed the JD → retrieve nearest candidates → score and explain each
//! candidate → draft shortlist emails for the top match.
//!
//! A failed stage never aborts the pipeline: it contributes an empty/neutral
//! delta plus one error string, and downstream stages detect the missing
//! prerequisite and short-circuit the same way. The caller always gets a
//! complete state back; unset fields plus a non-empty `errors` list signal
//! partial success. Only empty top-level input is rejected up front.
//!
//! Stages are functions from the current state to a delta struct; the
//! orchestrator merges deltas. `errors` is append-only.

use serde::Serialize;
use tracing::{info, warn};

use crate::email::{generate_candidate_email, generate_hr_email};
use crate::embeddings::EmbeddingProvider;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::matching::scoring::generate_reason;
use crate::matching::similarity::{cosine_similarity, similarity_to_score};
use crate::models::candidate::CandidateMetadata;
use crate::vector_store::CandidateRetriever;

/// Default number of candidates requested from the vector store.
pub const DEFAULT_TOP_K: usize = 5;

/// A candidate as returned by the retrieval stage, in retriever order.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedCandidate {
    pub id: String,
    pub metadata: CandidateMetadata,
    pub embedding: Vec<f32>,
}

/// A scored candidate. `score` is the cosine-derived percentage in `[0, 100]`.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateMatch {
    pub candidate_id: String,
    pub metadata: CandidateMetadata,
    pub score: f64,
    pub reason: String,
}

/// The state record threaded through the pipeline. Created fresh per
/// invocation, never shared, discarded after the orchestrator returns.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowState {
    pub jd_text: String,
    pub jd_embedding: Option<Vec<f32>>,
    pub candidates: Vec<RetrievedCandidate>,
    /// Sorted by score descending; ties keep retrieval order.
    pub matches: Vec<CandidateMatch>,
    pub candidate_email: Option<String>,
    pub hr_email: Option<String>,
    /// Append-only; one entry per stage-level or prerequisite failure.
    pub errors: Vec<String>,
}

impl WorkflowState {
    fn new(jd_text: &str) -> Self {
        Self {
            jd_text: jd_text.to_string(),
            jd_embedding: None,
            candidates: Vec::new(),
            matches: Vec::new(),
            candidate_email: None,
            hr_email: None,
            errors: Vec::new(),
        }
    }
}

/// Caller-tunable knobs for one workflow run.
#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    pub top_k: usize,
    /// Role named in the generated emails.
    pub role: String,
    /// Company named in the generated emails.
    pub company: String,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            role: "AI Engineer".to_string(),
            company: "ABC Tech".to_string(),
        }
    }
}

// Stage deltas. Each stage reads the state and returns one of these; the
// orchestrator owns the merge, so stages never touch the state directly.

struct EmbedDelta {
    jd_embedding: Option<Vec<f32>>,
    error: Option<String>,
}

struct RetrieveDelta {
    candidates: Vec<RetrievedCandidate>,
    error: Option<String>,
}

struct ScoreDelta {
    matches: Vec<CandidateMatch>,
    error: Option<String>,
}

struct EmailDelta {
    candidate_email: Option<String>,
    hr_email: Option<String>,
    error: Option<String>,
}

/// Runs the four-stage matching workflow for one job description.
///
/// Fails only on empty/whitespace input — collaborator faults are recorded in
/// the returned state's `errors` instead of propagating.
pub async fn run_workflow(
    jd_text: &str,
    options: &WorkflowOptions,
    embedder: &dyn EmbeddingProvider,
    retriever: &dyn CandidateRetriever,
    generator: &dyn TextGenerator,
) -> Result<WorkflowState, AppError> {
    let jd_text = jd_text.trim();
    if jd_text.is_empty() {
        return Err(AppError::Validation(
            "Job description text cannot be empty".to_string(),
        ));
    }

    info!("Starting matching workflow");
    let mut state = WorkflowState::new(jd_text);

    let delta = embed_jd(&state, embedder).await;
    state.jd_embedding = delta.jd_embedding;
    state.errors.extend(delta.error);

    let delta = retrieve_candidates(&state, retriever, options.top_k).await;
    state.candidates = delta.candidates;
    state.errors.extend(delta.error);

    let delta = score_candidates(&state, generator).await;
    state.matches = delta.matches;
    state.errors.extend(delta.error);

    let delta = draft_emails(&state, generator, options).await;
    state.candidate_email = delta.candidate_email;
    state.hr_email = delta.hr_email;
    state.errors.extend(delta.error);

    if state.errors.is_empty() {
        info!("Matching workflow completed with {} matches", state.matches.len());
    } else {
        warn!(
            "Matching workflow completed with {} errors: {:?}",
            state.errors.len(),
            state.errors
        );
    }

    Ok(state)
}

/// Stage 1: embed the job description.
async fn embed_jd(state: &WorkflowState, embedder: &dyn EmbeddingProvider) -> EmbedDelta {
    match embedder.embed(&state.jd_text).await {
        Ok(embedding) => {
            info!("Generated JD embedding with dimension {}", embedding.len());
            EmbedDelta {
                jd_embedding: Some(embedding),
                error: None,
            }
        }
        Err(e) => EmbedDelta {
            jd_embedding: None,
            error: Some(format!("Failed to generate JD embedding: {e}")),
        },
    }
}

/// Stage 2: retrieve nearest candidates for the JD embedding.
async fn retrieve_candidates(
    state: &WorkflowState,
    retriever: &dyn CandidateRetriever,
    top_k: usize,
) -> RetrieveDelta {
    let Some(jd_embedding) = state.jd_embedding.as_deref() else {
        return RetrieveDelta {
            candidates: Vec::new(),
            error: Some("No JD embedding available for candidate retrieval".to_string()),
        };
    };

    match retriever.query(jd_embedding, top_k).await {
        Ok(documents) => {
            let candidates = documents
                .ids
                .into_iter()
                .zip(documents.metadatas)
                .zip(documents.embeddings)
                .map(|((id, metadata), embedding)| RetrievedCandidate {
                    id,
                    metadata: serde_json::from_value(metadata).unwrap_or_default(),
                    embedding,
                })
                .collect::<Vec<_>>();

            info!("Retrieved {} candidates", candidates.len());
            RetrieveDelta {
                candidates,
                error: None,
            }
        }
        Err(e) => RetrieveDelta {
            candidates: Vec::new(),
            error: Some(format!("Failed to retrieve candidates: {e}")),
        },
    }
}

/// Stage 3: score each candidate and generate a match reason.
///
/// Per-candidate failures are best-effort: the candidate is dropped with a
/// warning and scoring continues. Only missing prerequisites produce a
/// stage-level error.
async fn score_candidates(state: &WorkflowState, generator: &dyn TextGenerator) -> ScoreDelta {
    let Some(jd_embedding) = state.jd_embedding.as_deref() else {
        return ScoreDelta {
            matches: Vec::new(),
            error: Some("No JD embedding available for matching".to_string()),
        };
    };

    if state.candidates.is_empty() {
        return ScoreDelta {
            matches: Vec::new(),
            error: Some("No candidates available for matching".to_string()),
        };
    }

    let mut matches = Vec::with_capacity(state.candidates.len());
    for candidate in &state.candidates {
        match score_candidate(jd_embedding, candidate, &state.jd_text, generator).await {
            Ok(candidate_match) => matches.push(candidate_match),
            Err(e) => warn!("Failed to score candidate {}: {e}", candidate.id),
        }
    }

    // Stable sort keeps retrieval order on equal scores.
    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    info!("Generated {} candidate matches", matches.len());
    ScoreDelta {
        matches,
        error: None,
    }
}

async fn score_candidate(
    jd_embedding: &[f32],
    candidate: &RetrievedCandidate,
    jd_text: &str,
    generator: &dyn TextGenerator,
) -> Result<CandidateMatch, String> {
    let similarity =
        cosine_similarity(jd_embedding, &candidate.embedding).map_err(|e| e.to_string())?;
    let score = similarity_to_score(similarity);

    let reason = generate_reason(generator, jd_text, &candidate.metadata, score)
        .await
        .map_err(|e| e.to_string())?;

    Ok(CandidateMatch {
        candidate_id: candidate.id.clone(),
        metadata: candidate.metadata.clone(),
        score,
        reason,
    })
}

/// Stage 4: draft shortlist emails for the top match.
async fn draft_emails(
    state: &WorkflowState,
    generator: &dyn TextGenerator,
    options: &WorkflowOptions,
) -> EmailDelta {
    let Some(top) = state.matches.first() else {
        return EmailDelta {
            candidate_email: None,
            hr_email: None,
            error: Some("No matches available for email generation".to_string()),
        };
    };

    let candidate_name = if top.metadata.name.is_empty() {
        "Candidate"
    } else {
        top.metadata.name.as_str()
    };

    let candidate_email =
        generate_candidate_email(generator, candidate_name, &options.role, &options.company).await;
    let hr_email = generate_hr_email(
        generator,
        candidate_name,
        &options.role,
        top.score,
        &top.reason,
    )
    .await;

    match (candidate_email, hr_email) {
        (Ok(candidate_email), Ok(hr_email)) => {
            info!("Generated shortlist emails for {candidate_name}");
            EmailDelta {
                candidate_email: Some(candidate_email),
                hr_email: Some(hr_email),
                error: None,
            }
        }
        (Err(e), _) | (_, Err(e)) => EmailDelta {
            candidate_email: None,
            hr_email: None,
            error: Some(format!("Failed to generate emails: {e}")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::embeddings::EmbeddingError;
    use crate::llm_client::LlmError;
    use crate::vector_store::{RetrievedDocuments, VectorStoreError};

    struct MockEmbedder {
        result: Option<Vec<f32>>,
        calls: AtomicUsize,
    }

    impl MockEmbedder {
        fn returning(embedding: Vec<f32>) -> Self {
            Self {
                result: Some(embedding),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                result: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().ok_or(EmbeddingError::Api {
                status: 503,
                message: "model unavailable".to_string(),
            })
        }
    }

    struct MockRetriever {
        documents: RetrievedDocuments,
        fail: bool,
        calls: AtomicUsize,
        requested_k: Mutex<Option<usize>>,
    }

    impl MockRetriever {
        fn returning(documents: RetrievedDocuments) -> Self {
            Self {
                documents,
                fail: false,
                calls: AtomicUsize::new(0),
                requested_k: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                documents: RetrievedDocuments::default(),
                fail: true,
                calls: AtomicUsize::new(0),
                requested_k: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl CandidateRetriever for MockRetriever {
        async fn query(
            &self,
            _embedding: &[f32],
            n_results: usize,
        ) -> Result<RetrievedDocuments, VectorStoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.requested_k.lock().unwrap() = Some(n_results);
            if self.fail {
                return Err(VectorStoreError::Api {
                    status: 500,
                    message: "collection offline".to_string(),
                });
            }
            Ok(self.documents.clone())
        }
    }

    struct MockGenerator {
        calls: AtomicUsize,
        /// Fail any call whose prompt contains this substring.
        fail_on: Option<String>,
    }

    impl MockGenerator {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: None,
            }
        }

        fn failing_on(substring: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: Some(substring.to_string()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for MockGenerator {
        async fn generate(&self, _system: &str, prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(needle) = &self.fail_on {
                if prompt.contains(needle) {
                    return Err(LlmError::Api {
                        status: 429,
                        message: "quota exceeded".to_string(),
                    });
                }
            }
            Ok("Generated response.".to_string())
        }
    }

    fn single_candidate_docs() -> RetrievedDocuments {
        RetrievedDocuments {
            ids: vec!["cand-1".to_string()],
            metadatas: vec![json!({"name": "Alice", "skills": "Python", "experience": 5})],
            embeddings: vec![vec![1.0, 0.0]],
        }
    }

    fn docs_with(names_and_embeddings: Vec<(&str, Vec<f32>)>) -> RetrievedDocuments {
        let mut documents = RetrievedDocuments::default();
        for (i, (name, embedding)) in names_and_embeddings.into_iter().enumerate() {
            documents.ids.push(format!("cand-{i}"));
            documents.metadatas.push(json!({"name": name}));
            documents.embeddings.push(embedding);
        }
        documents
    }

    #[tokio::test]
    async fn test_empty_input_rejected_before_any_collaborator_call() {
        let embedder = MockEmbedder::returning(vec![1.0, 0.0]);
        let retriever = MockRetriever::returning(single_candidate_docs());
        let generator = MockGenerator::ok();

        let result = run_workflow(
            "   \n  ",
            &WorkflowOptions::default(),
            &embedder,
            &retriever,
            &generator,
        )
        .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(retriever.calls.load(Ordering::SeqCst), 0);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_end_to_end_perfect_match() {
        let embedder = MockEmbedder::returning(vec![1.0, 0.0]);
        let retriever = MockRetriever::returning(single_candidate_docs());
        let generator = MockGenerator::ok();

        let state = run_workflow(
            "Senior backend engineer, 5 years, Python",
            &WorkflowOptions::default(),
            &embedder,
            &retriever,
            &generator,
        )
        .await
        .unwrap();

        assert!(state.errors.is_empty(), "errors: {:?}", state.errors);
        assert_eq!(state.jd_embedding, Some(vec![1.0, 0.0]));
        assert_eq!(state.matches.len(), 1);
        assert_eq!(state.matches[0].candidate_id, "cand-1");
        assert_eq!(state.matches[0].score, 100.0);
        assert_eq!(state.matches[0].metadata.name, "Alice");
        assert!(state.candidate_email.is_some());
        assert!(state.hr_email.is_some());
        // 1 reason + 2 emails
        assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_embedding_failure_cascades_without_raising() {
        let embedder = MockEmbedder::failing();
        let retriever = MockRetriever::returning(single_candidate_docs());
        let generator = MockGenerator::ok();

        let state = run_workflow(
            "Backend engineer",
            &WorkflowOptions::default(),
            &embedder,
            &retriever,
            &generator,
        )
        .await
        .unwrap();

        assert!(state.jd_embedding.is_none());
        assert!(state.candidates.is_empty());
        assert!(state.matches.is_empty());
        assert!(state.candidate_email.is_none());
        assert!(state.hr_email.is_none());
        // One error per stage: embed fault + three prerequisite-missing entries.
        assert_eq!(state.errors.len(), 4);
        assert!(state.errors[0].contains("Failed to generate JD embedding"));
        assert!(state.errors[0].contains("model unavailable"));
        // The retriever and generator were never consulted.
        assert_eq!(retriever.calls.load(Ordering::SeqCst), 0);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_retrieval_failure_records_error_and_continues() {
        let embedder = MockEmbedder::returning(vec![1.0, 0.0]);
        let retriever = MockRetriever::failing();
        let generator = MockGenerator::ok();

        let state = run_workflow(
            "Backend engineer",
            &WorkflowOptions::default(),
            &embedder,
            &retriever,
            &generator,
        )
        .await
        .unwrap();

        assert!(state.jd_embedding.is_some());
        assert!(state.candidates.is_empty());
        assert!(state.matches.is_empty());
        assert_eq!(state.errors.len(), 3);
        assert!(state.errors[0].contains("Failed to retrieve candidates"));
        assert!(state.errors[0].contains("collection offline"));
    }

    #[tokio::test]
    async fn test_one_failing_candidate_is_dropped_silently() {
        let embedder = MockEmbedder::returning(vec![1.0, 0.0]);
        let retriever = MockRetriever::returning(docs_with(vec![
            ("Candidate0", vec![1.0, 0.0]),
            ("Candidate1", vec![0.9, 0.1]),
            ("Candidate2", vec![0.8, 0.2]),
            ("Candidate3", vec![0.7, 0.3]),
            ("Candidate4", vec![0.6, 0.4]),
        ]));
        // Reason generation fails only for Candidate3's prompt.
        let generator = MockGenerator::failing_on("Candidate3");

        let state = run_workflow(
            "Backend engineer",
            &WorkflowOptions::default(),
            &embedder,
            &retriever,
            &generator,
        )
        .await
        .unwrap();

        assert_eq!(state.matches.len(), 4);
        assert!(state
            .matches
            .iter()
            .all(|m| m.metadata.name != "Candidate3"));
        // Candidate-level faults never reach the shared error list.
        assert!(state.errors.is_empty(), "errors: {:?}", state.errors);
    }

    #[tokio::test]
    async fn test_matches_sorted_by_score_descending() {
        let embedder = MockEmbedder::returning(vec![1.0, 0.0]);
        // Deliberately out of similarity order.
        let retriever = MockRetriever::returning(docs_with(vec![
            ("Low", vec![0.2, 0.98]),
            ("High", vec![1.0, 0.0]),
            ("Mid", vec![0.7, 0.7]),
        ]));
        let generator = MockGenerator::ok();

        let state = run_workflow(
            "Backend engineer",
            &WorkflowOptions::default(),
            &embedder,
            &retriever,
            &generator,
        )
        .await
        .unwrap();

        assert_eq!(state.matches.len(), 3);
        for window in state.matches.windows(2) {
            assert!(
                window[0].score >= window[1].score,
                "matches not sorted: {} < {}",
                window[0].score,
                window[1].score
            );
        }
        assert_eq!(state.matches[0].metadata.name, "High");
    }

    #[tokio::test]
    async fn test_retriever_receives_default_top_k() {
        let embedder = MockEmbedder::returning(vec![1.0, 0.0]);
        let retriever = MockRetriever::returning(single_candidate_docs());
        let generator = MockGenerator::ok();

        run_workflow(
            "Backend engineer",
            &WorkflowOptions::default(),
            &embedder,
            &retriever,
            &generator,
        )
        .await
        .unwrap();

        assert_eq!(*retriever.requested_k.lock().unwrap(), Some(DEFAULT_TOP_K));
    }

    #[tokio::test]
    async fn test_email_failure_leaves_both_fields_unset_with_one_error() {
        let embedder = MockEmbedder::returning(vec![1.0, 0.0]);
        let retriever = MockRetriever::returning(single_candidate_docs());
        // Reason prompts pass; the candidate email prompt mentions the company.
        let generator = MockGenerator::failing_on("ABC Tech");

        let state = run_workflow(
            "Backend engineer",
            &WorkflowOptions::default(),
            &embedder,
            &retriever,
            &generator,
        )
        .await
        .unwrap();

        assert_eq!(state.matches.len(), 1);
        assert!(state.candidate_email.is_none());
        assert!(state.hr_email.is_none());
        assert_eq!(state.errors.len(), 1);
        assert!(state.errors[0].contains("Failed to generate emails"));
    }

    #[tokio::test]
    async fn test_retriever_returning_nothing_short_circuits_scoring() {
        let embedder = MockEmbedder::returning(vec![1.0, 0.0]);
        let retriever = MockRetriever::returning(RetrievedDocuments::default());
        let generator = MockGenerator::ok();

        let state = run_workflow(
            "Backend engineer",
            &WorkflowOptions::default(),
            &embedder,
            &retriever,
            &generator,
        )
        .await
        .unwrap();

        assert!(state.candidates.is_empty());
        assert!(state.matches.is_empty());
        assert_eq!(state.errors.len(), 2);
        assert!(state.errors[0].contains("No candidates available"));
        assert!(state.errors[1].contains("No matches available"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }
}
