// LLM prompt constants for the matching module.

/// System prompt for match-reason generation.
pub const REASON_SYSTEM: &str = "You are an HR assistant explaining candidate-job matches. \
    Be brief, professional, and specific to the evidence given.";

/// Reason prompt template for the canonical (cosine-scored) pipeline.
/// Replace `{score}`, `{jd_text}`, `{candidate}` before sending.
pub const REASON_PROMPT_TEMPLATE: &str = r#"Explain why this candidate received a match score of {score}% for the following job.

Job Description: {jd_text}

Candidate: {candidate}

Provide a brief, professional explanation (2-3 sentences) of the match quality."#;

/// System prompt for the alternate LLM-scored strategy.
pub const MATCH_SCORE_SYSTEM: &str =
    "You are an HR assistant that evaluates candidate-job matches.";

/// Prompt template for the alternate LLM-scored strategy.
/// The response must follow `Score: X% Reason: explanation`.
/// Replace `{jd_text}`, `{candidate}` before sending.
pub const MATCH_SCORE_PROMPT_TEMPLATE: &str = r#"Compare the following job description with the candidate profile.
Generate a match score from 0 to 100, and provide a brief explanation.

Job Description: {jd_text}

Candidate: {candidate}

Return in format: Score: X% Reason: explanation"#;
