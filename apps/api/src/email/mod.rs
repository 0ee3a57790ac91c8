//! Shortlist email generation.
//!
//! Generates two bodies per shortlisted candidate: a congratulatory email for
//! the candidate and a summary email for HR. Delivery is not handled here —
//! callers hand the generated messages to an external relay.

pub mod handlers;
mod prompts;

use crate::llm_client::prompts::HR_ASSISTANT_SYSTEM;
use crate::llm_client::{LlmError, TextGenerator};
use self::prompts::{CANDIDATE_EMAIL_PROMPT_TEMPLATE, HR_EMAIL_PROMPT_TEMPLATE};

/// Candidate-facing shortlist email body.
pub async fn generate_candidate_email(
    generator: &dyn TextGenerator,
    candidate_name: &str,
    job_role: &str,
    company_name: &str,
) -> Result<String, LlmError> {
    let prompt = CANDIDATE_EMAIL_PROMPT_TEMPLATE
        .replace("{candidate_name}", candidate_name)
        .replace("{job_role}", job_role)
        .replace("{company_name}", company_name);

    generator.generate(HR_ASSISTANT_SYSTEM, &prompt).await
}

/// HR-facing summary email body for a shortlisted candidate.
pub async fn generate_hr_email(
    generator: &dyn TextGenerator,
    candidate_name: &str,
    job_role: &str,
    score: f64,
    reason: &str,
) -> Result<String, LlmError> {
    let prompt = HR_EMAIL_PROMPT_TEMPLATE
        .replace("{candidate_name}", candidate_name)
        .replace("{job_role}", job_role)
        .replace("{score}", &score.to_string())
        .replace("{reason}", reason);

    generator.generate(HR_ASSISTANT_SYSTEM, &prompt).await
}

/// Subject line for the candidate-facing email.
pub fn candidate_subject(job_role: &str) -> String {
    format!("Congratulations! You're Shortlisted for {job_role}")
}

/// Subject line for the HR-facing email.
pub fn hr_subject(candidate_name: &str, job_role: &str) -> String {
    format!("Shortlisted Candidate: {candidate_name} for {job_role}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_subject_mentions_role() {
        assert_eq!(
            candidate_subject("AI Engineer"),
            "Congratulations! You're Shortlisted for AI Engineer"
        );
    }

    #[test]
    fn test_hr_subject_mentions_candidate_and_role() {
        assert_eq!(
            hr_subject("Alice Johnson", "AI Engineer"),
            "Shortlisted Candidate: Alice Johnson for AI Engineer"
        );
    }
}
