// LLM prompt templates for shortlist emails.

/// Candidate-facing email prompt.
/// Replace `{candidate_name}`, `{job_role}`, `{company_name}` before sending.
pub const CANDIDATE_EMAIL_PROMPT_TEMPLATE: &str = r#"Generate a professional, personalized email to inform a candidate that they have been shortlisted for a job interview.

Candidate Name: {candidate_name}
Job Role: {job_role}
Company: {company_name}

Email should:
- Congratulate them
- Mention the job role and company
- Provide next steps (e.g., interview details)
- Be encouraging and professional

Write the email body only."#;

/// HR-facing email prompt.
/// Replace `{candidate_name}`, `{job_role}`, `{score}`, `{reason}` before sending.
pub const HR_EMAIL_PROMPT_TEMPLATE: &str = r#"Generate a professional email to HR summarizing a shortlisted candidate.

Candidate Name: {candidate_name}
Job Role: {job_role}
Match Score: {score}%
Reasoning: {reason}

Email should:
- Summarize the candidate's fit
- Include score and key reasons
- Suggest next steps

Write the email body only."#;
