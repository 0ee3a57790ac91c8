use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted job description row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobDescriptionRow {
    pub id: Uuid,
    pub company_name: String,
    pub company_url: String,
    pub required_skills: String,
    pub location: String,
    pub experience_range: String,
    pub job_role: String,
    pub job_description: String,
    pub hr_email: String,
    pub created_at: DateTime<Utc>,
}

/// Structured job description produced by the LLM from raw text.
/// The field set mirrors the `job_descriptions` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredJd {
    pub company_name: String,
    pub company_url: String,
    /// Comma-separated.
    pub required_skills: String,
    pub location: String,
    pub experience_range: String,
    pub job_role: String,
    pub job_description: String,
    pub hr_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_jd_deserializes_from_llm_shape() {
        let json = r#"{
            "company_name": "ABC Tech",
            "company_url": "https://abc.tech",
            "required_skills": "Python, Machine Learning",
            "location": "Remote",
            "experience_range": "3-5 years",
            "job_role": "AI Engineer",
            "job_description": "We are looking for an AI Engineer...",
            "hr_email": "hr@company.com"
        }"#;
        let jd: StructuredJd = serde_json::from_str(json).unwrap();
        assert_eq!(jd.job_role, "AI Engineer");
        assert_eq!(jd.hr_email, "hr@company.com");
    }
}
