use serde::{Deserialize, Serialize};

/// Flat candidate metadata as stored alongside the embedding in the vector
/// store. All fields default so a partially-populated document still
/// deserializes — "unknown" beats dropping the candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateMetadata {
    #[serde(default)]
    pub name: String,
    /// Comma-joined skill list.
    #[serde(default)]
    pub skills: String,
    /// Years of experience.
    #[serde(default)]
    pub experience: i64,
    #[serde(default)]
    pub email: String,
}

/// A candidate profile as submitted for ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    /// Free-form, e.g. "4 years".
    pub experience: String,
    pub skills: Vec<String>,
    pub email: String,
    #[serde(default)]
    pub current_role: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub resume_summary: Option<String>,
}

impl CandidateProfile {
    /// Leading integer of the experience string, e.g. "4 years" -> 4.
    pub fn experience_years(&self) -> i64 {
        self.experience
            .split_whitespace()
            .next()
            .and_then(|n| n.parse().ok())
            .unwrap_or(0)
    }

    /// The text that gets embedded for similarity search.
    pub fn embedding_text(&self) -> String {
        format!(
            "{} skills: {} experience: {} years",
            self.name,
            self.skills.join(", "),
            self.experience_years()
        )
    }

    pub fn metadata(&self) -> CandidateMetadata {
        CandidateMetadata {
            name: self.name.clone(),
            skills: self.skills.join(", "),
            experience: self.experience_years(),
            email: self.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alice() -> CandidateProfile {
        CandidateProfile {
            name: "Alice Johnson".to_string(),
            experience: "4 years".to_string(),
            skills: vec!["Python".to_string(), "Machine Learning".to_string()],
            email: "alice@example.com".to_string(),
            current_role: None,
            education: None,
            location: None,
            resume_summary: None,
        }
    }

    #[test]
    fn test_experience_years_parses_leading_integer() {
        assert_eq!(alice().experience_years(), 4);
    }

    #[test]
    fn test_experience_years_defaults_to_zero() {
        let mut profile = alice();
        profile.experience = "fresher".to_string();
        assert_eq!(profile.experience_years(), 0);
    }

    #[test]
    fn test_embedding_text_joins_skills() {
        assert_eq!(
            alice().embedding_text(),
            "Alice Johnson skills: Python, Machine Learning experience: 4 years"
        );
    }

    #[test]
    fn test_metadata_deserializes_with_missing_fields() {
        let metadata: CandidateMetadata =
            serde_json::from_value(json!({"name": "Alice"})).unwrap();
        assert_eq!(metadata.name, "Alice");
        assert_eq!(metadata.experience, 0);
        assert!(metadata.skills.is_empty());
    }
}
