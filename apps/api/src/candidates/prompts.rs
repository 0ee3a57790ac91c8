// LLM prompts for candidate search query parsing.

/// System prompt for query parsing — enforces JSON-only output.
pub const QUERY_PARSE_SYSTEM: &str =
    "You are a helpful assistant that parses search queries into structured data. \
    Always respond with valid JSON only. \
    Do NOT use markdown code fences.";

/// Query parsing prompt template. Replace `{query}` before sending.
pub const QUERY_PARSE_PROMPT_TEMPLATE: &str = r#"Parse the following search query for candidates into structured data.
Identify and extract:
- skills: list of programming languages, frameworks, tools, or technical skills mentioned (e.g., Python, Java, React)
- min_experience: minimum years of experience if specified (e.g., 3 years -> 3), else null
- other_requirements: any other non-skill requirements like location, role, etc.

Query: {query}

Return ONLY valid JSON with keys: skills (list), min_experience (int or null), other_requirements (string or null).
Example: {"skills": ["Python", "Machine Learning"], "min_experience": 3, "other_requirements": "remote"}"#;
