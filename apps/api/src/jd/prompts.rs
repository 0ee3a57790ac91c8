// LLM prompts for job description structuring.

/// System prompt for JD structuring — enforces JSON-only output.
pub const JD_GENERATE_SYSTEM: &str =
    "You are an expert HR assistant that creates professional job descriptions. \
    Always respond with valid JSON only. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// JD structuring prompt template. Replace `{text}` before sending.
pub const JD_GENERATE_PROMPT_TEMPLATE: &str = r#"Based on the following job details, generate a professional and comprehensive job description. Return ONLY valid JSON with these exact fields:
- company_name: string
- company_url: string
- required_skills: string (comma-separated)
- location: string
- experience_range: string
- job_role: string
- job_description: string (a full, detailed, and engaging job description text based on all the provided information, including responsibilities, requirements, benefits, etc.)
- hr_email: string (use hr@company.com as default if not specified)

Job Details:
{text}

Ensure the job_description is compelling, professional, and includes all relevant details from the provided information. Make it at least 300 words long with proper structure.
Return only the JSON, no additional text or explanations."#;
