// Candidate matching: similarity scoring, the four-stage workflow, and the
// alternate LLM-scored strategy. All LLM calls go through llm_client.

pub mod handlers;
pub mod prompts;
pub mod scoring;
pub mod similarity;
pub mod workflow;
