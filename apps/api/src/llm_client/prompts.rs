// Cross-cutting prompt constants. Each service that needs LLM calls defines
// its own prompts.rs alongside it; this file holds the shared fragments.

/// System prompt for HR-assistant style free-text output (emails).
pub const HR_ASSISTANT_SYSTEM: &str =
    "You are an HR assistant for a recruitment team. \
    Be professional, concise, and factual. \
    Write only what is asked for — no preamble, no sign-off commentary.";
