// Shared prompt fragments. Each service that calls the AI keeps its own prompts.rs.

/// Appended to every prompt whose reply is decoded as JSON.
pub const JSON_ONLY_INSTRUCTION: &str =
    "IMPORTANT: Return ONLY the JSON. No additional text, notes, or markdown formatting.";
