// Cross-cutting prompt fragments shared by all agents.
// Module-specific prompts live next to the code that uses them.

/// Every agent answers in English regardless of the language of the inputs.
pub const ENGLISH_ONLY_INSTRUCTION: &str =
    "All responses must be in English only. Do not respond in any other language.";

/// Appended to prompts whose replies are machine-parsed.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
