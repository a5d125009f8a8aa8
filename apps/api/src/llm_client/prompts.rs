// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments those prompts splice in.

/// Output rules for any prompt that expects a JSON document back.
pub const STRICT_JSON_OUTPUT: &str = "\
- The JSON you return MUST be strictly valid:
  - No comments.
  - No trailing commas.
  - No extra text before or after the JSON object.
- You MUST NOT wrap the JSON inside markdown fences such as ```json ... ``` or ``` ... ```.";

/// Forbids the truncation habit models fall into on long documents.
pub const NO_ELLIPSIS: &str = "\
- You MUST NOT use the token '...' anywhere in the JSON.
  - You MUST return the FULL data, you are not allowed to omit elements by writing '...'.
  - Do not shorten arrays or objects with '...'.";
