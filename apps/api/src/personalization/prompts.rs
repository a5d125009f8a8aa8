// Prompt constants for roadmap personalization.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::errors::AppError;
use crate::llm_client::prompts::{NO_ELLIPSIS, STRICT_JSON_OUTPUT};
use crate::models::Roadmap;

const SYSTEM_PROMPT_TEMPLATE: &str = r#"You are a system that personalizes a learning roadmap for university students.

You will be given:
1. A student profile (current skills, soft skills, course grades, study time, interests, projects).
2. A canonical JSON roadmap that describes the target career path.

Your task:
- For EACH item in the roadmap, use the student profile to:
  - Decide whether the student has already mastered it or not.
  - Decide the priority level if the student should study it:
    high_priority / medium_priority / low_priority / optional / already_mastered.

For EVERY item, you MUST:

1. Set "check" to either true or false.
2. Set "personalization" with ALL of the following fields:
   - "status": one of "already_mastered", "high_priority", "medium_priority", "low_priority", "optional".
   - "priority": an integer (0 = highest priority, larger numbers = lower priority).
   - "personalized_description": 1-2 sentences that explain what this item means for THIS specific student, based on their profile (skills, grades, interests, time).
   - "reason": 1 short sentence that justifies the status/priority using concrete evidence from the profile.
If any item is missing "personalized_description" or "reason", your answer is considered incorrect.

HARD CONSTRAINTS (MUST FOLLOW):
- DO NOT change the overall JSON structure:
  - Do NOT add or remove stages, areas, or items.
  - Do NOT rename existing keys (career_id, career_name, stages, areas, items, id, name, description, skill_tags, prerequisites, required_skills, estimated_hours, order_index, etc.).
- You are ONLY allowed to add or modify the two fields at item level:
  - "check"
  - "personalization"
{strict_json}

STRICTLY FORBIDDEN:
{no_ellipsis}

OUTPUT REQUIREMENT:
- Return EXACTLY ONE JSON object:
  - It must be the full roadmap JSON after you have added/updated "check" and "personalization" for every item.
"#;

const TASK_INSTRUCTION: &str = "Return exactly ONE JSON object with the SAME structure, only adding or updating \
    the fields 'check' and 'personalization' at item level. \
    Do not remove any stages, areas, or items.";

/// System instruction for the personalization call.
pub fn personalization_system_prompt() -> String {
    SYSTEM_PROMPT_TEMPLATE
        .replace("{strict_json}", STRICT_JSON_OUTPUT)
        .replace("{no_ellipsis}", NO_ELLIPSIS)
}

/// User instruction: profile block, the canonical roadmap as pretty JSON, and the task.
pub fn build_personalization_prompt(
    profile_text: &str,
    canonical: &Roadmap,
) -> Result<String, AppError> {
    let roadmap_json = serde_json::to_string_pretty(canonical)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize roadmap: {e}")))?;

    Ok(format!(
        "{profile_text}\n\nCANONICAL ROADMAP JSON:\n{roadmap_json}\n\nTASK:\n{TASK_INSTRUCTION}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roadmap::fixtures::ml_roadmap;

    #[test]
    fn test_system_prompt_has_fragments_spliced_in() {
        let prompt = personalization_system_prompt();
        assert!(!prompt.contains("{strict_json}"));
        assert!(!prompt.contains("{no_ellipsis}"));
        assert!(prompt.contains("No trailing commas."));
        assert!(prompt.contains("MUST NOT use the token '...'"));
    }

    #[test]
    fn test_user_prompt_sections() {
        let prompt = build_personalization_prompt("PROFILE:\n- user_id: u1\n", &ml_roadmap()).unwrap();
        let roadmap_at = prompt.find("CANONICAL ROADMAP JSON:\n").unwrap();
        let task_at = prompt.find("\n\nTASK:\n").unwrap();
        assert!(prompt.starts_with("PROFILE:"));
        assert!(roadmap_at < task_at);
        assert!(prompt.contains("\"id\": \"ml-101\""));
        assert!(prompt.ends_with("Do not remove any stages, areas, or items."));
    }
}
