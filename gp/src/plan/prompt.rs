//! Prompt construction
//!
//! A template carries one `{goal_text}` placeholder. In instruction mode the
//! JSON format instructions are appended after substitution; in schema mode
//! the same structure travels as a response schema instead.

use tracing::{debug, warn};

use crate::config::OutputMode;

/// Substitution point for the goal
pub const GOAL_PLACEHOLDER: &str = "{goal_text}";

/// Default template used when the caller supplies no override
pub const DEFAULT_PROMPT_TEMPLATE: &str = "You are an experienced project manager. \
Break the user's goal down into a detailed project plan made of concrete, actionable tasks. \
For every task give a short name, a one-sentence description, the ids of the tasks it depends on, \
and an estimated timeline. The user's goal is: '{goal_text}'.";

/// Appended to the prompt when the schema cannot be sent as a response schema
pub const JSON_FORMAT_INSTRUCTIONS: &str = "\n\nRespond with a JSON array only, no commentary. \
Each element must be an object with exactly these fields:\n\
- \"id\": integer, unique, starting from 1\n\
- \"taskName\": string, a short clear name\n\
- \"description\": string, one sentence\n\
- \"dependencies\": array of integer ids of tasks that must be completed first (may be empty)\n\
- \"timeline\": string, a suggested duration or deadline such as \"Day 1-2\" or \"By Oct 15\"";

/// Whether a template contains the goal placeholder
pub fn has_placeholder(template: &str) -> bool {
    template.contains(GOAL_PLACEHOLDER)
}

/// Substitute the goal into a template
///
/// A template without the placeholder is returned unchanged.
pub fn render(template: &str, goal: &str) -> String {
    debug!(template_len = template.len(), goal_len = goal.len(), "render: called");
    template.replace(GOAL_PLACEHOLDER, goal)
}

/// Build the final prompt for a goal
pub fn build_prompt(template: &str, goal: &str, mode: OutputMode) -> String {
    debug!(?mode, "build_prompt: called");
    if !has_placeholder(template) {
        warn!("Prompt template has no {} placeholder; the goal will not appear in the prompt", GOAL_PLACEHOLDER);
    }

    let mut prompt = render(template, goal);
    if mode == OutputMode::Instruction {
        debug!("build_prompt: appending JSON format instructions");
        prompt.push_str(JSON_FORMAT_INSTRUCTIONS);
    }
    prompt
}

/// Response schema for a plan: an array of task objects, every field required
pub fn plan_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "id": {
                    "type": "integer",
                    "description": "Unique integer ID for the task, starting from 1"
                },
                "taskName": {
                    "type": "string",
                    "description": "A short, clear name for the task"
                },
                "description": {
                    "type": "string",
                    "description": "A one-sentence description of what needs to be done"
                },
                "dependencies": {
                    "type": "array",
                    "items": { "type": "integer" },
                    "description": "IDs of tasks that must be completed first"
                },
                "timeline": {
                    "type": "string",
                    "description": "A suggested duration or deadline, e.g. 'Day 1-2' or 'By Oct 15'"
                }
            },
            "required": ["id", "taskName", "description", "dependencies", "timeline"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_has_single_placeholder() {
        assert_eq!(DEFAULT_PROMPT_TEMPLATE.matches(GOAL_PLACEHOLDER).count(), 1);
    }

    #[test]
    fn test_render_substitutes_goal() {
        let prompt = render("Goal: {goal_text}.", "Launch a podcast");
        assert_eq!(prompt, "Goal: Launch a podcast.");
    }

    #[test]
    fn test_render_does_not_expand_placeholder_inside_goal() {
        let prompt = render("Goal: {goal_text}", "literal {goal_text}");
        assert_eq!(prompt, "Goal: literal {goal_text}");
    }

    #[test]
    fn test_template_without_placeholder_is_used_verbatim() {
        assert!(!has_placeholder("Just make a plan"));
        assert_eq!(build_prompt("Just make a plan", "ignored", OutputMode::Schema), "Just make a plan");
    }

    #[test]
    fn test_schema_mode_omits_instructions() {
        let prompt = build_prompt(DEFAULT_PROMPT_TEMPLATE, "Write a novel", OutputMode::Schema);
        assert!(prompt.contains("'Write a novel'"));
        assert!(!prompt.contains("JSON array only"));
    }

    #[test]
    fn test_instruction_mode_appends_instructions() {
        let prompt = build_prompt(DEFAULT_PROMPT_TEMPLATE, "Write a novel", OutputMode::Instruction);
        assert!(prompt.contains("'Write a novel'"));
        assert!(prompt.ends_with(JSON_FORMAT_INSTRUCTIONS));
        for field in ["\"id\"", "\"taskName\"", "\"description\"", "\"dependencies\"", "\"timeline\""] {
            assert!(prompt.contains(field), "missing {}", field);
        }
    }

    #[test]
    fn test_schema_requires_all_task_fields() {
        let schema = plan_response_schema();
        assert_eq!(schema["type"], "array");
        let required: Vec<&str> = schema["items"]["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, vec!["id", "taskName", "description", "dependencies", "timeline"]);
        assert_eq!(schema["items"]["properties"]["dependencies"]["items"]["type"], "integer");
    }
}
