//! Response sanitization
//!
//! Models asked for JSON in prose often wrap it in a markdown code fence:
//!
//! ````text
//! ```json
//! [ ... ]
//! ```
//! ````
//!
//! `strip_code_fence` removes one surrounding fence and leaves anything else alone.

use tracing::debug;

const FENCE: &str = "```";

/// Remove a leading/trailing markdown code fence around a payload
///
/// The opening fence may carry an info string (`json`, `JSON`, ...). Text that
/// is not fenced is returned trimmed but otherwise unchanged.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix(FENCE) else {
        debug!("strip_code_fence: no opening fence");
        return trimmed;
    };

    // Drop the info string on the opening line
    let body = match rest.find('\n') {
        Some(idx) if is_info_string(&rest[..idx]) => &rest[idx + 1..],
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };

    let body = body.trim_end();
    let body = body.strip_suffix(FENCE).unwrap_or(body);
    debug!(before = text.len(), after = body.trim().len(), "strip_code_fence: stripped");
    body.trim()
}

fn is_info_string(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Plan, Task};
    use proptest::prelude::*;

    #[test]
    fn test_plain_payload_is_unchanged() {
        assert_eq!(strip_code_fence("[1, 2]"), "[1, 2]");
        assert_eq!(strip_code_fence("  [1, 2]\n"), "[1, 2]");
    }

    #[test]
    fn test_json_fence() {
        assert_eq!(strip_code_fence("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fence("```JSON\r\n[1, 2]\r\n```\n"), "[1, 2]");
    }

    #[test]
    fn test_bare_fence() {
        assert_eq!(strip_code_fence("```\n[1, 2]\n```"), "[1, 2]");
    }

    #[test]
    fn test_single_line_fence() {
        assert_eq!(strip_code_fence("```json[1, 2]```"), "[1, 2]");
        assert_eq!(strip_code_fence("```[1, 2]```"), "[1, 2]");
    }

    #[test]
    fn test_missing_closing_fence() {
        assert_eq!(strip_code_fence("```json\n[1, 2]"), "[1, 2]");
    }

    #[test]
    fn test_inner_backticks_survive() {
        let text = "```json\n[{\"timeline\": \"use ``` sparingly\"}]\n```";
        assert_eq!(strip_code_fence(text), "[{\"timeline\": \"use ``` sparingly\"}]");
    }

    fn arb_task() -> impl Strategy<Value = Task> {
        (
            1u32..500,
            "[A-Za-z][A-Za-z ]{0,20}",
            "[A-Za-z][A-Za-z .,]{0,40}",
            prop::collection::vec(1u32..500, 0..4),
            "[A-Za-z0-9 -]{0,12}",
        )
            .prop_map(|(id, task_name, description, dependencies, timeline)| Task {
                id,
                task_name,
                description,
                dependencies,
                timeline,
            })
    }

    proptest! {
        #[test]
        fn fenced_plan_parses_to_same_plan(tasks in prop::collection::vec(arb_task(), 1..6), pretty in any::<bool>()) {
            let plan = Plan::new(tasks);
            let body = if pretty {
                serde_json::to_string_pretty(&plan).unwrap()
            } else {
                serde_json::to_string(&plan).unwrap()
            };

            let fenced = format!("```json\n{}\n```", body);
            let parsed = Plan::from_json(strip_code_fence(&fenced)).unwrap();
            prop_assert_eq!(&parsed, &plan);

            let unfenced = Plan::from_json(strip_code_fence(&body)).unwrap();
            prop_assert_eq!(unfenced, parsed);
        }
    }
}
