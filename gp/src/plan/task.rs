//! Task and Plan types
//!
//! Field names follow the JSON the front end consumes (`taskName`, not `task_name`).

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One step of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique within the plan, starting at 1
    pub id: u32,

    /// Short name
    pub task_name: String,

    /// One-sentence description
    pub description: String,

    /// Ids of tasks that must finish first
    pub dependencies: Vec<u32>,

    /// Duration or deadline, free text
    pub timeline: String,
}

impl Task {
    /// Check the per-field constraints serde cannot express
    pub fn check_fields(&self) -> Result<(), String> {
        if self.id == 0 {
            return Err("task id must be a positive integer".to_string());
        }
        if self.task_name.trim().is_empty() {
            return Err(format!("task {} has an empty taskName", self.id));
        }
        if self.description.trim().is_empty() {
            return Err(format!("task {} has an empty description", self.id));
        }
        Ok(())
    }
}

/// An ordered list of tasks, serialized as a bare JSON array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan {
    tasks: Vec<Task>,
}

impl Plan {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Parse model output into a plan, validating every task
    ///
    /// Order and content are kept exactly as given.
    pub fn from_json(text: &str) -> Result<Self, String> {
        debug!(text_len = text.len(), "Plan::from_json: called");
        let plan: Plan = serde_json::from_str(text).map_err(|e| format!("payload is not a valid task array: {}", e))?;

        if plan.tasks.is_empty() {
            debug!("Plan::from_json: empty plan");
            return Err("model returned an empty plan".to_string());
        }

        for task in &plan.tasks {
            task.check_fields()?;
        }

        debug!(task_count = plan.tasks.len(), "Plan::from_json: parsed");
        Ok(plan)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
