//! Plan request pipeline
//!
//! Turns a natural-language goal into a `Plan` via one LLM call.
//!
//! - [`task`] - `Task` and `Plan` types and per-field validation
//! - [`prompt`] - prompt templates and the response schema
//! - [`sanitize`] - code-fence stripping for free-form replies
//! - [`graph`] - dependency checks (reported, not enforced)
//! - [`pipeline`] - the request pipeline itself

mod error;
pub mod graph;
mod pipeline;
pub mod prompt;
pub mod sanitize;
mod task;

pub use error::PlanError;
pub use graph::{PlanIssue, check_dependencies};
pub use pipeline::PlanPipeline;
pub use prompt::{DEFAULT_PROMPT_TEMPLATE, GOAL_PLACEHOLDER, build_prompt, plan_response_schema};
pub use sanitize::strip_code_fence;
pub use task::{Plan, Task};
