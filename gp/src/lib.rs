//! goalplan - goal-to-plan service
//!
//! Accepts a natural-language goal, asks an LLM (Gemini) to decompose it into
//! tasks with dependencies and timelines, and returns the result as JSON.
//!
//! # Modules
//!
//! - [`plan`] - the request pipeline: prompt, LLM call, sanitize, parse, classify
//! - [`llm`] - LLM client trait and Gemini implementation
//! - [`server`] - axum HTTP server exposing `POST /api/generate-plan`
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod llm;
pub mod plan;
pub mod server;

// Re-export commonly used types
pub use config::{Config, Credentials, LlmConfig, OutputMode, ServerConfig};
pub use llm::{ApiKey, GeminiClient, GenerateRequest, GenerateResponse, LlmClient, LlmError, create_client};
pub use plan::{Plan, PlanError, PlanIssue, PlanPipeline, Task};
pub use server::{AppState, router};
