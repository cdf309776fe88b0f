//! CLI command definitions and subcommands

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

use crate::plan::Plan;

/// goalplan - break a goal into a task plan
#[derive(Parser)]
#[command(
    name = "goalplan",
    about = "Turns a goal into a dependency-ordered task plan using an LLM",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// Address to listen on (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Generate a single plan and print it
    Plan {
        /// The goal to plan for
        goal: String,

        /// File containing a prompt template with a {goal_text} placeholder
        #[arg(short, long)]
        prompt_file: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for the `plan` command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render a plan for the terminal
pub fn format_plan(plan: &Plan, format: OutputFormat) -> eyre::Result<String> {
    debug!(?format, task_count = plan.len(), "format_plan: called");
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(plan)?),
        OutputFormat::Text => {
            let mut out = String::new();
            for task in plan.tasks() {
                out.push_str(&format!(
                    "{} {}  {}\n",
                    format!("{:>3}.", task.id).bold(),
                    task.task_name.cyan(),
                    format!("[{}]", task.timeline).dimmed()
                ));
                out.push_str(&format!("     {}\n", task.description));
                if !task.dependencies.is_empty() {
                    let deps: Vec<String> = task.dependencies.iter().map(|d| d.to_string()).collect();
                    out.push_str(&format!("     {} {}\n", "after:".yellow(), deps.join(", ")));
                }
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Task;

    fn plan() -> Plan {
        Plan::new(vec![
            Task {
                id: 1,
                task_name: "Choose topic".to_string(),
                description: "Pick a niche.".to_string(),
                dependencies: vec![],
                timeline: "Day 1".to_string(),
            },
            Task {
                id: 2,
                task_name: "Record pilot".to_string(),
                description: "Record first episode.".to_string(),
                dependencies: vec![1],
                timeline: "Day 2-3".to_string(),
            },
        ])
    }

    #[test]
    fn test_parse_plan_command() {
        let cli = Cli::try_parse_from(["goalplan", "plan", "Launch a podcast", "--format", "json"]).unwrap();
        match cli.command {
            Some(Command::Plan { goal, format, prompt_file }) => {
                assert_eq!(goal, "Launch a podcast");
                assert_eq!(format, OutputFormat::Json);
                assert!(prompt_file.is_none());
            }
            other => panic!("Expected Plan command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_defaults_to_no_command() {
        let cli = Cli::try_parse_from(["goalplan", "--log-level", "debug"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_format_plan_json_round_trips() {
        let out = format_plan(&plan(), OutputFormat::Json).unwrap();
        let back: Plan = serde_json::from_str(&out).unwrap();
        assert_eq!(back, plan());
    }

    #[test]
    fn test_format_plan_text() {
        colored::control::set_override(false);
        let out = format_plan(&plan(), OutputFormat::Text).unwrap();
        assert!(out.contains("  1. Choose topic  [Day 1]"));
        assert!(out.contains("after: 1"));
        assert_eq!(out.matches("after:").count(), 1);
    }
}
