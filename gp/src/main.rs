//! goalplan - goal-to-plan service
//!
//! CLI entry point: runs the HTTP server or generates a single plan.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use goalplan::cli::{Cli, Command, OutputFormat, format_plan};
use goalplan::config::{Config, load_dotenv};
use goalplan::llm::create_client;
use goalplan::plan::PlanPipeline;
use goalplan::server::{self, AppState};

fn parse_level(level_str: Option<&str>) -> tracing::Level {
    match level_str.map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>, log_file: Option<&Path>) -> Result<()> {
    // Priority: CLI --log-level > config file > default (INFO)
    let level = parse_level(cli_log_level.or(config_log_level));
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).context("Failed to create log directory")?;
            }
            let file = fs::File::create(path).context("Failed to create log file")?;
            tracing_subscriber::fmt()
                .with_writer(file)
                .with_ansi(false)
                .with_env_filter(filter)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
    }

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn build_pipeline(config: &Config) -> Result<PlanPipeline> {
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    Ok(PlanPipeline::new(llm, config.llm.credentials(), config.llm.mode))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(
        cli.log_level.as_deref(),
        config_log_level.as_deref(),
        cli.log_file.as_deref(),
    )
    .context("Failed to setup logging")?;

    // Before any credentials are resolved
    load_dotenv(Path::new("."));

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    info!(model = %config.llm.model, mode = ?config.llm.mode, "goalplan loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None => cmd_serve(config).await,
        Some(Command::Serve { bind }) => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            cmd_serve(config).await
        }
        Some(Command::Plan {
            goal,
            prompt_file,
            format,
        }) => cmd_plan(&config, &goal, prompt_file.as_ref(), format).await,
    }
}

async fn cmd_serve(mut config: Config) -> Result<()> {
    debug!("cmd_serve: called");
    config.server.apply_environment();
    let pipeline = build_pipeline(&config)?;
    server::run(AppState::new(pipeline), &config.server).await
}

async fn cmd_plan(config: &Config, goal: &str, prompt_file: Option<&PathBuf>, format: OutputFormat) -> Result<()> {
    debug!(%goal, ?prompt_file, "cmd_plan: called");
    let template = prompt_file
        .map(|path| fs::read_to_string(path).context(format!("Failed to read prompt file {}", path.display())))
        .transpose()?;

    let pipeline = build_pipeline(config)?;
    let plan = pipeline.request_plan(Some(goal), template.as_deref()).await?;

    print!("{}", format_plan(&plan, format)?);
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}
