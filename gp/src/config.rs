//! goalplan configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::llm::ApiKey;

/// Environment variable set by hosted-function deployments; the static index is not served there
pub const HOSTED_ENV_VAR: &str = "VERCEL";

/// Local development environment file
pub const DOTENV_FILE: &str = ".env";

/// Load `KEY=value` pairs from `dir/.env` into the process environment
///
/// Variables already set in the environment win over the file. A missing
/// file is not an error; an unreadable one is logged and skipped.
/// Returns the path that was loaded.
pub fn load_dotenv(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(DOTENV_FILE);
    debug!(path = %path.display(), "load_dotenv: called");
    match dotenvy::from_path(&path) {
        Ok(()) => {
            tracing::info!("Loaded environment from: {}", path.display());
            Some(path)
        }
        Err(e) if e.not_found() => {
            debug!("load_dotenv: no env file");
            None
        }
        Err(e) => {
            tracing::warn!("Failed to load environment from {}: {}", path.display(), e);
            None
        }
    }
}

/// Main goalplan configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// HTTP server configuration
    pub server: ServerConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// A missing API key is not an error here: the server still starts and
    /// every plan request reports the configuration problem.
    pub fn validate(&self) -> Result<()> {
        if self.llm.provider != "gemini" {
            return Err(eyre::eyre!(
                "Unsupported LLM provider '{}'. Supported: gemini",
                self.llm.provider
            ));
        }
        if self.llm.timeout_ms == 0 {
            return Err(eyre::eyre!("llm.timeout-ms must be greater than zero"));
        }
        if self.llm.model.trim().is_empty() {
            return Err(eyre::eyre!("llm.model must not be empty"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    ///
    /// Explicit path, then `./.goalplan.yml`, then `~/.config/goalplan/goalplan.yml`, then defaults.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::search_paths() {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed; `load` reports them once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let paths = match config_path {
            Some(path) => vec![path.clone()],
            None => Self::search_paths(),
        };

        paths
            .into_iter()
            .filter(|p| p.exists())
            .find_map(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str::<Self>(&content).ok())
            .and_then(|config| config.log_level)
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".goalplan.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("goalplan").join("goalplan.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// How the plan schema is communicated to the model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// Send a response schema and JSON mime type alongside the prompt
    #[default]
    Schema,
    /// Describe the schema in the prompt text and strip code fences from the reply
    Instruction,
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (only "gemini" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Schema-constrained or instruction-only output
    pub mode: OutputMode,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash-preview-05-20".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_ms: 60_000,
            mode: OutputMode::Schema,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        debug!(api_key_env = %self.api_key_env, "get_api_key: called");
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.api_key_env
            )),
        }
    }

    /// Resolve credentials once, at startup
    pub fn credentials(&self) -> Credentials {
        match self.get_api_key() {
            Ok(key) => Credentials::new(&self.api_key_env, Some(ApiKey::new(key))),
            Err(_) => Credentials::new(&self.api_key_env, None),
        }
    }
}

/// Credentials resolved from the environment, injected into the pipeline
#[derive(Debug, Clone)]
pub struct Credentials {
    source: String,
    api_key: Option<ApiKey>,
}

impl Credentials {
    pub fn new(source: impl Into<String>, api_key: Option<ApiKey>) -> Self {
        Self {
            source: source.into(),
            api_key,
        }
    }

    /// Credentials with a key present (tests and embedding)
    pub fn with_key(key: impl Into<String>) -> Self {
        Self::new("GEMINI_API_KEY", Some(ApiKey::new(key)))
    }

    /// Credentials with no key configured
    pub fn missing(source: impl Into<String>) -> Self {
        Self::new(source, None)
    }

    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    /// Name of the environment variable the key comes from
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: String,

    /// Directory holding the front-end `index.html`
    #[serde(rename = "static-dir")]
    pub static_dir: PathBuf,

    /// Serve `index.html` at `/`
    #[serde(rename = "serve-index")]
    pub serve_index: bool,

    /// Allow cross-origin requests from any origin
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            static_dir: PathBuf::from("."),
            serve_index: true,
            cors: true,
        }
    }
}

impl ServerConfig {
    /// Disable the static index when running inside a hosted-function deployment
    pub fn apply_environment(&mut self) {
        if std::env::var_os(HOSTED_ENV_VAR).is_some() {
            debug!("apply_environment: hosted deployment detected, not serving index");
            self.serve_index = false;
        }
    }

    /// Path of the front-end entry document
    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join("index.html")
    }
}
