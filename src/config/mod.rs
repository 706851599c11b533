use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod validator;

use crate::cli::Cli;

/// Prefix of environment overrides, e.g. `AGENT_CONSOLE__SERVER__BASE_URL`
pub const ENV_PREFIX: &str = "AGENT_CONSOLE";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub form: FormSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the agent directory lives and how to authenticate against it
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    /// Base URL of the orchestration API (e.g., "http://localhost:7437")
    pub base_url: String,
    /// API key sent as a bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable containing the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    30
}

impl ServerSettings {
    /// The direct key wins over the environment indirection
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
            return Some(key.clone());
        }

        if let Some(env_var) = &self.api_key_env {
            return std::env::var(env_var).ok().filter(|k| !k.is_empty());
        }

        None
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FormSettings {
    /// Show the `user_input` argument among chat-mode arguments
    #[serde(default)]
    pub include_user_input: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_file(Path::new("agent-console.toml"))
    }

    /// Create settings from CLI arguments (config file, env vars, then CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(&cli.config)?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let settings = Self::load(path)?;
        settings.validate()?;
        Ok(settings)
    }

    fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .set_default("server.base_url", "http://localhost:7437")?
            .set_default("server.timeout_seconds", 30)?
            .set_default("form.include_user_input", false)?
            .set_default("logging.level", "info")?
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(s.try_deserialize()?)
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(base_url) = &cli.base_url {
            self.server.base_url = base_url.clone();
        }
        if let Some(api_key) = &cli.api_key {
            self.server.api_key = Some(api_key.clone());
        }
        if let Some(level) = &cli.log_level {
            self.logging.level = level.clone();
        }
        if cli.user_input {
            self.form.include_user_input = true;
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    /// Max level for the tracing subscriber; validation guarantees it parses
    pub fn log_level(&self) -> tracing::Level {
        self.logging.level.parse().unwrap_or(tracing::Level::INFO)
    }
}
