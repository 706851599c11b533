use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::Capability;

/// Agent console - configure agents of a remote orchestration API
#[derive(Parser, Debug, Clone)]
#[command(name = "agent-console", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(
        short,
        long,
        env = "AGENT_CONSOLE_CONFIG",
        default_value = "agent-console.toml",
        global = true
    )]
    pub config: PathBuf,

    /// Base URL of the orchestration API
    #[arg(long, env = "AGENT_CONSOLE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// API key sent as a bearer token
    #[arg(long, env = "AGENT_CONSOLE_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Use a built-in in-memory directory instead of the API
    #[arg(long, global = true)]
    pub offline: bool,

    /// Show the `user_input` argument among chat-mode arguments
    #[arg(long, global = true)]
    pub user_input: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List, inspect and edit agents
    Agents {
        #[command(subcommand)]
        command: AgentCommand,
    },
    /// List providers, optionally for one capability
    Providers {
        #[arg(long)]
        capability: Option<Capability>,
    },
    /// List extensions with their settings and commands
    Extensions,
    /// List chains or show the arguments of one
    Chains {
        #[command(subcommand)]
        command: Option<ChainCommand>,
    },
    /// List prompt categories, or the prompts of one category
    Prompts {
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum AgentCommand {
    /// List agents
    List,
    /// Render the edit form of an agent
    Show { name: String },
    /// Create an agent
    Create {
        name: String,
        /// Field assignment applied before submitting (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        edits: Vec<String>,
    },
    /// Change an existing agent
    Edit {
        name: String,
        /// Field assignment applied before submitting (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        edits: Vec<String>,
    },
    /// Delete an agent
    Delete { name: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ChainCommand {
    /// Show the arguments a chain declares
    Args { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["agent-console", "agents", "list"]);
        assert_eq!(cli.config, PathBuf::from("agent-console.toml"));
        assert!(cli.base_url.is_none());
        assert!(!cli.offline);
        assert!(matches!(
            cli.command,
            Command::Agents {
                command: AgentCommand::List
            }
        ));
    }

    #[test]
    fn test_cli_create_with_edits() {
        let cli = Cli::parse_from([
            "agent-console",
            "--base-url",
            "http://agents:7437",
            "agents",
            "create",
            "bot1",
            "--set",
            "provider.language=openai",
            "--set",
            "mode=chain",
            "--offline",
        ]);
        assert_eq!(cli.base_url, Some("http://agents:7437".to_string()));
        assert!(cli.offline);
        match cli.command {
            Command::Agents {
                command: AgentCommand::Create { name, edits },
            } => {
                assert_eq!(name, "bot1");
                assert_eq!(edits, vec!["provider.language=openai", "mode=chain"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_providers_capability() {
        let cli = Cli::parse_from(["agent-console", "providers", "--capability", "vision"]);
        assert!(matches!(
            cli.command,
            Command::Providers {
                capability: Some(Capability::Vision)
            }
        ));
        let parsed = Cli::try_parse_from(["agent-console", "providers", "--capability", "smell"]);
        assert!(parsed.is_err());
    }
}
