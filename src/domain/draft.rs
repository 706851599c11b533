//! The agent configuration being edited in one form session

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::{Capability, SettingsMap};

/// What the submission will do with the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Create,
    Modify,
    Delete,
}

/// How the agent answers chat messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    #[default]
    Default,
    Prompt,
    Chain,
    Command,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Default => "default",
            ChatMode::Prompt => "prompt",
            ChatMode::Chain => "chain",
            ChatMode::Command => "command",
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "default" | "chat" => Ok(ChatMode::Default),
            "prompt" => Ok(ChatMode::Prompt),
            "chain" => Ok(ChatMode::Chain),
            "command" => Ok(ChatMode::Command),
            other => Err(format!("unknown chat mode: {}", other)),
        }
    }
}

/// The concrete prompt, chain or command a chat mode runs
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ModeTarget {
    #[default]
    Default,
    Prompt { category: String, name: String },
    Chain { name: String },
    Command { name: String },
}

impl ModeTarget {
    pub fn mode(&self) -> ChatMode {
        match self {
            ModeTarget::Default => ChatMode::Default,
            ModeTarget::Prompt { .. } => ChatMode::Prompt,
            ModeTarget::Chain { .. } => ChatMode::Chain,
            ModeTarget::Command { .. } => ChatMode::Command,
        }
    }

    /// Name of the selected prompt/chain/command, empty for the default mode
    pub fn name(&self) -> &str {
        match self {
            ModeTarget::Default => "",
            ModeTarget::Prompt { name, .. }
            | ModeTarget::Chain { name }
            | ModeTarget::Command { name } => name,
        }
    }

    /// Settings entries identifying the target, in submission order
    pub fn settings_entries(&self) -> Vec<(&'static str, String)> {
        match self {
            ModeTarget::Default => Vec::new(),
            ModeTarget::Prompt { category, name } => vec![
                ("prompt_category", category.clone()),
                ("prompt_name", name.clone()),
            ],
            ModeTarget::Chain { name } => vec![("chain_name", name.clone())],
            ModeTarget::Command { name } => vec![("command_name", name.clone())],
        }
    }
}

/// Enabled extensions, each owning its own settings sub-map
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ExtensionSelection {
    enabled: BTreeMap<String, SettingsMap>,
}

impl ExtensionSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self, extension: &str) -> bool {
        self.enabled.contains_key(extension)
    }

    pub fn settings(&self, extension: &str) -> Option<&SettingsMap> {
        self.enabled.get(extension)
    }

    pub(crate) fn enable(&mut self, extension: &str, settings: SettingsMap) {
        self.enabled.insert(extension.to_string(), settings);
    }

    pub(crate) fn disable(&mut self, extension: &str) {
        self.enabled.remove(extension);
    }

    pub(crate) fn settings_mut(&mut self, extension: &str) -> Option<&mut SettingsMap> {
        self.enabled.get_mut(extension)
    }

    /// Enabled extension names in stable order
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.enabled.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SettingsMap)> {
        self.enabled.iter()
    }

    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

/// Aggregate edited by one form session
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct AgentDraft {
    pub action: Action,
    pub agent_name: String,
    pub provider_selections: BTreeMap<Capability, String>,
    pub provider_settings: SettingsMap,
    pub extension_selection: ExtensionSelection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_agent: Option<String>,
    pub mode_target: ModeTarget,
    pub mode_args: SettingsMap,
}

impl AgentDraft {
    pub fn new(action: Action, agent_name: impl Into<String>) -> Self {
        Self {
            action,
            agent_name: agent_name.into(),
            ..Default::default()
        }
    }

    pub fn chat_mode(&self) -> ChatMode {
        self.mode_target.mode()
    }

    pub fn selected_provider(&self, capability: Capability) -> Option<&str> {
        self.provider_selections.get(&capability).map(String::as_str)
    }
}
