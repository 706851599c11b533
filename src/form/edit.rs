//! Field edits reported by the view
//!
//! Every edit names the field it touches by value (capability, setting key,
//! extension name), so row handlers can be registered with the identifier
//! instead of closing over whatever the rendering loop was iterating.

use crate::domain::{Capability, ChatMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    AgentName(String),
    Provider {
        capability: Capability,
        provider: String,
    },
    ProviderSetting {
        key: String,
        value: String,
    },
    ToggleExtension(String),
    ExtensionSetting {
        extension: String,
        key: String,
        value: String,
    },
    HelperAgent(Option<String>),
    ChatMode(ChatMode),
    PromptCategory(String),
    /// Prompt, chain or command name, depending on the active mode
    ModeTarget(String),
    ModeArg {
        key: String,
        value: String,
    },
}

impl FieldEdit {
    /// Stable identifier of the edited field, used in logs and status lines
    pub fn field_id(&self) -> String {
        match self {
            FieldEdit::AgentName(_) => "agent_name".to_string(),
            FieldEdit::Provider { capability, .. } => format!("provider.{}", capability),
            FieldEdit::ProviderSetting { key, .. } => format!("setting.{}", key),
            FieldEdit::ToggleExtension(name) => format!("extension.{}", name),
            FieldEdit::ExtensionSetting { extension, key, .. } => {
                format!("extension.{}.{}", extension, key)
            }
            FieldEdit::HelperAgent(_) => "helper".to_string(),
            FieldEdit::ChatMode(_) => "mode".to_string(),
            FieldEdit::PromptCategory(_) => "category".to_string(),
            FieldEdit::ModeTarget(_) => "target".to_string(),
            FieldEdit::ModeArg { key, .. } => format!("arg.{}", key),
        }
    }
}
