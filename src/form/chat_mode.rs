//! Chat-mode dependent argument sets

use crate::domain::{ChatMode, ModeCatalog, ModeTarget, SettingsMap, USER_INPUT_ARG};

/// Resolve the prompt/chain/command a mode should run: the saved value if
/// the agent has one, else the first option in the catalog, else empty.
pub fn resolve_mode_target(
    mode: ChatMode,
    agent_settings: &SettingsMap,
    catalog: &ModeCatalog,
) -> ModeTarget {
    let saved_or_first = |key: &str, options: &[String]| -> String {
        agent_settings
            .get(key)
            .filter(|v| !v.is_empty())
            .cloned()
            .or_else(|| options.first().cloned())
            .unwrap_or_default()
    };

    match mode {
        ChatMode::Default => ModeTarget::Default,
        ChatMode::Prompt => ModeTarget::Prompt {
            category: saved_or_first("prompt_category", &catalog.prompt_categories),
            name: saved_or_first("prompt_name", &catalog.prompts),
        },
        ChatMode::Chain => ModeTarget::Chain {
            name: saved_or_first("chain_name", &catalog.chains),
        },
        ChatMode::Command => ModeTarget::Command {
            name: saved_or_first("command_name", &catalog.commands),
        },
    }
}

/// Chat mode stored in the agent settings, `Default` when absent or unknown
pub fn saved_chat_mode(agent_settings: &SettingsMap) -> ChatMode {
    agent_settings
        .get(crate::domain::MODE_KEY)
        .and_then(|m| m.parse().ok())
        .unwrap_or_default()
}

/// Build the argument map for a mode target.
///
/// `available_args` returns the declared argument names of the target.
/// `user_input` is left out unless `include_user_input` is set. Each
/// argument starts from the agent's saved value, else an empty string.
pub fn derive_chat_mode_args<F>(
    target: &ModeTarget,
    agent_settings: &SettingsMap,
    include_user_input: bool,
    available_args: F,
) -> SettingsMap
where
    F: FnOnce(&ModeTarget) -> Vec<String>,
{
    if matches!(target, ModeTarget::Default) || target.name().is_empty() {
        return SettingsMap::new();
    }

    available_args(target)
        .into_iter()
        .filter(|arg| include_user_input || arg != USER_INPUT_ARG)
        .map(|arg| {
            let value = agent_settings.get(&arg).cloned().unwrap_or_default();
            (arg, value)
        })
        .collect()
}
