//! Turning a draft into the settings and commands maps sent to the directory

use serde::{Deserialize, Serialize};

use super::extensions::enabled_commands;
use crate::domain::{
    is_sentinel, Action, AgentDraft, Capability, CommandsMap, ExtensionCatalog, SettingsMap,
    HELPER_AGENT_KEY, MODE_KEY, NO_PROVIDERS,
};
use crate::error::ValidationError;

/// Payload of one create/update call
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Submission {
    pub settings: SettingsMap,
    pub commands: CommandsMap,
}

/// Serialize a draft.
///
/// Settings are written in a fixed order and later writes win: provider
/// selections, provider settings, extension settings, helper agent, then the
/// chat mode with its target and arguments.
pub fn serialize_submission(draft: &AgentDraft, extensions: &ExtensionCatalog) -> Submission {
    let mut settings = SettingsMap::new();

    for capability in Capability::ALL {
        match draft.provider_selections.get(&capability) {
            Some(provider) if provider != NO_PROVIDERS => {
                settings.insert(capability.settings_key().to_string(), provider.clone());
            }
            _ => {}
        }
    }

    settings.extend(
        draft
            .provider_settings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );

    for (_, extension_settings) in draft.extension_selection.iter() {
        settings.extend(extension_settings.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    if let Some(helper) = &draft.helper_agent {
        settings.insert(HELPER_AGENT_KEY.to_string(), helper.clone());
    }

    settings.insert(MODE_KEY.to_string(), draft.chat_mode().to_string());
    for (key, value) in draft.mode_target.settings_entries() {
        settings.insert(key.to_string(), value);
    }
    settings.extend(draft.mode_args.iter().map(|(k, v)| (k.clone(), v.clone())));

    Submission {
        settings,
        commands: enabled_commands(&draft.extension_selection, extensions),
    }
}

/// Checks run before anything is sent
pub fn validate_draft(draft: &AgentDraft) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if draft.agent_name.trim().is_empty() {
        errors.push(ValidationError::MissingField("agent_name".to_string()));
    }

    if draft.action != Action::Delete {
        let language = draft
            .selected_provider(Capability::Language)
            .unwrap_or_default();
        if is_sentinel(language) {
            errors.push(ValidationError::InvalidValue {
                field: Capability::Language.settings_key().to_string(),
                reason: "a language provider must be selected".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
