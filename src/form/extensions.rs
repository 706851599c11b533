//! Extension toggles and their conditional settings

use crate::domain::{
    AgentConfig, CommandsMap, Extension, ExtensionCatalog, ExtensionSelection, SettingsMap,
};

/// Flip an extension on or off.
///
/// Enabling creates an all-empty settings sub-map keyed by the declared
/// settings; disabling drops the sub-map so nothing survives a later enable.
pub fn toggle_extension(
    selection: &ExtensionSelection,
    extension: &Extension,
) -> ExtensionSelection {
    let mut next = selection.clone();
    if next.is_enabled(&extension.name) {
        next.disable(&extension.name);
    } else {
        next.enable(&extension.name, empty_settings(extension));
    }
    next
}

/// One extension row as the view should render it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionField {
    pub name: String,
    pub label: String,
    pub enabled: bool,
    /// Settings sub-map, present only while the extension is enabled
    pub settings: Option<SettingsMap>,
}

/// Rows for every catalog entry, in catalog order
pub fn derive_extension_fields(
    catalog: &ExtensionCatalog,
    selection: &ExtensionSelection,
) -> Vec<ExtensionField> {
    catalog
        .iter()
        .map(|ext| ExtensionField {
            name: ext.name.clone(),
            label: ext.label(),
            enabled: selection.is_enabled(&ext.name),
            settings: selection.settings(&ext.name).cloned(),
        })
        .collect()
}

fn empty_settings(extension: &Extension) -> SettingsMap {
    extension
        .settings
        .iter()
        .map(|key| (key.clone(), String::new()))
        .collect()
}

/// Rebuild the selection of an existing agent.
///
/// An extension counts as enabled when any of its commands is enabled in
/// the stored config. Its settings start from the stored agent settings.
pub fn selection_from_config(
    catalog: &ExtensionCatalog,
    config: &AgentConfig,
) -> ExtensionSelection {
    let mut selection = ExtensionSelection::new();
    for extension in catalog.iter() {
        let enabled = extension
            .commands
            .iter()
            .any(|c| config.commands.get(&c.friendly_name).copied().unwrap_or(false));
        if !enabled {
            continue;
        }
        let settings = extension
            .settings
            .iter()
            .map(|key| {
                let value = config.settings.get(key).cloned().unwrap_or_default();
                (key.clone(), value)
            })
            .collect();
        selection.enable(&extension.name, settings);
    }
    selection
}

/// Commands of every enabled extension, each switched on
pub fn enabled_commands(
    selection: &ExtensionSelection,
    catalog: &ExtensionCatalog,
) -> CommandsMap {
    selection
        .names()
        .filter_map(|name| catalog.get(name))
        .flat_map(|ext| ext.commands.iter())
        .map(|c| (c.friendly_name.clone(), true))
        .collect()
}
