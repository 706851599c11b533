//! Read-only catalogs fetched from the agent directory once per form session

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::{Capability, CommandsMap, SettingsMap};

/// Setting key -> default value for one provider
pub type ProviderSettingsSchema = SettingsMap;

/// Capability -> ordered provider names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderCatalog {
    providers: BTreeMap<Capability, Vec<String>>,
}

impl ProviderCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly useful for fixtures
    pub fn with(mut self, capability: Capability, providers: Vec<String>) -> Self {
        self.insert(capability, providers);
        self
    }

    pub fn insert(&mut self, capability: Capability, providers: Vec<String>) {
        self.providers.insert(capability, providers);
    }

    /// Providers for a capability, empty when the capability was never populated
    pub fn providers(&self, capability: Capability) -> &[String] {
        self.providers
            .get(&capability)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.providers.values().all(Vec::is_empty)
    }
}

/// Summary row from the agent listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AgentSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}

/// Stored configuration of an existing agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AgentConfig {
    #[serde(default, deserialize_with = "deserialize_settings")]
    pub settings: SettingsMap,
    #[serde(default)]
    pub commands: CommandsMap,
}

/// A command an extension contributes to the agent
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtensionCommand {
    pub friendly_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_name: Option<String>,
    #[serde(default, alias = "command_args", deserialize_with = "deserialize_settings")]
    pub args: SettingsMap,
}

/// One entry of the extension catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Extension {
    #[serde(alias = "extension_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_label: Option<String>,
    #[serde(default)]
    pub settings: Vec<String>,
    #[serde(default)]
    pub commands: Vec<ExtensionCommand>,
}

impl Extension {
    pub fn new(name: impl Into<String>, settings: Vec<String>) -> Self {
        Self {
            name: name.into(),
            display_label: None,
            settings,
            commands: Vec::new(),
        }
    }

    pub fn with_command(mut self, friendly_name: impl Into<String>) -> Self {
        self.commands.push(ExtensionCommand {
            friendly_name: friendly_name.into(),
            command_name: None,
            args: SettingsMap::new(),
        });
        self
    }

    /// Label shown next to the toggle
    pub fn label(&self) -> String {
        match &self.display_label {
            Some(label) => label.clone(),
            None => self.name.replace('_', " "),
        }
    }
}

/// Extension catalog. Accepts both the list-with-commands shape and the
/// older `name -> settings` mapping, which carries no commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "ExtensionsWire", into = "Vec<Extension>")]
pub struct ExtensionCatalog {
    entries: Vec<Extension>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExtensionsWire {
    List(Vec<Extension>),
    Map(BTreeMap<String, Value>),
}

impl From<ExtensionsWire> for ExtensionCatalog {
    fn from(wire: ExtensionsWire) -> Self {
        match wire {
            ExtensionsWire::List(entries) => Self { entries },
            ExtensionsWire::Map(map) => Self {
                entries: map
                    .into_iter()
                    .map(|(name, schema)| Extension::new(name, setting_names(&schema)))
                    .collect(),
            },
        }
    }
}

impl From<ExtensionCatalog> for Vec<Extension> {
    fn from(catalog: ExtensionCatalog) -> Self {
        catalog.entries
    }
}

fn setting_names(schema: &Value) -> Vec<String> {
    match schema {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Value::Object(map) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

impl ExtensionCatalog {
    pub fn new(entries: Vec<Extension>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&Extension> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Extension> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Friendly names of every command across all extensions
    pub fn command_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|e| e.commands.iter().map(|c| c.friendly_name.clone()))
            .collect()
    }
}

/// Options available to the chat-mode selector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeCatalog {
    pub prompt_categories: Vec<String>,
    /// Prompts of the active category
    pub prompts: Vec<String>,
    pub chains: Vec<String>,
    pub commands: Vec<String>,
}

/// Settings coming back from the API are not always strings; numbers and
/// booleans are stringified so the draft stays a flat string map.
pub(crate) fn deserialize_settings<'de, D>(deserializer: D) -> Result<SettingsMap, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, value_to_setting(v)))
        .collect())
}

pub(crate) fn value_to_setting(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extension_catalog_from_list() {
        let catalog: ExtensionCatalog = serde_json::from_value(json!([
            {
                "extension_name": "web_search",
                "settings": ["SEARXNG_URL"],
                "commands": [{"friendly_name": "Search the web", "command_args": {"query": ""}}]
            }
        ]))
        .unwrap();

        assert_eq!(catalog.len(), 1);
        let ext = catalog.get("web_search").unwrap();
        assert_eq!(ext.settings, vec!["SEARXNG_URL".to_string()]);
        assert_eq!(ext.commands[0].friendly_name, "Search the web");
        assert!(ext.commands[0].args.contains_key("query"));
        assert_eq!(ext.label(), "web search");
    }

    #[test]
    fn test_extension_catalog_from_mapping() {
        let catalog: ExtensionCatalog = serde_json::from_value(json!({
            "github": {"GITHUB_USERNAME": "", "GITHUB_API_KEY": ""},
            "web": ["api_key"]
        }))
        .unwrap();

        assert_eq!(catalog.len(), 2);
        let github = catalog.get("github").unwrap();
        assert_eq!(github.settings.len(), 2);
        assert!(github.commands.is_empty());
        assert_eq!(catalog.get("web").unwrap().settings, vec!["api_key".to_string()]);
    }

    #[test]
    fn test_agent_config_stringifies_values() {
        let config: AgentConfig = serde_json::from_value(json!({
            "settings": {"provider": "openai", "AI_TEMPERATURE": 0.7, "stream": true, "x": null},
            "commands": {"Search the web": false}
        }))
        .unwrap();

        assert_eq!(config.settings["AI_TEMPERATURE"], "0.7");
        assert_eq!(config.settings["stream"], "true");
        assert_eq!(config.settings["x"], "");
        assert_eq!(config.commands["Search the web"], false);
    }

    #[test]
    fn test_provider_catalog_missing_capability_is_empty() {
        let catalog = ProviderCatalog::new().with(Capability::Language, vec!["openai".into()]);
        assert_eq!(catalog.providers(Capability::Language), ["openai".to_string()]);
        assert!(catalog.providers(Capability::Vision).is_empty());
        assert!(!catalog.is_empty());
        assert!(ProviderCatalog::new().is_empty());
    }
}
