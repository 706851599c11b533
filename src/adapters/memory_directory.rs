//! In-memory agent directory
//!
//! Backs the `--offline` mode of the CLI and the form session tests. Every
//! call is recorded so callers can check which lookups actually happened.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::directory::{Ack, DirectoryClient};
use crate::domain::{
    AgentConfig, AgentSummary, Capability, CommandsMap, Extension, ExtensionCatalog,
    ProviderSettingsSchema, SettingsMap,
};
use crate::error::{DirectoryError, DirectoryResult};

#[derive(Debug, Default)]
struct DirectoryState {
    agents: BTreeMap<String, AgentConfig>,
    providers: BTreeMap<Capability, Vec<String>>,
    schemas: HashMap<String, ProviderSettingsSchema>,
    extensions: Vec<Extension>,
    prompts: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    chains: BTreeMap<String, Vec<String>>,
    command_args: HashMap<String, SettingsMap>,
    calls: Vec<String>,
    fail_catalogs: bool,
    fail_mutations: bool,
}

/// Directory held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Small catalog used by the offline CLI mode
    pub async fn seeded() -> Self {
        let directory = Self::new();
        directory
            .add_providers(Capability::Language, &["openai", "ezlocalai", "anthropic"])
            .await;
        directory.add_providers(Capability::Vision, &["openai"]).await;
        directory.add_providers(Capability::Tts, &["default", "openai"]).await;
        directory
            .add_providers(Capability::Transcription, &["default"])
            .await;
        directory.add_providers(Capability::Image, &["openai"]).await;
        directory
            .add_providers(Capability::Embeddings, &["default", "openai"])
            .await;
        directory
            .add_schema(
                "openai",
                &[
                    ("OPENAI_API_KEY", ""),
                    ("AI_MODEL", "gpt-4o"),
                    ("AI_TEMPERATURE", "0.7"),
                    ("MAX_TOKENS", "4096"),
                ],
            )
            .await;
        directory
            .add_schema("ezlocalai", &[("EZLOCALAI_API_URI", "http://localhost:8091/v1/")])
            .await;
        directory
            .add_schema("anthropic", &[("ANTHROPIC_API_KEY", ""), ("AI_MODEL", "claude")])
            .await;
        directory
            .add_extension(
                Extension::new("web_search", vec!["SEARXNG_INSTANCE_URL".to_string()])
                    .with_command("Search the web"),
            )
            .await;
        directory
            .add_extension(
                Extension::new(
                    "github",
                    vec!["GITHUB_USERNAME".to_string(), "GITHUB_API_KEY".to_string()],
                )
                .with_command("Clone Github Repository"),
            )
            .await;
        directory
            .add_prompt("Default", "Chat", &["user_input", "context"])
            .await;
        directory
            .add_prompt("Default", "Summarize", &["user_input", "length"])
            .await;
        directory
            .add_chain("Smart Chat", &["user_input", "websearch_depth"])
            .await;
        directory.add_command_args("Search the web", &[("query", "")]).await;
        directory
            .add_agent("AGiXT", &[("provider", "openai"), ("mode", "prompt")], &[])
            .await;
        directory
    }

    pub async fn add_providers(&self, capability: Capability, providers: &[&str]) {
        let mut state = self.state.write().await;
        state
            .providers
            .insert(capability, providers.iter().map(|p| p.to_string()).collect());
    }

    pub async fn add_schema(&self, provider: &str, schema: &[(&str, &str)]) {
        let mut state = self.state.write().await;
        state.schemas.insert(provider.to_string(), pairs(schema));
    }

    pub async fn add_extension(&self, extension: Extension) {
        self.state.write().await.extensions.push(extension);
    }

    pub async fn add_prompt(&self, category: &str, name: &str, args: &[&str]) {
        let mut state = self.state.write().await;
        state
            .prompts
            .entry(category.to_string())
            .or_default()
            .insert(name.to_string(), strings(args));
    }

    pub async fn add_chain(&self, name: &str, args: &[&str]) {
        let mut state = self.state.write().await;
        state.chains.insert(name.to_string(), strings(args));
    }

    pub async fn add_command_args(&self, command: &str, args: &[(&str, &str)]) {
        let mut state = self.state.write().await;
        state.command_args.insert(command.to_string(), pairs(args));
    }

    pub async fn add_agent(
        &self,
        name: &str,
        settings: &[(&str, &str)],
        commands: &[(&str, bool)],
    ) {
        let mut state = self.state.write().await;
        state.agents.insert(
            name.to_string(),
            AgentConfig {
                settings: pairs(settings),
                commands: commands.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            },
        );
    }

    /// Make every listing call fail
    pub async fn fail_catalogs(&self, fail: bool) {
        self.state.write().await.fail_catalogs = fail;
    }

    /// Make every create/update/delete call fail
    pub async fn fail_mutations(&self, fail: bool) {
        self.state.write().await.fail_mutations = fail;
    }

    /// Calls made so far, e.g. `get_provider_settings_schema:openai`
    pub async fn calls(&self) -> Vec<String> {
        self.state.read().await.calls.clone()
    }

    pub async fn agent(&self, name: &str) -> Option<AgentConfig> {
        self.state.read().await.agents.get(name).cloned()
    }

    async fn read_catalog<T>(
        &self,
        call: String,
        read: impl FnOnce(&DirectoryState) -> DirectoryResult<T>,
    ) -> DirectoryResult<T> {
        let mut state = self.state.write().await;
        state.calls.push(call.clone());
        if state.fail_catalogs {
            return Err(DirectoryError::Network(format!("{} unavailable", call)));
        }
        read(&*state)
    }

    async fn mutate(
        &self,
        call: String,
        apply: impl FnOnce(&mut DirectoryState) -> DirectoryResult<Ack>,
    ) -> DirectoryResult<Ack> {
        let mut state = self.state.write().await;
        state.calls.push(call.clone());
        if state.fail_mutations {
            return Err(DirectoryError::Api {
                status: 500,
                message: format!("{} rejected", call),
            });
        }
        apply(&mut *state)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pairs(items: &[(&str, &str)]) -> SettingsMap {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn agent_missing(name: &str) -> DirectoryError {
    DirectoryError::NotFound(format!("agent {}", name))
}

#[async_trait]
impl DirectoryClient for InMemoryDirectory {
    async fn list_agents(&self) -> DirectoryResult<Vec<AgentSummary>> {
        self.read_catalog("list_agents".into(), |s| {
            Ok(s.agents
                .keys()
                .map(|name| AgentSummary {
                    name: name.clone(),
                    status: None,
                })
                .collect())
        })
        .await
    }

    async fn list_providers(&self) -> DirectoryResult<Vec<String>> {
        self.read_catalog("list_providers".into(), |s| {
            let mut all: Vec<String> = s.providers.values().flatten().cloned().collect();
            all.sort();
            all.dedup();
            Ok(all)
        })
        .await
    }

    async fn list_providers_by_capability(
        &self,
        capability: Capability,
    ) -> DirectoryResult<Vec<String>> {
        self.read_catalog(format!("list_providers_by_capability:{}", capability), |s| {
            Ok(s.providers.get(&capability).cloned().unwrap_or_default())
        })
        .await
    }

    async fn get_provider_settings_schema(
        &self,
        provider: &str,
    ) -> DirectoryResult<ProviderSettingsSchema> {
        self.read_catalog(format!("get_provider_settings_schema:{}", provider), |s| {
            s.schemas
                .get(provider)
                .cloned()
                .ok_or_else(|| DirectoryError::NotFound(format!("provider {}", provider)))
        })
        .await
    }

    async fn get_agent_config(&self, agent_name: &str) -> DirectoryResult<AgentConfig> {
        self.read_catalog(format!("get_agent_config:{}", agent_name), |s| {
            s.agents
                .get(agent_name)
                .cloned()
                .ok_or_else(|| agent_missing(agent_name))
        })
        .await
    }

    async fn list_extensions(&self) -> DirectoryResult<ExtensionCatalog> {
        self.read_catalog("list_extensions".into(), |s| {
            Ok(ExtensionCatalog::new(s.extensions.clone()))
        })
        .await
    }

    async fn create_agent(
        &self,
        agent_name: &str,
        settings: &SettingsMap,
        commands: &CommandsMap,
    ) -> DirectoryResult<Ack> {
        self.mutate(format!("create_agent:{}", agent_name), |s| {
            s.agents.insert(
                agent_name.to_string(),
                AgentConfig {
                    settings: settings.clone(),
                    commands: commands.clone(),
                },
            );
            Ok(Ack::new(format!("Agent {} created.", agent_name)))
        })
        .await
    }

    async fn update_agent_settings(
        &self,
        agent_name: &str,
        settings: &SettingsMap,
    ) -> DirectoryResult<Ack> {
        self.mutate(format!("update_agent_settings:{}", agent_name), |s| {
            let agent = s
                .agents
                .get_mut(agent_name)
                .ok_or_else(|| agent_missing(agent_name))?;
            agent.settings = settings.clone();
            Ok(Ack::new(format!("Agent {} configuration updated.", agent_name)))
        })
        .await
    }

    async fn update_agent_commands(
        &self,
        agent_name: &str,
        commands: &CommandsMap,
    ) -> DirectoryResult<Ack> {
        self.mutate(format!("update_agent_commands:{}", agent_name), |s| {
            let agent = s
                .agents
                .get_mut(agent_name)
                .ok_or_else(|| agent_missing(agent_name))?;
            agent.commands = commands.clone();
            Ok(Ack::new(format!("Agent {} commands updated.", agent_name)))
        })
        .await
    }

    async fn delete_agent(&self, agent_name: &str) -> DirectoryResult<Ack> {
        self.mutate(format!("delete_agent:{}", agent_name), |s| {
            s.agents
                .remove(agent_name)
                .map(|_| Ack::new(format!("Agent {} deleted.", agent_name)))
                .ok_or_else(|| agent_missing(agent_name))
        })
        .await
    }

    async fn list_prompt_categories(&self) -> DirectoryResult<Vec<String>> {
        self.read_catalog("list_prompt_categories".into(), |s| {
            Ok(s.prompts.keys().cloned().collect())
        })
        .await
    }

    async fn list_prompts(&self, category: &str) -> DirectoryResult<Vec<String>> {
        self.read_catalog(format!("list_prompts:{}", category), |s| {
            Ok(s.prompts
                .get(category)
                .map(|p| p.keys().cloned().collect())
                .unwrap_or_default())
        })
        .await
    }

    async fn get_prompt_args(
        &self,
        prompt_name: &str,
        category: &str,
    ) -> DirectoryResult<Vec<String>> {
        self.read_catalog(format!("get_prompt_args:{}/{}", category, prompt_name), |s| {
            s.prompts
                .get(category)
                .and_then(|p| p.get(prompt_name))
                .cloned()
                .ok_or_else(|| DirectoryError::NotFound(format!("prompt {}", prompt_name)))
        })
        .await
    }

    async fn list_chains(&self) -> DirectoryResult<Vec<String>> {
        self.read_catalog("list_chains".into(), |s| Ok(s.chains.keys().cloned().collect()))
            .await
    }

    async fn get_chain_args(&self, chain_name: &str) -> DirectoryResult<Vec<String>> {
        self.read_catalog(format!("get_chain_args:{}", chain_name), |s| {
            s.chains
                .get(chain_name)
                .cloned()
                .ok_or_else(|| DirectoryError::NotFound(format!("chain {}", chain_name)))
        })
        .await
    }

    async fn get_command_args(&self, command_name: &str) -> DirectoryResult<SettingsMap> {
        self.read_catalog(format!("get_command_args:{}", command_name), |s| {
            Ok(s.command_args.get(command_name).cloned().unwrap_or_default())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_update_delete_cycle() {
        let directory = InMemoryDirectory::new();
        let settings = pairs(&[("provider", "openai")]);

        directory
            .create_agent("bot1", &settings, &CommandsMap::new())
            .await
            .unwrap();
        assert_eq!(directory.list_agents().await.unwrap().len(), 1);

        let updated = pairs(&[("provider", "anthropic")]);
        directory.update_agent_settings("bot1", &updated).await.unwrap();
        let config = directory.get_agent_config("bot1").await.unwrap();
        assert_eq!(config.settings["provider"], "anthropic");

        directory.delete_agent("bot1").await.unwrap();
        assert!(matches!(
            directory.get_agent_config("bot1").await,
            Err(DirectoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failure_switches() {
        let directory = InMemoryDirectory::seeded().await;
        directory.fail_catalogs(true).await;
        assert!(directory.list_chains().await.is_err());

        directory.fail_catalogs(false).await;
        directory.fail_mutations(true).await;
        assert!(directory.list_chains().await.is_ok());
        assert!(directory.delete_agent("AGiXT").await.is_err());
        assert!(directory.agent("AGiXT").await.is_some());
    }

    #[tokio::test]
    async fn test_calls_are_recorded() {
        let directory = InMemoryDirectory::seeded().await;
        directory.get_provider_settings_schema("openai").await.unwrap();
        let calls = directory.calls().await;
        assert_eq!(calls, vec!["get_provider_settings_schema:openai".to_string()]);
    }
}
