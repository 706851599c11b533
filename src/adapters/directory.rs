//! Remote agent directory port
//!
//! The form model never talks to storage directly; everything it knows about
//! agents, providers, extensions, prompts, chains and commands comes through
//! this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::warn;

use crate::domain::{
    AgentConfig, AgentSummary, Capability, CommandsMap, ExtensionCatalog, ProviderSettingsSchema,
    SettingsMap,
};
use crate::error::DirectoryResult;

/// Acknowledgement returned by mutation calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Ack {
    #[serde(default)]
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Client of the remote agent directory
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    async fn list_agents(&self) -> DirectoryResult<Vec<AgentSummary>>;

    async fn list_providers(&self) -> DirectoryResult<Vec<String>>;

    async fn list_providers_by_capability(
        &self,
        capability: Capability,
    ) -> DirectoryResult<Vec<String>>;

    async fn get_provider_settings_schema(
        &self,
        provider: &str,
    ) -> DirectoryResult<ProviderSettingsSchema>;

    async fn get_agent_config(&self, agent_name: &str) -> DirectoryResult<AgentConfig>;

    async fn list_extensions(&self) -> DirectoryResult<ExtensionCatalog>;

    async fn create_agent(
        &self,
        agent_name: &str,
        settings: &SettingsMap,
        commands: &CommandsMap,
    ) -> DirectoryResult<Ack>;

    async fn update_agent_settings(
        &self,
        agent_name: &str,
        settings: &SettingsMap,
    ) -> DirectoryResult<Ack>;

    async fn update_agent_commands(
        &self,
        agent_name: &str,
        commands: &CommandsMap,
    ) -> DirectoryResult<Ack>;

    async fn delete_agent(&self, agent_name: &str) -> DirectoryResult<Ack>;

    async fn list_prompt_categories(&self) -> DirectoryResult<Vec<String>>;

    async fn list_prompts(&self, category: &str) -> DirectoryResult<Vec<String>>;

    async fn get_prompt_args(&self, prompt_name: &str, category: &str)
        -> DirectoryResult<Vec<String>>;

    async fn list_chains(&self) -> DirectoryResult<Vec<String>>;

    async fn get_chain_args(&self, chain_name: &str) -> DirectoryResult<Vec<String>>;

    /// Command arguments with their default values
    async fn get_command_args(&self, command_name: &str) -> DirectoryResult<SettingsMap>;
}

/// Await a catalog fetch and fall back to an empty value on failure.
///
/// The form has to render even when the directory is unreachable, so
/// listing failures are logged and replaced by `T::default()`.
pub async fn catalog_or_default<T, F>(what: &str, fetch: F) -> T
where
    T: Default,
    F: Future<Output = DirectoryResult<T>>,
{
    match fetch.await {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to fetch {}: {}", what, e);
            T::default()
        }
    }
}
