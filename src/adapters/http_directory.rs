//! HTTP directory client for the agent orchestration REST API

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::directory::{Ack, DirectoryClient};
use crate::config::ServerSettings;
use crate::domain::{
    AgentConfig, AgentSummary, Capability, CommandsMap, ExtensionCatalog, ProviderSettingsSchema,
    SettingsMap,
};
use crate::error::{DirectoryError, DirectoryResult};

/// Directory client speaking the `/api/...` REST surface
#[derive(Debug, Clone)]
pub struct HttpDirectoryClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpDirectoryClient {
    /// Build a client from the server section of the configuration
    pub fn new(server: &ServerSettings) -> DirectoryResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(server.timeout_seconds))
            .build()
            .map_err(|e| DirectoryError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: server.base_url.trim_end_matches('/').to_string(),
            api_key: server.resolve_api_key(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = format!("{}/api", self.base_url);
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.api_key {
            Some(key) => builder.header("Authorization", format!("Bearer {}", key)),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, url: &str) -> DirectoryResult<Value> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(DirectoryError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        field: &str,
    ) -> DirectoryResult<T> {
        let url = self.url(segments);
        debug!("GET {}", url);
        let body = self.send(self.request(Method::GET, &url), &url).await?;
        extract_field(body, field)
    }

    async fn mutate<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> DirectoryResult<Ack> {
        let url = self.url(segments);
        debug!("{} {}", method, url);
        let mut builder = self.request(method, &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let body = self.send(builder, &url).await?;
        Ok(match body {
            Value::Null => Ack::default(),
            other => serde_json::from_value(other).unwrap_or_default(),
        })
    }
}

/// Responses are usually wrapped in a single-field envelope
/// (`{"providers": [...]}`); a bare payload is accepted as well.
fn extract_field<T: DeserializeOwned>(body: Value, field: &str) -> DirectoryResult<T> {
    let payload = match body {
        Value::Object(mut map) if map.contains_key(field) => {
            map.remove(field).unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(payload)
        .map_err(|e| DirectoryError::Parse(format!("Failed to parse `{}`: {}", field, e)))
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn list_agents(&self) -> DirectoryResult<Vec<AgentSummary>> {
        self.get(&["agent"], "agents").await
    }

    async fn list_providers(&self) -> DirectoryResult<Vec<String>> {
        self.get(&["provider"], "providers").await
    }

    async fn list_providers_by_capability(
        &self,
        capability: Capability,
    ) -> DirectoryResult<Vec<String>> {
        self.get(&["providers", "service", capability.as_str()], "providers")
            .await
    }

    async fn get_provider_settings_schema(
        &self,
        provider: &str,
    ) -> DirectoryResult<ProviderSettingsSchema> {
        let raw: serde_json::Map<String, Value> =
            self.get(&["provider", provider], "settings").await?;
        Ok(raw
            .into_iter()
            .map(|(k, v)| (k, crate::domain::catalog::value_to_setting(v)))
            .collect())
    }

    async fn get_agent_config(&self, agent_name: &str) -> DirectoryResult<AgentConfig> {
        self.get(&["agent", agent_name], "agent").await
    }

    async fn list_extensions(&self) -> DirectoryResult<ExtensionCatalog> {
        self.get(&["extensions"], "extensions").await
    }

    async fn create_agent(
        &self,
        agent_name: &str,
        settings: &SettingsMap,
        commands: &CommandsMap,
    ) -> DirectoryResult<Ack> {
        let body = json!({
            "agent_name": agent_name,
            "settings": settings,
            "commands": commands,
        });
        self.mutate(Method::POST, &["agent"], Some(&body)).await
    }

    async fn update_agent_settings(
        &self,
        agent_name: &str,
        settings: &SettingsMap,
    ) -> DirectoryResult<Ack> {
        let body = json!({
            "agent_name": agent_name,
            "settings": settings,
        });
        self.mutate(Method::PUT, &["agent", agent_name], Some(&body))
            .await
    }

    async fn update_agent_commands(
        &self,
        agent_name: &str,
        commands: &CommandsMap,
    ) -> DirectoryResult<Ack> {
        let body = json!({
            "agent_name": agent_name,
            "commands": commands,
        });
        self.mutate(Method::PATCH, &["agent", agent_name, "commands"], Some(&body))
            .await
    }

    async fn delete_agent(&self, agent_name: &str) -> DirectoryResult<Ack> {
        self.mutate::<Value>(Method::DELETE, &["agent", agent_name], None)
            .await
    }

    async fn list_prompt_categories(&self) -> DirectoryResult<Vec<String>> {
        self.get(&["prompt", "categories"], "prompt_categories").await
    }

    async fn list_prompts(&self, category: &str) -> DirectoryResult<Vec<String>> {
        self.get(&["prompt", category], "prompts").await
    }

    async fn get_prompt_args(
        &self,
        prompt_name: &str,
        category: &str,
    ) -> DirectoryResult<Vec<String>> {
        self.get(&["prompt", category, prompt_name, "args"], "prompt_args")
            .await
    }

    async fn list_chains(&self) -> DirectoryResult<Vec<String>> {
        self.get(&["chain"], "chains").await
    }

    async fn get_chain_args(&self, chain_name: &str) -> DirectoryResult<Vec<String>> {
        self.get(&["chain", chain_name, "args"], "chain_args").await
    }

    async fn get_command_args(&self, command_name: &str) -> DirectoryResult<SettingsMap> {
        let raw: serde_json::Map<String, Value> = self
            .get(&["extensions", command_name, "args"], "command_args")
            .await?;
        Ok(raw
            .into_iter()
            .map(|(k, v)| (k, crate::domain::catalog::value_to_setting(v)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpDirectoryClient {
        HttpDirectoryClient::new(&ServerSettings {
            base_url: "http://localhost:7437/".to_string(),
            api_key: Some("secret".to_string()),
            api_key_env: None,
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_url_encodes_segments() {
        let client = client();
        assert_eq!(client.base_url(), "http://localhost:7437");
        assert_eq!(
            client.url(&["chain", "Smart Chat", "args"]),
            "http://localhost:7437/api/chain/Smart%20Chat/args"
        );
    }

    #[test]
    fn test_extract_field_envelope_and_bare() {
        let wrapped: Vec<String> =
            extract_field(serde_json::json!({"chains": ["a", "b"]}), "chains").unwrap();
        assert_eq!(wrapped, vec!["a", "b"]);

        let bare: Vec<String> = extract_field(serde_json::json!(["a"]), "chains").unwrap();
        assert_eq!(bare, vec!["a"]);

        let err = extract_field::<Vec<String>>(serde_json::json!({"chains": 3}), "chains");
        assert!(matches!(err, Err(DirectoryError::Parse(_))));
    }
}
