//! One form session: catalogs, the draft being edited and its observers

use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::chat_mode::{derive_chat_mode_args, resolve_mode_target, saved_chat_mode};
use super::edit::FieldEdit;
use super::extensions::{
    derive_extension_fields, selection_from_config, toggle_extension, ExtensionField,
};
use super::providers::{
    derive_visible_provider_fields, merge_provider_settings, provider_options, select_provider,
    ProviderField,
};
use super::submission::{serialize_submission, validate_draft, Submission};
use crate::adapters::directory::{catalog_or_default, DirectoryClient};
use crate::domain::{
    is_sentinel, Action, AgentConfig, AgentDraft, AgentSummary, Capability, ChatMode,
    ExtensionCatalog, ModeCatalog, ModeTarget, ProviderCatalog, ProviderSettingsSchema,
    SettingsMap, HELPER_AGENT_KEY, MODE_KEY,
};
use crate::error::{DirectoryResult, FormError, FormResult};

/// Settings keys owned by dedicated fields rather than provider settings
const RESERVED_KEYS: [&str; 6] = [
    MODE_KEY,
    HELPER_AGENT_KEY,
    "prompt_category",
    "prompt_name",
    "chain_name",
    "command_name",
];

/// Knobs a view can set when opening a session
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Show the `user_input` argument among chat-mode arguments
    pub include_user_input: bool,
}

/// Message shown to the user after a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Chat-mode selector as the view should render it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeField {
    pub mode: ChatMode,
    pub target: ModeTarget,
    /// Options for the target dropdown of the active mode
    pub options: Vec<String>,
    pub args: SettingsMap,
}

/// Immutable view of the session published after every accepted edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub draft: AgentDraft,
    pub agents: Vec<String>,
    pub providers: Vec<ProviderField>,
    pub extensions: Vec<ExtensionField>,
    pub mode: ModeField,
    pub status: Option<StatusMessage>,
    pub submitting: bool,
}

#[derive(Debug, Clone, Default)]
struct Catalogs {
    agents: Vec<AgentSummary>,
    providers: ProviderCatalog,
    extensions: ExtensionCatalog,
    modes: ModeCatalog,
}

/// A serialized draft waiting to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub action: Action,
    pub agent_name: String,
    pub submission: Submission,
}

impl PendingSubmission {
    /// Issue the create / update / delete call for this submission
    pub async fn send<C>(&self, client: &C) -> DirectoryResult<StatusMessage>
    where
        C: DirectoryClient + ?Sized,
    {
        let name = self.agent_name.as_str();
        let ack = match self.action {
            Action::Create => {
                client
                    .create_agent(name, &self.submission.settings, &self.submission.commands)
                    .await?
            }
            Action::Modify => {
                client
                    .update_agent_settings(name, &self.submission.settings)
                    .await?;
                client
                    .update_agent_commands(name, &self.submission.commands)
                    .await?
            }
            Action::Delete => client.delete_agent(name).await?,
        };

        let text = if ack.message.is_empty() {
            match self.action {
                Action::Create => format!("Agent {} created.", name),
                Action::Modify => format!("Agent {} updated.", name),
                Action::Delete => format!("Agent {} deleted.", name),
            }
        } else {
            ack.message
        };
        Ok(StatusMessage::ok(text))
    }
}

/// Form session bound to one directory client
pub struct FormSession<C: DirectoryClient + ?Sized> {
    id: Uuid,
    client: Arc<C>,
    options: SessionOptions,
    catalogs: Catalogs,
    /// Settings of the agent as stored remotely (empty unless modifying)
    saved: SettingsMap,
    schemas: HashMap<String, ProviderSettingsSchema>,
    draft: AgentDraft,
    status: Option<StatusMessage>,
    /// Set when the stored agent could not be read; blocks submission
    load_error: Option<String>,
    in_flight: bool,
    observers: watch::Sender<FormSnapshot>,
}

impl<C: DirectoryClient + ?Sized> FormSession<C> {
    /// Open a session: load catalogs, the existing agent for `Modify`, and
    /// derive the initial draft. Catalog failures leave empty catalogs behind.
    /// A `Modify` session whose agent cannot be read stays open for viewing
    /// but refuses to submit.
    pub async fn open(
        client: Arc<C>,
        action: Action,
        agent_name: impl Into<String>,
        options: SessionOptions,
    ) -> Self {
        let agent_name = agent_name.into();
        let id = Uuid::new_v4();
        debug!("Opening form session {} for {:?} {}", id, action, agent_name);

        let provider_lists = join_all(Capability::ALL.iter().map(|&capability| {
            let client = client.clone();
            async move {
                let providers = catalog_or_default(
                    &format!("{} providers", capability),
                    client.list_providers_by_capability(capability),
                )
                .await;
                (capability, providers)
            }
        }));

        let (provider_lists, agents, extensions, categories, chains) = futures::join!(
            provider_lists,
            catalog_or_default("agents", client.list_agents()),
            catalog_or_default("extensions", client.list_extensions()),
            catalog_or_default("prompt categories", client.list_prompt_categories()),
            catalog_or_default("chains", client.list_chains()),
        );

        let (config, load_error) = if action == Action::Modify {
            match client.get_agent_config(&agent_name).await {
                Ok(config) => (config, None),
                Err(e) => {
                    warn!("Failed to load agent {}: {}", agent_name, e);
                    (AgentConfig::default(), Some(e.to_string()))
                }
            }
        } else {
            (AgentConfig::default(), None)
        };

        let mut providers = ProviderCatalog::new();
        for (capability, list) in provider_lists {
            providers.insert(capability, list);
        }

        let modes = ModeCatalog {
            commands: extensions.command_names(),
            prompt_categories: categories,
            prompts: Vec::new(),
            chains,
        };

        let mut draft = AgentDraft::new(action, agent_name);
        draft.extension_selection = selection_from_config(&extensions, &config);
        draft.helper_agent = config.settings.get(HELPER_AGENT_KEY).cloned();

        let catalogs = Catalogs {
            agents,
            providers,
            extensions,
            modes,
        };

        let (observers, _) = watch::channel(FormSnapshot {
            draft: draft.clone(),
            agents: Vec::new(),
            providers: Vec::new(),
            extensions: Vec::new(),
            mode: ModeField {
                mode: ChatMode::Default,
                target: ModeTarget::Default,
                options: Vec::new(),
                args: SettingsMap::new(),
            },
            status: None,
            submitting: false,
        });

        let mut session = Self {
            id,
            client,
            options,
            catalogs,
            saved: config.settings,
            schemas: HashMap::new(),
            status: load_error.as_ref().map(|e| {
                StatusMessage::error(format!("Failed to load agent {}: {}", draft.agent_name, e))
            }),
            draft,
            load_error,
            in_flight: false,
            observers,
        };

        session.init_providers().await;
        session.init_chat_mode().await;
        session.release_owned_keys();
        session.publish();
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn draft(&self) -> &AgentDraft {
        &self.draft
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Receive a new snapshot after every accepted edit
    pub fn subscribe(&self) -> watch::Receiver<FormSnapshot> {
        self.observers.subscribe()
    }

    /// Current snapshot, derived fresh from the draft
    pub fn snapshot(&self) -> FormSnapshot {
        let selection_settings: SettingsMap = self
            .draft
            .provider_selections
            .iter()
            .map(|(cap, provider)| (cap.settings_key().to_string(), provider.clone()))
            .collect();

        FormSnapshot {
            draft: self.draft.clone(),
            agents: self.catalogs.agents.iter().map(|a| a.name.clone()).collect(),
            providers: derive_visible_provider_fields(
                &selection_settings,
                &self.catalogs.providers,
                &self.schemas,
            ),
            extensions: derive_extension_fields(
                &self.catalogs.extensions,
                &self.draft.extension_selection,
            ),
            mode: ModeField {
                mode: self.draft.chat_mode(),
                target: self.draft.mode_target.clone(),
                options: self.mode_options(self.draft.chat_mode()),
                args: self.draft.mode_args.clone(),
            },
            status: self.status.clone(),
            submitting: self.in_flight,
        }
    }

    fn publish(&self) {
        self.observers.send_replace(self.snapshot());
    }

    fn mode_options(&self, mode: ChatMode) -> Vec<String> {
        let modes = &self.catalogs.modes;
        match mode {
            ChatMode::Default => Vec::new(),
            ChatMode::Prompt => modes.prompts.clone(),
            ChatMode::Chain => modes.chains.clone(),
            ChatMode::Command => modes.commands.clone(),
        }
    }

    async fn init_providers(&mut self) {
        self.draft.provider_settings = self
            .saved
            .iter()
            .filter(|(key, _)| !is_reserved_key(key))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        for capability in Capability::ALL {
            let provider = select_provider(capability, &self.saved, &self.catalogs.providers);
            self.set_provider(capability, provider).await;
        }
    }

    /// Saved mode arguments and extension settings belong to their own
    /// fields; they stay in provider settings only when a loaded schema
    /// declares them too.
    fn release_owned_keys(&mut self) {
        let schema_keys: HashSet<&String> =
            self.schemas.values().flat_map(|s| s.keys()).collect();
        let owned: Vec<String> = self
            .draft
            .mode_args
            .keys()
            .chain(self.catalogs.extensions.iter().flat_map(|e| e.settings.iter()))
            .filter(|key| !schema_keys.contains(key))
            .cloned()
            .collect();
        for key in owned {
            self.draft.provider_settings.remove(&key);
        }
    }

    async fn set_provider(&mut self, capability: Capability, provider: String) {
        if !is_sentinel(&provider) {
            let schema = self.schema_for(&provider).await;
            self.draft.provider_settings =
                merge_provider_settings(&self.draft.provider_settings, &schema);
        }
        self.draft.provider_selections.insert(capability, provider);
    }

    async fn schema_for(&mut self, provider: &str) -> ProviderSettingsSchema {
        if let Some(schema) = self.schemas.get(provider) {
            return schema.clone();
        }
        let schema = catalog_or_default(
            &format!("settings of provider {}", provider),
            self.client.get_provider_settings_schema(provider),
        )
        .await;
        self.schemas.insert(provider.to_string(), schema.clone());
        schema
    }

    async fn init_chat_mode(&mut self) {
        let mode = saved_chat_mode(&self.saved);
        self.switch_mode(mode).await;
    }

    async fn switch_mode(&mut self, mode: ChatMode) {
        if mode == ChatMode::Prompt {
            let category = self
                .saved
                .get("prompt_category")
                .filter(|c| !c.is_empty())
                .cloned()
                .or_else(|| self.catalogs.modes.prompt_categories.first().cloned())
                .unwrap_or_default();
            self.load_prompts(&category).await;
        }
        let target = resolve_mode_target(mode, &self.saved, &self.catalogs.modes);
        self.set_target(target).await;
    }

    async fn load_prompts(&mut self, category: &str) {
        self.catalogs.modes.prompts = if category.is_empty() {
            Vec::new()
        } else {
            catalog_or_default(
                &format!("prompts in {}", category),
                self.client.list_prompts(category),
            )
            .await
        };
    }

    async fn set_target(&mut self, target: ModeTarget) {
        let arg_names = self.argument_names(&target).await;
        self.draft.mode_args = derive_chat_mode_args(
            &target,
            &self.saved,
            self.options.include_user_input,
            |_| arg_names,
        );
        self.draft.mode_target = target;
    }

    async fn argument_names(&self, target: &ModeTarget) -> Vec<String> {
        if target.name().is_empty() {
            return Vec::new();
        }
        let client = &self.client;
        match target {
            ModeTarget::Default => Vec::new(),
            ModeTarget::Prompt { category, name } => {
                catalog_or_default(
                    &format!("arguments of prompt {}", name),
                    client.get_prompt_args(name, category),
                )
                .await
            }
            ModeTarget::Chain { name } => {
                catalog_or_default(
                    &format!("arguments of chain {}", name),
                    client.get_chain_args(name),
                )
                .await
            }
            ModeTarget::Command { name } => catalog_or_default(
                &format!("arguments of command {}", name),
                client.get_command_args(name),
            )
            .await
            .into_keys()
            .collect(),
        }
    }

    /// Apply one field edit and publish the resulting snapshot
    pub async fn apply(&mut self, edit: FieldEdit) -> FormResult<()> {
        debug!("Session {} edit {}", self.id, edit.field_id());
        match edit {
            FieldEdit::AgentName(name) => {
                if self.draft.action != Action::Create {
                    return Err(FormError::InvalidEdit(
                        "an existing agent cannot be renamed".to_string(),
                    ));
                }
                self.draft.agent_name = name;
            }
            FieldEdit::Provider {
                capability,
                provider,
            } => {
                let options = provider_options(capability, &self.catalogs.providers);
                let current = self.draft.selected_provider(capability).unwrap_or_default();
                if !options.contains(&provider) && provider != current {
                    return Err(FormError::InvalidEdit(format!(
                        "{} is not a {} provider",
                        provider, capability
                    )));
                }
                self.set_provider(capability, provider).await;
            }
            FieldEdit::ProviderSetting { key, value } => {
                self.draft.provider_settings.insert(key, value);
            }
            FieldEdit::ToggleExtension(name) => {
                let extension = self
                    .catalogs
                    .extensions
                    .get(&name)
                    .ok_or_else(|| FormError::UnknownExtension(name.clone()))?;
                self.draft.extension_selection =
                    toggle_extension(&self.draft.extension_selection, extension);
            }
            FieldEdit::ExtensionSetting {
                extension,
                key,
                value,
            } => {
                let declared = self
                    .catalogs
                    .extensions
                    .get(&extension)
                    .ok_or_else(|| FormError::UnknownExtension(extension.clone()))?
                    .settings
                    .contains(&key);
                if !declared {
                    return Err(FormError::InvalidEdit(format!(
                        "{} has no setting {}",
                        extension, key
                    )));
                }
                let settings = self
                    .draft
                    .extension_selection
                    .settings_mut(&extension)
                    .ok_or_else(|| FormError::ExtensionDisabled(extension.clone()))?;
                settings.insert(key, value);
            }
            FieldEdit::HelperAgent(helper) => {
                self.draft.helper_agent = helper.filter(|h| !h.is_empty());
            }
            FieldEdit::ChatMode(mode) => self.switch_mode(mode).await,
            FieldEdit::PromptCategory(category) => {
                if self.draft.chat_mode() != ChatMode::Prompt {
                    return Err(FormError::InvalidEdit(
                        "prompt category only applies in prompt mode".to_string(),
                    ));
                }
                self.load_prompts(&category).await;
                let name = self
                    .catalogs
                    .modes
                    .prompts
                    .first()
                    .cloned()
                    .unwrap_or_default();
                self.set_target(ModeTarget::Prompt { category, name }).await;
            }
            FieldEdit::ModeTarget(name) => {
                let target = match &self.draft.mode_target {
                    ModeTarget::Default => {
                        return Err(FormError::InvalidEdit(
                            "the default chat mode has no target".to_string(),
                        ))
                    }
                    ModeTarget::Prompt { category, .. } => ModeTarget::Prompt {
                        category: category.clone(),
                        name,
                    },
                    ModeTarget::Chain { .. } => ModeTarget::Chain { name },
                    ModeTarget::Command { .. } => ModeTarget::Command { name },
                };
                self.set_target(target).await;
            }
            FieldEdit::ModeArg { key, value } => {
                let arg = self.draft.mode_args.get_mut(&key).ok_or_else(|| {
                    FormError::InvalidEdit(format!(
                        "{} is not an argument of {}",
                        key,
                        self.draft.mode_target.name()
                    ))
                })?;
                *arg = value;
            }
        }
        self.publish();
        Ok(())
    }

    /// Validate and serialize the draft, marking the session as in flight.
    /// Fails while a previous submission has not been finished.
    pub fn begin_submit(&mut self) -> FormResult<PendingSubmission> {
        if self.in_flight {
            return Err(FormError::SubmissionInFlight);
        }
        if let Some(reason) = &self.load_error {
            return Err(FormError::AgentUnavailable {
                agent: self.draft.agent_name.clone(),
                reason: reason.clone(),
            });
        }
        validate_draft(&self.draft).map_err(FormError::Validation)?;

        let pending = PendingSubmission {
            action: self.draft.action,
            agent_name: self.draft.agent_name.trim().to_string(),
            submission: serialize_submission(&self.draft, &self.catalogs.extensions),
        };
        self.in_flight = true;
        self.publish();
        Ok(pending)
    }

    /// Record the outcome of a submission. Failures become an error message;
    /// the draft is left untouched either way.
    pub fn finish_submit(&mut self, result: DirectoryResult<StatusMessage>) -> StatusMessage {
        self.in_flight = false;
        let status = match result {
            Ok(status) => {
                info!("Session {}: {}", self.id, status.text);
                status
            }
            Err(e) => {
                warn!("Session {} submission failed: {}", self.id, e);
                StatusMessage::error(format!("Submission failed: {}", e))
            }
        };
        self.status = Some(status.clone());
        self.publish();
        status
    }

    /// Validate, send and record in one go
    pub async fn submit(&mut self) -> FormResult<StatusMessage> {
        let pending = self.begin_submit()?;
        let client = self.client.clone();
        let result = pending.send(client.as_ref()).await;
        Ok(self.finish_submit(result))
    }
}

fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key) || Capability::ALL.iter().any(|c| c.settings_key() == key)
}
