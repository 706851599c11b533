//! Core types shared by the form model and the directory client

use std::collections::BTreeMap;

pub mod capability;
pub mod catalog;
pub mod draft;

pub use capability::{is_sentinel, Capability, NONE_PROVIDER, NO_PROVIDERS};
pub use catalog::{
    AgentConfig, AgentSummary, Extension, ExtensionCatalog, ExtensionCommand, ModeCatalog,
    ProviderCatalog, ProviderSettingsSchema,
};
pub use draft::{Action, AgentDraft, ChatMode, ExtensionSelection, ModeTarget};

/// Flat `key -> value` agent settings
pub type SettingsMap = BTreeMap<String, String>;

/// Command friendly name -> enabled
pub type CommandsMap = BTreeMap<String, bool>;

/// Argument that carries the chat message itself
pub const USER_INPUT_ARG: &str = "user_input";

/// Settings key of the helper agent
pub const HELPER_AGENT_KEY: &str = "helper_agent_name";

/// Settings key of the chat mode
pub const MODE_KEY: &str = "mode";
