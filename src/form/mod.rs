//! Dynamic, dependent-field form model for agent configuration
//!
//! The pure functions in the submodules derive what the form shows from
//! catalogs plus the current selections. `FormSession` owns one draft,
//! feeds it through those functions on every edit and publishes immutable
//! snapshots for whatever view is attached.
//!
//! ## Layout
//!
//! - `providers` - provider cascade and accretive settings merge
//! - `extensions` - extension toggles and their settings sub-maps
//! - `chat_mode` - mode targets and mode-specific arguments
//! - `submission` - validation and serialization of the draft
//! - `edit` - field edits addressed by stable identifiers
//! - `session` - catalogs, draft, observers and submission flow

pub mod chat_mode;
pub mod edit;
pub mod extensions;
pub mod providers;
pub mod session;
pub mod submission;

pub use chat_mode::{derive_chat_mode_args, resolve_mode_target, saved_chat_mode};
pub use edit::FieldEdit;
pub use extensions::{
    derive_extension_fields, enabled_commands, selection_from_config, toggle_extension,
    ExtensionField,
};
pub use providers::{
    derive_visible_provider_fields, merge_provider_settings, provider_options, select_provider,
    ProviderField,
};
pub use session::{
    FormSession, FormSnapshot, ModeField, PendingSubmission, SessionOptions, StatusMessage,
};
pub use submission::{serialize_submission, validate_draft, Submission};
