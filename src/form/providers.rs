//! Provider selection cascade
//!
//! Each capability gets one dropdown. The selected provider decides which
//! settings schema is merged into the draft; placeholder selections
//! ("None", "No providers") carry no schema at all.

use std::collections::HashMap;

use crate::domain::{
    is_sentinel, Capability, ProviderCatalog, ProviderSettingsSchema, SettingsMap, NONE_PROVIDER,
};

/// One provider dropdown as the view should render it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderField {
    pub capability: Capability,
    pub selected: String,
    pub options: Vec<String>,
    /// Settings schema of the selected provider, `None` for placeholders
    pub schema: Option<ProviderSettingsSchema>,
}

impl ProviderField {
    pub fn has_real_selection(&self) -> bool {
        !is_sentinel(&self.selected)
    }
}

/// Pick the provider for one capability: saved value, else first catalog
/// entry, else the capability's placeholder.
pub fn select_provider(
    capability: Capability,
    agent_settings: &SettingsMap,
    catalog: &ProviderCatalog,
) -> String {
    if let Some(saved) = agent_settings.get(capability.settings_key()) {
        if !saved.is_empty() {
            return saved.clone();
        }
    }
    catalog
        .providers(capability)
        .first()
        .cloned()
        .unwrap_or_else(|| capability.sentinel().to_string())
}

/// Dropdown options for a capability
pub fn provider_options(capability: Capability, catalog: &ProviderCatalog) -> Vec<String> {
    let providers = catalog.providers(capability);
    let mut options = Vec::with_capacity(providers.len() + 1);
    if capability.is_optional() {
        options.push(NONE_PROVIDER.to_string());
    }
    options.extend(providers.iter().filter(|p| !is_sentinel(p)).cloned());
    if options.is_empty() {
        options.push(capability.sentinel().to_string());
    }
    options
}

/// Compute the provider fields in fixed capability order.
///
/// `schemas` holds whatever schemas the caller managed to fetch, keyed by
/// provider name. A missing schema for a real provider renders as an empty
/// schema; placeholder selections never carry one.
pub fn derive_visible_provider_fields(
    agent_settings: &SettingsMap,
    catalog: &ProviderCatalog,
    schemas: &HashMap<String, ProviderSettingsSchema>,
) -> Vec<ProviderField> {
    Capability::ALL
        .iter()
        .map(|&capability| {
            let selected = select_provider(capability, agent_settings, catalog);
            let schema = if is_sentinel(&selected) {
                None
            } else {
                Some(schemas.get(&selected).cloned().unwrap_or_default())
            };
            let mut options = provider_options(capability, catalog);
            if !options.contains(&selected) {
                // Saved provider no longer listed; keep it selectable
                options.push(selected.clone());
            }
            ProviderField {
                capability,
                selected,
                options,
                schema,
            }
        })
        .collect()
}

/// Accretive merge: every existing key survives, schema keys that are
/// missing are added with their defaults.
pub fn merge_provider_settings(
    existing: &SettingsMap,
    schema: &ProviderSettingsSchema,
) -> SettingsMap {
    let mut merged = existing.clone();
    for (key, default) in schema {
        merged
            .entry(key.clone())
            .or_insert_with(|| default.clone());
    }
    merged
}
