//! Plain-text view over form snapshots
//!
//! The console renders the visible field set as text and accepts edits as
//! `field=value` assignments:
//!
//! | assignment | edit |
//! |---|---|
//! | `name=bot2` | agent name |
//! | `provider.language=openai` | provider of a capability |
//! | `setting.AI_MODEL=gpt-4o` | provider setting |
//! | `extension.web=on` / `off` | extension toggle |
//! | `extension.web.api_key=...` | extension setting |
//! | `helper=AGiXT` | helper agent (empty clears it) |
//! | `mode=chain` | chat mode |
//! | `category=Default` | prompt category |
//! | `target=Smart Chat` | prompt / chain / command name |
//! | `arg.topic=rust` | chat-mode argument |

use std::fmt::Write;

use crate::domain::is_sentinel;
use crate::form::{FieldEdit, FormSnapshot};

/// An assignment parsed from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedEdit {
    Edit(FieldEdit),
    /// Extension toggles are idempotent on the command line
    SetExtension { name: String, enabled: bool },
}

/// Parse one `field=value` assignment
pub fn parse_edit(assignment: &str) -> Result<ParsedEdit, String> {
    let (field, value) = assignment
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", assignment))?;
    let field = field.trim();
    let value = value.to_string();

    let edit = match field.split_once('.') {
        None => match field {
            "name" => FieldEdit::AgentName(value),
            "helper" => FieldEdit::HelperAgent(Some(value).filter(|v| !v.is_empty())),
            "mode" => FieldEdit::ChatMode(value.parse()?),
            "category" => FieldEdit::PromptCategory(value),
            "target" => FieldEdit::ModeTarget(value),
            other => return Err(format!("unknown field '{}'", other)),
        },
        Some(("provider", capability)) => FieldEdit::Provider {
            capability: capability.parse()?,
            provider: value,
        },
        Some(("setting", key)) => FieldEdit::ProviderSetting {
            key: key.to_string(),
            value,
        },
        Some(("arg", key)) => FieldEdit::ModeArg {
            key: key.to_string(),
            value,
        },
        Some(("extension", rest)) => match rest.split_once('.') {
            Some((extension, key)) => FieldEdit::ExtensionSetting {
                extension: extension.to_string(),
                key: key.to_string(),
                value,
            },
            None => {
                let enabled = match value.to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" | "1" => true,
                    "off" | "false" | "no" | "0" => false,
                    other => return Err(format!("expected on/off for extension, got '{}'", other)),
                };
                return Ok(ParsedEdit::SetExtension {
                    name: rest.to_string(),
                    enabled,
                });
            }
        },
        Some((prefix, _)) => return Err(format!("unknown field group '{}'", prefix)),
    };
    Ok(ParsedEdit::Edit(edit))
}

/// Hide anything that looks like a credential
fn display_value(key: &str, value: &str) -> String {
    let upper = key.to_ascii_uppercase();
    let secret = upper.contains("KEY") || upper.contains("TOKEN") || upper.contains("PASSWORD");
    if secret && !value.is_empty() {
        "********".to_string()
    } else {
        value.to_string()
    }
}

/// Render a snapshot as text
pub fn render_form(snapshot: &FormSnapshot) -> String {
    let draft = &snapshot.draft;
    let mut out = String::new();

    let _ = writeln!(out, "Agent: {} ({:?})", draft.agent_name, draft.action);

    let _ = writeln!(out, "\nProviders");
    for field in &snapshot.providers {
        let _ = writeln!(
            out,
            "  {:<14} {:<16} [{}]",
            field.capability.as_str(),
            field.selected,
            field.options.join(", ")
        );
    }

    let _ = writeln!(out, "\nProvider settings");
    if draft.provider_settings.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (key, value) in &draft.provider_settings {
        let _ = writeln!(out, "  {} = {}", key, display_value(key, value));
    }

    let _ = writeln!(out, "\nExtensions");
    if snapshot.extensions.is_empty() {
        let _ = writeln!(out, "  (no extensions available)");
    }
    for ext in &snapshot.extensions {
        let _ = writeln!(
            out,
            "  [{}] {}",
            if ext.enabled { "x" } else { " " },
            ext.label
        );
        if let Some(settings) = &ext.settings {
            for (key, value) in settings {
                let _ = writeln!(out, "        {} = {}", key, display_value(key, value));
            }
        }
    }

    let _ = writeln!(out, "\nHelper agent: {}", draft.helper_agent.as_deref().unwrap_or("-"));

    let mode = &snapshot.mode;
    let _ = writeln!(out, "\nChat mode: {}", mode.mode);
    if !mode.target.name().is_empty() || !mode.options.is_empty() {
        let _ = writeln!(
            out,
            "  target: {} [{}]",
            mode.target.name(),
            mode.options.join(", ")
        );
    }
    for (key, value) in &mode.args {
        let _ = writeln!(out, "  {} = {}", key, value);
    }

    if let Some(status) = &snapshot.status {
        let _ = writeln!(
            out,
            "\n{}{}",
            if status.is_error { "Error: " } else { "" },
            status.text
        );
    }

    if snapshot
        .providers
        .first()
        .map(|f| is_sentinel(&f.selected))
        .unwrap_or(true)
    {
        let _ = writeln!(out, "\nNote: no language provider available");
    }

    out
}
