//! Command handlers behind the CLI

use anyhow::{bail, Context};
use std::sync::Arc;
use tracing::debug;

use crate::adapters::directory::DirectoryClient;
use crate::cli::{AgentCommand, ChainCommand, Command};
use crate::config::Settings;
use crate::domain::{Action, Capability};
use crate::form::{FieldEdit, FormSession, SessionOptions};
use crate::view::{parse_edit, render_form, ParsedEdit};

type Client = Arc<dyn DirectoryClient>;

pub async fn run(command: Command, client: Client, settings: &Settings) -> anyhow::Result<()> {
    let options = SessionOptions {
        include_user_input: settings.form.include_user_input,
    };

    match command {
        Command::Agents { command } => run_agents(command, client, options).await,
        Command::Providers { capability } => list_providers(client, capability).await,
        Command::Extensions => list_extensions(client).await,
        Command::Chains { command } => match command {
            None => {
                for chain in client.list_chains().await? {
                    println!("{}", chain);
                }
                Ok(())
            }
            Some(ChainCommand::Args { name }) => {
                for arg in client.get_chain_args(&name).await? {
                    println!("{}", arg);
                }
                Ok(())
            }
        },
        Command::Prompts { category } => match category {
            None => {
                for category in client.list_prompt_categories().await? {
                    println!("{}", category);
                }
                Ok(())
            }
            Some(category) => {
                for prompt in client.list_prompts(&category).await? {
                    println!("{}", prompt);
                }
                Ok(())
            }
        },
    }
}

async fn run_agents(
    command: AgentCommand,
    client: Client,
    options: SessionOptions,
) -> anyhow::Result<()> {
    match command {
        AgentCommand::List => {
            for agent in client.list_agents().await? {
                println!("{}", agent.name);
            }
            Ok(())
        }
        AgentCommand::Show { name } => {
            let session = FormSession::open(client, Action::Modify, name, options).await;
            print!("{}", render_form(&session.snapshot()));
            Ok(())
        }
        AgentCommand::Create { name, edits } => {
            submit_form(client, Action::Create, name, &edits, options).await
        }
        AgentCommand::Edit { name, edits } => {
            submit_form(client, Action::Modify, name, &edits, options).await
        }
        AgentCommand::Delete { name } => {
            submit_form(client, Action::Delete, name, &[], options).await
        }
    }
}

/// Open a session, apply the edits in order, submit and print the result
pub async fn submit_form(
    client: Client,
    action: Action,
    name: String,
    edits: &[String],
    options: SessionOptions,
) -> anyhow::Result<()> {
    let mut session = FormSession::open(client, action, name, options).await;

    for assignment in edits {
        let parsed = parse_edit(assignment).map_err(|e| anyhow::anyhow!(e))?;
        let edit = match parsed {
            ParsedEdit::Edit(edit) => Some(edit),
            ParsedEdit::SetExtension { name, enabled } => {
                let current = session.draft().extension_selection.is_enabled(&name);
                (current != enabled).then_some(FieldEdit::ToggleExtension(name))
            }
        };
        if let Some(edit) = edit {
            debug!("Applying {}", edit.field_id());
            session
                .apply(edit)
                .await
                .with_context(|| format!("Failed to apply '{}'", assignment))?;
        }
    }

    if action != Action::Delete {
        print!("{}", render_form(&session.snapshot()));
    }

    let status = session.submit().await?;
    if status.is_error {
        bail!(status.text);
    }
    println!("{}", status.text);
    Ok(())
}

async fn list_providers(client: Client, capability: Option<Capability>) -> anyhow::Result<()> {
    let providers = match capability {
        Some(capability) => client.list_providers_by_capability(capability).await?,
        None => client.list_providers().await?,
    };
    for provider in providers {
        println!("{}", provider);
    }
    Ok(())
}

async fn list_extensions(client: Client) -> anyhow::Result<()> {
    let catalog = client.list_extensions().await?;
    for extension in catalog.iter() {
        println!("{} ({})", extension.label(), extension.name);
        for key in &extension.settings {
            println!("    setting: {}", key);
        }
        for command in &extension.commands {
            println!("    command: {}", command.friendly_name);
        }
    }
    Ok(())
}
