//! # agent-console
//!
//! Console for configuring agents of a remote agent-orchestration API.
//!
//! The interesting part is the form model: provider selection cascades per
//! capability, extension toggles that own conditional settings, and chat
//! modes whose argument set depends on the selected prompt, chain or
//! command. A view (the bundled CLI, or any GUI) attaches to a
//! [`form::FormSession`], renders its snapshots and reports edits back.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agent_console::adapters::HttpDirectoryClient;
//! use agent_console::config::Settings;
//! use agent_console::domain::Action;
//! use agent_console::form::{FormSession, SessionOptions};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::new()?;
//!     let client = Arc::new(HttpDirectoryClient::new(&settings.server)?);
//!
//!     let mut session =
//!         FormSession::open(client, Action::Create, "bot1", SessionOptions::default()).await;
//!     let status = session.submit().await?;
//!     println!("{}", status.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: catalogs, drafts and the settings maps they serialize to
//! - **Form**: pure derivation functions plus the session that drives them
//! - **Adapters**: directory clients (HTTP and in-memory)
//! - **Config**: layered configuration (file, environment, CLI)

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod form;
pub mod view;
