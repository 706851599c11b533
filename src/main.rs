use agent_console::adapters::{DirectoryClient, HttpDirectoryClient, InMemoryDirectory};
use agent_console::cli::Cli;
use agent_console::commands;
use agent_console::config::Settings;
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration (CLI > env vars > config file)
    let settings = Settings::new_with_cli(&cli)?;

    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_max_level(settings.log_level())
        .with_writer(std::io::stderr)
        .init();

    let client: Arc<dyn DirectoryClient> = if cli.offline {
        info!("Using the built-in offline directory");
        Arc::new(InMemoryDirectory::seeded().await)
    } else {
        let client = HttpDirectoryClient::new(&settings.server)?;
        debug!("Using agent directory at {}", client.base_url());
        Arc::new(client)
    };

    commands::run(cli.command, client, &settings).await
}
