use agent_console::cli::Cli;
use agent_console::config::Settings;
use clap::Parser;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_config_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("agent-console.toml");

    let toml = r#"
[server]
base_url = "https://agents.example.com"
api_key_env = "AGENT_CONSOLE_TEST_KEY_NOT_SET"
timeout_seconds = 5

[form]
include_user_input = true

[logging]
level = "debug"
"#;
    fs::write(&path, toml)?;

    let settings = Settings::from_file(&path)?;
    assert_eq!(settings.server.base_url, "https://agents.example.com");
    assert_eq!(settings.server.timeout_seconds, 5);
    assert_eq!(settings.server.resolve_api_key(), None);
    assert!(settings.form.include_user_input);
    assert_eq!(settings.log_level(), tracing::Level::DEBUG);

    Ok(())
}

#[test]
fn test_missing_file_uses_defaults() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let settings = Settings::from_file(&temp_dir.path().join("absent.toml"))?;

    assert_eq!(settings.server.base_url, "http://localhost:7437");
    assert_eq!(settings.server.timeout_seconds, 30);
    assert!(!settings.form.include_user_input);
    assert_eq!(settings.logging.level, "info");

    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("agent-console.toml");
    fs::write(
        &path,
        r#"
[server]
base_url = "agents.example.com"
timeout_seconds = 0
"#,
    )?;

    let err = Settings::from_file(&path).unwrap_err().to_string();
    assert!(err.contains("Configuration validation failed"));
    assert!(err.contains("server.base_url"));
    assert!(err.contains("server.timeout_seconds"));

    Ok(())
}

#[test]
fn test_cli_overrides_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("agent-console.toml");
    fs::write(
        &path,
        r#"
[server]
base_url = "http://from-file:7437"
api_key = "file-key"
"#,
    )?;

    let cli = Cli::parse_from([
        "agent-console",
        "--config",
        path.to_str().unwrap(),
        "--base-url",
        "http://from-cli:7437",
        "--log-level",
        "warn",
        "--user-input",
        "extensions",
    ]);
    let settings = Settings::new_with_cli(&cli)?;

    assert_eq!(settings.server.base_url, "http://from-cli:7437");
    assert_eq!(settings.server.resolve_api_key(), Some("file-key".to_string()));
    assert_eq!(settings.log_level(), tracing::Level::WARN);
    assert!(settings.form.include_user_input);

    Ok(())
}
