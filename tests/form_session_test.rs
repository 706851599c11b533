use agent_console::adapters::{DirectoryClient, InMemoryDirectory};
use agent_console::domain::{Action, Capability, ChatMode, Extension, ModeTarget};
use agent_console::error::FormError;
use agent_console::form::{FieldEdit, FormSession, SessionOptions};
use std::sync::Arc;

async fn directory() -> InMemoryDirectory {
    let directory = InMemoryDirectory::new();
    directory
        .add_providers(Capability::Language, &["openai", "local"])
        .await;
    directory.add_providers(Capability::Vision, &["openai"]).await;
    directory
        .add_schema("openai", &[("AI_MODEL", "gpt-4o"), ("temperature", "0.7")])
        .await;
    directory
        .add_schema("local", &[("LOCAL_URI", "http://localhost:8091"), ("temperature", "0.2")])
        .await;
    directory
        .add_extension(
            Extension::new("web", vec!["api_key".to_string()]).with_command("Search the web"),
        )
        .await;
    directory
        .add_prompt("Default", "Chat", &["user_input", "context"])
        .await;
    directory
        .add_chain("Smart Chat", &["user_input", "temperature", "depth"])
        .await;
    directory
}

async fn open(
    directory: &InMemoryDirectory,
    action: Action,
    name: &str,
) -> FormSession<InMemoryDirectory> {
    FormSession::open(
        Arc::new(directory.clone()),
        action,
        name,
        SessionOptions::default(),
    )
    .await
}

#[tokio::test]
async fn test_create_defaults_to_first_language_provider() {
    let directory = directory().await;
    let session = open(&directory, Action::Create, "bot1").await;

    let snapshot = session.snapshot();
    let language = &snapshot.providers[0];
    assert_eq!(language.capability, Capability::Language);
    assert_eq!(language.selected, "openai");
    assert_eq!(session.draft().provider_settings["AI_MODEL"], "gpt-4o");
    assert_eq!(snapshot.mode.mode, ChatMode::Default);
}

#[tokio::test]
async fn test_catalog_failures_degrade_to_placeholders() {
    let directory = directory().await;
    directory.fail_catalogs(true).await;

    let session = open(&directory, Action::Create, "bot1").await;
    let snapshot = session.snapshot();

    assert_eq!(snapshot.providers.len(), Capability::ALL.len());
    assert_eq!(snapshot.providers[0].selected, "No providers");
    assert!(snapshot.providers.iter().all(|f| f.schema.is_none()));
    assert!(snapshot.extensions.is_empty());
    assert!(snapshot.agents.is_empty());
}

#[tokio::test]
async fn test_modify_with_vision_none_fetches_no_vision_schema() {
    let directory = directory().await;
    directory
        .add_agent("bot1", &[("provider", "local"), ("vision_provider", "None")], &[])
        .await;

    let session = open(&directory, Action::Modify, "bot1").await;
    let snapshot = session.snapshot();

    let vision = snapshot
        .providers
        .iter()
        .find(|f| f.capability == Capability::Vision)
        .unwrap();
    assert_eq!(vision.selected, "None");
    assert!(vision.schema.is_none());

    let schema_calls: Vec<String> = directory
        .calls()
        .await
        .into_iter()
        .filter(|c| c.starts_with("get_provider_settings_schema"))
        .collect();
    assert_eq!(schema_calls, vec!["get_provider_settings_schema:local".to_string()]);
}

#[tokio::test]
async fn test_provider_change_keeps_entered_values() {
    let directory = directory().await;
    let mut session = open(&directory, Action::Create, "bot1").await;

    session
        .apply(FieldEdit::ProviderSetting {
            key: "temperature".into(),
            value: "0.9".into(),
        })
        .await
        .unwrap();
    session
        .apply(FieldEdit::Provider {
            capability: Capability::Language,
            provider: "local".into(),
        })
        .await
        .unwrap();

    let settings = &session.draft().provider_settings;
    assert_eq!(settings["temperature"], "0.9");
    assert_eq!(settings["LOCAL_URI"], "http://localhost:8091");
    assert_eq!(settings["AI_MODEL"], "gpt-4o");
}

#[tokio::test]
async fn test_unknown_provider_is_rejected() {
    let directory = directory().await;
    let mut session = open(&directory, Action::Create, "bot1").await;

    let result = session
        .apply(FieldEdit::Provider {
            capability: Capability::Language,
            provider: "mystery".into(),
        })
        .await;
    assert!(matches!(result, Err(FormError::InvalidEdit(_))));
    assert_eq!(session.draft().selected_provider(Capability::Language), Some("openai"));
}

#[tokio::test]
async fn test_switching_prompt_to_chain_replaces_arguments() {
    let directory = directory().await;
    let mut session = open(&directory, Action::Create, "bot1").await;

    session.apply(FieldEdit::ChatMode(ChatMode::Prompt)).await.unwrap();
    let args = &session.draft().mode_args;
    assert!(args.contains_key("context"));
    assert!(!args.contains_key("user_input"));

    session.apply(FieldEdit::ChatMode(ChatMode::Chain)).await.unwrap();
    let draft = session.draft();
    assert_eq!(draft.mode_target, ModeTarget::Chain { name: "Smart Chat".into() });
    assert!(!draft.mode_args.contains_key("context"));
    assert!(draft.mode_args.contains_key("depth"));
    assert!(draft.mode_args.contains_key("temperature"));
}

#[tokio::test]
async fn test_user_input_argument_when_requested() {
    let directory = directory().await;
    let mut session = FormSession::open(
        Arc::new(directory.clone()),
        Action::Create,
        "bot1",
        SessionOptions {
            include_user_input: true,
        },
    )
    .await;

    session.apply(FieldEdit::ChatMode(ChatMode::Chain)).await.unwrap();
    assert!(session.draft().mode_args.contains_key("user_input"));
}

#[tokio::test]
async fn test_observers_receive_snapshots() {
    let directory = directory().await;
    let mut session = open(&directory, Action::Create, "bot1").await;
    let mut rx = session.subscribe();

    session
        .apply(FieldEdit::ToggleExtension("web".into()))
        .await
        .unwrap();

    assert!(rx.has_changed().unwrap());
    let snapshot = rx.borrow_and_update().clone();
    assert!(snapshot.extensions[0].enabled);
    assert_eq!(snapshot.extensions[0].settings.as_ref().unwrap()["api_key"], "");
}

#[tokio::test]
async fn test_extension_setting_requires_enabled_extension() {
    let directory = directory().await;
    let mut session = open(&directory, Action::Create, "bot1").await;

    let edit = FieldEdit::ExtensionSetting {
        extension: "web".into(),
        key: "api_key".into(),
        value: "secret".into(),
    };
    assert!(matches!(
        session.apply(edit.clone()).await,
        Err(FormError::ExtensionDisabled(_))
    ));

    session
        .apply(FieldEdit::ToggleExtension("web".into()))
        .await
        .unwrap();
    session.apply(edit).await.unwrap();
    assert!(matches!(
        session.apply(FieldEdit::ToggleExtension("nope".into())).await,
        Err(FormError::UnknownExtension(_))
    ));
}

#[tokio::test]
async fn test_create_submission_sends_settings_and_commands() {
    let directory = directory().await;
    let mut session = open(&directory, Action::Create, "bot1").await;

    session
        .apply(FieldEdit::ToggleExtension("web".into()))
        .await
        .unwrap();
    session.apply(FieldEdit::ChatMode(ChatMode::Chain)).await.unwrap();
    session
        .apply(FieldEdit::ModeArg {
            key: "temperature".into(),
            value: "0.1".into(),
        })
        .await
        .unwrap();

    let status = session.submit().await.unwrap();
    assert!(!status.is_error);

    let stored = directory.agent("bot1").await.unwrap();
    assert_eq!(stored.settings["provider"], "openai");
    assert_eq!(stored.settings["mode"], "chain");
    assert_eq!(stored.settings["chain_name"], "Smart Chat");
    assert_eq!(stored.settings["temperature"], "0.1");
    assert_eq!(stored.commands.get("Search the web"), Some(&true));
}

#[tokio::test]
async fn test_modify_prepopulates_and_updates() {
    let directory = directory().await;
    directory
        .add_agent(
            "bot1",
            &[("provider", "local"), ("api_key", "k"), ("mode", "chain"), ("depth", "3")],
            &[("Search the web", true)],
        )
        .await;

    let mut session = open(&directory, Action::Modify, "bot1").await;
    let draft = session.draft();
    assert_eq!(draft.selected_provider(Capability::Language), Some("local"));
    assert!(draft.extension_selection.is_enabled("web"));
    assert_eq!(draft.mode_args["depth"], "3");

    session
        .apply(FieldEdit::ToggleExtension("web".into()))
        .await
        .unwrap();
    session.submit().await.unwrap();

    let stored = directory.agent("bot1").await.unwrap();
    assert!(stored.commands.is_empty());
    assert_eq!(stored.settings["provider"], "local");
    assert!(!stored.settings.contains_key("api_key"));
    let calls = directory.calls().await;
    assert!(calls.contains(&"update_agent_settings:bot1".to_string()));
    assert!(calls.contains(&"update_agent_commands:bot1".to_string()));
}

#[tokio::test]
async fn test_submission_failure_is_reported_and_draft_kept() {
    let directory = directory().await;
    directory.fail_mutations(true).await;
    let mut session = open(&directory, Action::Create, "bot1").await;
    let before = session.draft().clone();

    let status = session.submit().await.unwrap();
    assert!(status.is_error);
    assert!(status.text.contains("Submission failed"));
    assert_eq!(session.draft(), &before);
    assert_eq!(session.status(), Some(&status));
    assert!(!session.is_submitting());
}

#[tokio::test]
async fn test_double_submission_is_rejected() {
    let directory = directory().await;
    let mut session = open(&directory, Action::Create, "bot1").await;

    let pending = session.begin_submit().unwrap();
    assert!(session.is_submitting());
    assert!(matches!(session.begin_submit(), Err(FormError::SubmissionInFlight)));

    let result = pending.send(&directory).await;
    let status = session.finish_submit(result);
    assert!(!status.is_error);
    assert!(directory.list_agents().await.unwrap().iter().any(|a| a.name == "bot1"));
}

#[tokio::test]
async fn test_validation_blocks_submission() {
    let directory = directory().await;
    let mut session = open(&directory, Action::Create, "").await;

    assert!(matches!(session.submit().await, Err(FormError::Validation(_))));
    assert!(!session.is_submitting());
    assert!(directory.agent("").await.is_none());
}

#[tokio::test]
async fn test_delete_removes_agent() {
    let directory = directory().await;
    directory.add_agent("bot1", &[("provider", "openai")], &[]).await;

    let mut session = open(&directory, Action::Delete, "bot1").await;
    let status = session.submit().await.unwrap();
    assert!(!status.is_error);
    assert!(directory.agent("bot1").await.is_none());
}

#[tokio::test]
async fn test_modify_refuses_to_submit_when_agent_unreadable() {
    let directory = directory().await;
    directory
        .add_agent(
            "bot1",
            &[("provider", "local"), ("api_key", "secret"), ("mode", "chain")],
            &[("Search the web", true)],
        )
        .await;
    let before = directory.agent("bot1").await.unwrap();

    directory.fail_catalogs(true).await;
    let mut session = open(&directory, Action::Modify, "bot1").await;
    directory.fail_catalogs(false).await;

    assert!(session.status().unwrap().is_error);
    assert!(matches!(
        session.submit().await,
        Err(FormError::AgentUnavailable { .. })
    ));
    assert!(!session.is_submitting());
    assert_eq!(directory.agent("bot1").await.unwrap(), before);
    assert!(!directory
        .calls()
        .await
        .iter()
        .any(|c| c.starts_with("update_agent")));
}

#[tokio::test]
async fn test_leaving_saved_mode_drops_its_arguments() {
    let directory = directory().await;
    directory
        .add_agent(
            "bot1",
            &[("provider", "local"), ("mode", "chain"), ("depth", "3")],
            &[],
        )
        .await;

    let mut session = open(&directory, Action::Modify, "bot1").await;
    assert_eq!(session.draft().mode_args["depth"], "3");

    session.apply(FieldEdit::ChatMode(ChatMode::Prompt)).await.unwrap();
    session.submit().await.unwrap();

    let stored = directory.agent("bot1").await.unwrap();
    assert_eq!(stored.settings["mode"], "prompt");
    assert_eq!(stored.settings["context"], "");
    assert!(!stored.settings.contains_key("depth"));
}

#[tokio::test]
async fn test_rename_only_allowed_when_creating() {
    let directory = directory().await;
    directory.add_agent("bot1", &[("provider", "openai")], &[]).await;

    let mut session = open(&directory, Action::Modify, "bot1").await;
    assert!(matches!(
        session.apply(FieldEdit::AgentName("bot2".into())).await,
        Err(FormError::InvalidEdit(_))
    ));
    assert_eq!(session.draft().agent_name, "bot1");

    let mut session = open(&directory, Action::Create, "bot1").await;
    session
        .apply(FieldEdit::AgentName("bot2".into()))
        .await
        .unwrap();
    assert_eq!(session.draft().agent_name, "bot2");
}
