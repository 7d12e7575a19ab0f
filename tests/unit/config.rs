use request_bot::config::{apply_env_overrides, expand_tilde, resolve_database_url, Config};
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let cfg = Config::default();
    assert_eq!(cfg.server.host, "0.0.0.0");
    assert_eq!(cfg.server.port, 8092);
    assert!(cfg.slack.signing_secret.is_none());
    assert!(cfg.slack.bot_token.is_none());
    assert_eq!(cfg.slack.post_message_url, "https://slack.com/api/chat.postMessage");
}

#[test]
fn test_default_queue_config() {
    let cfg = Config::default();
    assert_eq!(cfg.queue.personal_queue_name, "My Personal Queue");
    assert_eq!(cfg.queue.max_custom_name_length, 256);
    assert!(cfg.queue.default_queues.is_empty());
}

#[test]
fn test_default_database_config() {
    let cfg = Config::default();
    assert!(cfg.database.url.is_none());
    assert_eq!(cfg.database.sqlite_path, "~/.request-bot/state.sqlite");
    assert_eq!(cfg.database.max_connections, 10);
}

#[test]
fn test_partial_json_keeps_defaults() {
    let raw = r#"{
        "slack": {"signing_secret": "shh", "max_request_age_secs": 300},
        "queue": {"default_queues": ["Bugs", "Access"]}
    }"#;
    let cfg: Config = serde_json::from_str(raw).unwrap();
    assert_eq!(cfg.slack.signing_secret.as_deref(), Some("shh"));
    assert_eq!(cfg.slack.max_request_age_secs, Some(300));
    assert_eq!(cfg.slack.signature_header, "x-slack-signature");
    assert_eq!(cfg.queue.default_queues, vec!["Bugs", "Access"]);
    assert_eq!(cfg.queue.personal_queue_name, "My Personal Queue");
    assert_eq!(cfg.server.port, 8092);
}

#[test]
fn test_env_overrides() {
    std::env::set_var("SLACK_SIGNING_SECRET", "from-env");
    std::env::set_var("REQUEST_BOT_PORT", "9100");
    std::env::set_var("SLACK_BOT_USER_TOKEN", "   ");

    let mut cfg = Config::default();
    apply_env_overrides(&mut cfg);

    std::env::remove_var("SLACK_SIGNING_SECRET");
    std::env::remove_var("REQUEST_BOT_PORT");
    std::env::remove_var("SLACK_BOT_USER_TOKEN");

    assert_eq!(cfg.slack.signing_secret.as_deref(), Some("from-env"));
    assert_eq!(cfg.server.port, 9100);
    assert!(cfg.slack.bot_token.is_none());
}

#[test]
fn test_expand_tilde_leaves_relative_paths() {
    assert_eq!(expand_tilde("state.sqlite"), PathBuf::from("state.sqlite"));
}

#[test]
fn test_resolve_database_url_prefers_explicit_url() {
    let mut cfg = Config::default();
    cfg.database.url = Some("postgres://bot@localhost/requests".to_string());
    assert_eq!(resolve_database_url(&cfg), "postgres://bot@localhost/requests");
}
