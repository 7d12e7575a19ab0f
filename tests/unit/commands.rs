use request_bot::commands::{SlashCommand, SlashCommandForm};
use request_bot::ids::ActionId;

#[test]
fn test_parse_action_and_args() {
    let cmd = SlashCommand::parse("list");
    assert_eq!(cmd.action, "list");
    assert_eq!(cmd.args, "");

    let cmd = SlashCommand::parse("create-queue\tfor design");
    assert_eq!(cmd.action, "create-queue");
    assert_eq!(cmd.args, "for design");
}

#[test]
fn test_parse_empty_text() {
    let cmd = SlashCommand::parse("   ");
    assert_eq!(cmd.action, "");
    assert_eq!(cmd.args, "");
}

#[test]
fn test_form_requires_core_fields() {
    let full = serde_json::json!({
        "command": "/requests",
        "text": "list",
        "user_id": "U1",
        "user_name": "ada",
        "channel_id": "C1",
        "team_id": "T1",
        "response_url": "https://hooks.slack.test/commands/1",
        "trigger_id": "13.45"
    });
    let form: SlashCommandForm = serde_json::from_value(full.clone()).unwrap();
    assert_eq!(form.user_id, "U1");
    assert!(form.api_app_id.is_none());

    let mut missing = full;
    missing.as_object_mut().unwrap().remove("channel_id");
    assert!(serde_json::from_value::<SlashCommandForm>(missing).is_err());
}

#[test]
fn test_action_ids_roundtrip() {
    assert_eq!(ActionId::parse("submit-new-queue"), Some(ActionId::SubmitNewQueue));
    assert_eq!(ActionId::AcceptRequest.as_str(), "accept-request");
    assert_eq!(ActionId::parse("list"), None);
}
