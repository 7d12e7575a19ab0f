use request_bot::interaction::InteractionPayload;
use request_bot::types::RequestAction;
use serde_json::{json, Value};

fn payload(actions: Value, values: Value) -> InteractionPayload {
    let raw = json!({
        "type": "block_actions",
        "user": {"id": "U1", "username": "ada", "team_id": "T1"},
        "channel": {"id": "C1", "name": "general"},
        "container": {"type": "message", "message_ts": "1.2"},
        "response_url": "https://hooks.slack.test/actions/1",
        "actions": actions,
        "state": {"values": values}
    });
    InteractionPayload::from_json(&raw.to_string()).unwrap()
}

#[test]
fn test_basic_accessors() {
    let p = payload(json!([]), json!({}));
    assert_eq!(p.user_id(), "U1");
    assert_eq!(p.user_name(), Some("ada"));
    assert_eq!(p.channel_id(), Some("C1"));
    assert_eq!(p.response_url(), "https://hooks.slack.test/actions/1");
    assert_eq!(p.primary_action_id(), None);
}

#[test]
fn test_first_action_wins() {
    let p = payload(
        json!([
            {"action_id": "delete-queue", "block_id": "b1", "type": "button", "value": "{}"},
            {"action_id": "cancel-interaction", "block_id": "b2", "type": "button"}
        ]),
        json!({}),
    );
    assert_eq!(p.primary_action_id(), Some("delete-queue"));
}

#[test]
fn test_action_by_id() {
    let p = payload(
        json!([{"action_id": "add-request", "type": "button", "value": "v"}]),
        json!({}),
    );
    assert_eq!(p.action_by_id("add-request").unwrap().value.as_deref(), Some("v"));
    assert!(p.action_by_id("view-requests").is_none());
}

#[test]
fn test_block_state_values() {
    let p = payload(
        json!([]),
        json!({
            "default-queue-input": {
                "default-queue-selection": {
                    "type": "radio_buttons",
                    "selected_option": {
                        "text": {"type": "plain_text", "text": "Bugs"},
                        "value": "Bugs"
                    }
                }
            },
            "custom-queue-input": {
                "custom-queue-input": {"type": "plain_text_input", "value": "Design"}
            },
            "empty-radio": {"pick": {"type": "radio_buttons", "selected_option": null}},
            "empty-text": {"field": {"type": "plain_text_input", "value": null}},
            "picker": {"date": {"type": "datepicker", "selected_date": "2024-01-01"}}
        }),
    );
    assert_eq!(p.block_state_value("default-queue-input", "default-queue-selection"), "Bugs");
    assert_eq!(p.block_state_value("custom-queue-input", "custom-queue-input"), "Design");
    assert_eq!(p.block_state_value("empty-radio", "pick"), "");
    assert_eq!(p.block_state_value("empty-text", "field"), "");
    assert_eq!(p.block_state_value("picker", "date"), "");
    assert_eq!(p.block_state_value("missing", "missing"), "");
    assert_eq!(p.block_state_value("default-queue-input", "missing"), "");
}

#[test]
fn test_payload_without_channel_or_state() {
    let raw = json!({
        "user": {"id": "U9", "name": "grace"},
        "actions": [{"action_id": "cancel-interaction"}],
        "response_url": "https://hooks.slack.test/x"
    });
    let p = InteractionPayload::from_json(&raw.to_string()).unwrap();
    assert_eq!(p.channel_id(), None);
    assert_eq!(p.user_name(), Some("grace"));
    assert_eq!(p.primary_action_id(), Some("cancel-interaction"));
    assert_eq!(p.block_state_value("a", "b"), "");
}

#[test]
fn test_malformed_payload_is_an_error() {
    assert!(InteractionPayload::from_json("{not json").is_err());
    assert!(InteractionPayload::from_json(r#"{"user": {"id": "U1"}}"#).is_err());
}

#[test]
fn test_request_action_value_without_description() {
    let action: RequestAction =
        serde_json::from_str(r#"{"requestId":"r1","userId":"U2","requestOwner":"U7"}"#).unwrap();
    assert_eq!(action.request_id, "r1");
    assert_eq!(action.request_owner, "U7");
    assert!(action.request_description.is_empty());

    let bare: RequestAction =
        serde_json::from_str(r#"{"requestId":"r1","requestOwner":"U7"}"#).unwrap();
    assert!(bare.user_id.is_empty());
    assert!(serde_json::from_str::<RequestAction>(r#"{"requestOwner":"U7"}"#).is_err());
}
