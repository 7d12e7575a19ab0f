use request_bot::blocks::{Document, ResponseType};
use request_bot::channels::slack::{post_message_body, Messenger, SlackMessenger};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn messenger(server: &MockServer) -> SlackMessenger {
    SlackMessenger::new(
        reqwest::Client::new(),
        "xoxb-test",
        format!("{}/api/chat.postMessage", server.uri()),
    )
}

#[test]
fn test_post_message_body_adds_routing_fields() {
    let doc = Document::from_text("hi");
    assert_eq!(
        post_message_body("xoxb", "U1", &doc),
        json!({"text": "hi", "blocks": [], "token": "xoxb", "channel": "U1"})
    );
}

#[tokio::test]
async fn test_respond_posts_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/actions/1"))
        .and(body_partial_json(json!({"delete_original": true, "blocks": []})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/actions/1", server.uri());
    messenger(&server)
        .respond(&url, &Document::new().delete_original(true))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_respond_surfaces_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("expired_url"))
        .mount(&server)
        .await;

    let url = format!("{}/actions/gone", server.uri());
    let err = messenger(&server)
        .respond(&url, &Document::from_text("late"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_post_message_uses_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat.postMessage"))
        .and(header("authorization", "Bearer xoxb-test"))
        .and(body_partial_json(json!({"channel": "U42", "text": "ping"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let doc = Document::from_text("ping").response_type(ResponseType::Ephemeral);
    messenger(&server).post_message("U42", &doc).await.unwrap();
}

#[tokio::test]
async fn test_post_message_not_ok_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": false,
            "error": "channel_not_found"
        })))
        .mount(&server)
        .await;

    let err = messenger(&server)
        .post_message("U404", &Document::from_text("x"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("channel_not_found"));
}
