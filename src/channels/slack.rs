use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::blocks::Document;
use crate::error::AppError;

/// Outbound side of the bot: replies to a `response_url` and direct posts through the Web API.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn respond(&self, response_url: &str, document: &Document) -> Result<(), AppError>;
    async fn post_message(&self, channel: &str, document: &Document) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct SlackMessenger {
    client: Client,
    bot_token: String,
    post_message_url: String,
}

impl SlackMessenger {
    pub fn new(
        client: Client,
        bot_token: impl Into<String>,
        post_message_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            bot_token: bot_token.into(),
            post_message_url: post_message_url.into(),
        }
    }
}

/// `chat.postMessage` body: the rendered document plus the routing fields.
pub fn post_message_body(token: &str, channel: &str, document: &Document) -> Value {
    let mut payload = document.render();
    payload["token"] = Value::String(token.to_string());
    payload["channel"] = Value::String(channel.to_string());
    payload
}

#[async_trait]
impl Messenger for SlackMessenger {
    async fn respond(&self, response_url: &str, document: &Document) -> Result<(), AppError> {
        let resp = self
            .client
            .post(response_url)
            .json(&document.render())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "response_url rejected reply");
            return Err(AppError::Delivery(format!("response_url returned {status}: {body}")));
        }
        Ok(())
    }

    async fn post_message(&self, channel: &str, document: &Document) -> Result<(), AppError> {
        let payload = post_message_body(&self.bot_token, channel, document);
        let resp = self
            .client
            .post(&self.post_message_url)
            .bearer_auth(&self.bot_token)
            .json(&payload)
            .send()
            .await?;

        let value: Value = resp.json().await?;
        if !value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false) {
            let reason = value
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown_error");
            tracing::warn!(channel, reason, "chat.postMessage failed");
            return Err(AppError::Delivery(format!("slack send failed: {reason}")));
        }
        tracing::debug!(channel, "posted message");
        Ok(())
    }
}
