use serde::Deserialize;

use crate::blocks::{Document, ResponseType};
use crate::db::QueueFilter;
use crate::error::AppError;
use crate::types::{Queue, QueueType, User};
use crate::views;
use crate::AppState;

/// Form body Slack posts for a slash command. Every non-optional field must be present.
#[derive(Debug, Clone, Deserialize)]
pub struct SlashCommandForm {
    pub command: String,
    pub text: String,
    pub user_id: String,
    pub user_name: String,
    pub channel_id: String,
    pub team_id: String,
    pub response_url: String,
    pub trigger_id: String,
    #[serde(default)]
    pub api_app_id: Option<String>,
    #[serde(default)]
    pub enterprise_id: Option<String>,
    #[serde(default)]
    pub enterprise_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCommand {
    pub action: String,
    pub args: String,
}

impl SlashCommand {
    /// `"list  extra words"` becomes action `list` with args `extra words`.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text.split_once(char::is_whitespace) {
            Some((action, args)) => Self {
                action: action.to_string(),
                args: args.trim().to_string(),
            },
            None => Self {
                action: text.to_string(),
                args: String::new(),
            },
        }
    }
}

pub async fn dispatch_command(
    state: &AppState,
    form: &SlashCommandForm,
) -> Result<Document, AppError> {
    establish_user(state, &form.user_id, &form.user_name).await?;

    let command = SlashCommand::parse(&form.text);
    tracing::info!(
        command = %form.command,
        action = %command.action,
        user_id = %form.user_id,
        channel_id = %form.channel_id,
        "handling slash command"
    );

    match command.action.as_str() {
        "create-queue" => queue_form(state, None).await,
        "list" => list_queues(state, &form.user_id, &form.channel_id).await,
        other => {
            tracing::warn!(action = other, "unsupported slash command");
            Ok(Document::from_text(format!("`{other}` is not a supported command."))
                .response_type(ResponseType::Ephemeral))
        }
    }
}

/// Returns the stored user, creating it on first contact.
pub async fn establish_user(
    state: &AppState,
    user_id: &str,
    user_name: &str,
) -> Result<User, AppError> {
    if let Some(user) = state.users.get_by_id(user_id).await? {
        return Ok(user);
    }
    let user = User::new(user_id, user_name);
    state.users.create(&user).await?;
    tracing::info!(user_id, "registered new user");
    Ok(user)
}

/// The create-queue form, optionally topped with an alert line.
pub async fn queue_form(state: &AppState, alert: Option<&str>) -> Result<Document, AppError> {
    let filter = QueueFilter {
        queue_type: Some(QueueType::Default),
        ..QueueFilter::default()
    };
    let defaults = state.queues.list(&filter).await?;
    Ok(views::create_queue_form(
        &defaults,
        alert,
        state.config.queue.max_custom_name_length,
    )?)
}

async fn personal_queue(state: &AppState, user_id: &str) -> Result<Option<Queue>, AppError> {
    let filter = QueueFilter {
        queue_type: Some(QueueType::Personal),
        owner: Some(user_id.to_string()),
        ..QueueFilter::default()
    };
    Ok(state.queues.list(&filter).await?.into_iter().next())
}

pub async fn ensure_personal_queue(state: &AppState, user_id: &str) -> Result<Queue, AppError> {
    if let Some(queue) = personal_queue(state, user_id).await? {
        return Ok(queue);
    }
    let queue = Queue::personal(state.config.queue.personal_queue_name.clone(), user_id);
    state.queues.create(&queue).await?;
    tracing::info!(user_id, queue_id = %queue.id, "created personal queue");
    Ok(queue)
}

/// The user's personal queue (if any) followed by the channel's queues.
pub async fn queue_listing(
    state: &AppState,
    user_id: &str,
    channel_id: Option<&str>,
) -> Result<Document, AppError> {
    let personal = personal_queue(state, user_id).await?;
    let channel_queues = match channel_id {
        Some(channel) => {
            let filter = QueueFilter {
                queue_type: Some(QueueType::Channel),
                channel: Some(channel.to_string()),
                ..QueueFilter::default()
            };
            state.queues.list(&filter).await?
        }
        None => Vec::new(),
    };
    Ok(views::queue_listing(personal.as_ref(), &channel_queues)?)
}

async fn list_queues(
    state: &AppState,
    user_id: &str,
    channel_id: &str,
) -> Result<Document, AppError> {
    ensure_personal_queue(state, user_id).await?;
    Ok(queue_listing(state, user_id, Some(channel_id))
        .await?
        .response_type(ResponseType::Ephemeral))
}
