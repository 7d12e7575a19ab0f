//! Reply documents shared by the command and action dispatchers.

use crate::blocks::{
    ActionGroup, BlockError, Button, ButtonStyle, ConfirmationDialog, DividerBlock, Document,
    HeaderBlock, InputBlock, OptionObject, PlainTextInput, RadioButtons, ResponseType,
    RichTextBlock, RichTextComponent, RichTextSection, SectionBlock, Text,
};
use crate::ids::{self, ActionId};
use crate::types::{Queue, Request, RequestAction};

pub const NOTIFICATION_PREVIEW_LENGTH: usize = 50;

pub const ALERT_NO_SELECTION: &str = "You need to select a queue type to proceed";
pub const ALERT_BOTH_SELECTED: &str = "You can only select one queue type";

/// Cuts `input` to `max` characters and marks the cut with `...`.
pub fn truncate(input: &str, max: usize) -> String {
    if input.chars().count() <= max {
        return input.to_string();
    }
    let head: String = input.chars().take(max).collect();
    format!("{head}...")
}

pub fn alert(message: &str) -> String {
    format!("{} *{message}*", ids::EMOJI_ALERT)
}

fn cancel_button() -> Button {
    Button::new(ActionId::CancelInteraction.as_str(), "Cancel")
}

fn cancel_group() -> Result<ActionGroup, BlockError> {
    ActionGroup::new(vec![cancel_button().into()])
}

pub fn cancelled() -> Document {
    Document::new().delete_original(true)
}

pub fn create_queue_form(
    default_queues: &[Queue],
    alert_text: Option<&str>,
    max_name_length: u32,
) -> Result<Document, BlockError> {
    let options = default_queues
        .iter()
        .map(|q| OptionObject::new(q.name.clone(), q.name.clone()))
        .collect();
    let radio = RadioButtons::with_options(ids::DEFAULT_QUEUE_SELECTION, options)?;
    let custom = PlainTextInput::new(ids::CUSTOM_QUEUE_FIELD)
        .placeholder("e.g. Design reviews")
        .max_length(max_name_length)?;

    let mut doc = Document::new()
        .response_type(ResponseType::Ephemeral)
        .replace_original(true);
    if let Some(text) = alert_text {
        doc = doc.block(SectionBlock::markdown(alert(text))?);
    }
    Ok(doc
        .block(SectionBlock::markdown(
            "*What type of requests should be managed by this queue?*",
        )?)
        .block(
            InputBlock::new("Pick a default queue", radio)
                .block_id(ids::DEFAULT_QUEUE_BLOCK)
                .optional(true),
        )
        .block(
            InputBlock::new("Or name a custom queue", custom)
                .block_id(ids::CUSTOM_QUEUE_BLOCK)
                .optional(true),
        )
        .block(ActionGroup::new(vec![
            Button::new(ActionId::SubmitNewQueue.as_str(), "Create")
                .style(ButtonStyle::Primary)
                .into(),
            cancel_button().style(ButtonStyle::Danger).into(),
        ])?))
}

fn queue_actions(queue: &Queue) -> Result<ActionGroup, BlockError> {
    let value = queue.to_button_value();
    let confirm = ConfirmationDialog::new(
        "Delete queue",
        Text::markdown(format!("Delete *{}* and stop tracking it here?", queue.name)),
        "Delete",
        "Keep it",
    )
    .style(ButtonStyle::Danger);
    ActionGroup::new(vec![
        Button::new(ActionId::ViewRequests.as_str(), "View requests")
            .value(value.clone())
            .into(),
        Button::new(ActionId::AddRequest.as_str(), "Add request")
            .value(value.clone())
            .into(),
        Button::new(ActionId::DeleteQueue.as_str(), "Delete!")
            .style(ButtonStyle::Danger)
            .value(value)
            .confirm(confirm)
            .into(),
    ])
}

pub fn queue_listing(
    personal: Option<&Queue>,
    channel_queues: &[Queue],
) -> Result<Document, BlockError> {
    let mut doc = Document::new().block(HeaderBlock::new("Available Queues")?);
    if let Some(queue) = personal {
        doc = doc
            .block(SectionBlock::markdown(format!(
                "{} *{}*",
                ids::EMOJI_PERSONAL_QUEUE,
                queue.name
            ))?)
            .block(queue_actions(queue)?)
            .block(DividerBlock::new());
    }
    for queue in channel_queues {
        doc = doc
            .block(SectionBlock::markdown(format!(
                "{} *{}*",
                ids::EMOJI_CHANNEL_QUEUE,
                queue.name
            ))?)
            .block(queue_actions(queue)?);
    }
    Ok(doc.block(cancel_group()?))
}

pub fn request_form(queue: &Queue, max_length: u32) -> Result<Document, BlockError> {
    let input = PlainTextInput::new(ids::NEW_REQUEST_FIELD)
        .multiline(true)
        .placeholder("What do you need?")
        .max_length(max_length)?;
    Ok(Document::new()
        .response_type(ResponseType::Ephemeral)
        .replace_original(true)
        .block(
            InputBlock::new(format!("New request for {}", queue.name), input)
                .block_id(ids::NEW_REQUEST_BLOCK),
        )
        .block(ActionGroup::new(vec![
            Button::new(ActionId::SubmitRequest.as_str(), "Submit")
                .style(ButtonStyle::Primary)
                .value(queue.to_button_value())
                .into(),
            cancel_button().into(),
        ])?))
}

pub fn request_listing(requests: &[Request], viewer_id: &str) -> Result<Document, BlockError> {
    let mut doc = Document::new()
        .replace_original(true)
        .block(HeaderBlock::new("Requests")?);
    for request in requests {
        let value = serde_json::to_string(&RequestAction {
            request_id: request.id.clone(),
            user_id: viewer_id.to_string(),
            request_owner: request.owner.clone(),
            request_description: request.description.clone(),
        })
        .unwrap_or_default();
        doc = doc
            .block(SectionBlock::markdown(format!(
                "<@{}>: {}",
                request.owner, request.description
            ))?)
            .block(ActionGroup::new(vec![
                Button::new(ActionId::AcceptRequest.as_str(), "Pick up request")
                    .style(ButtonStyle::Primary)
                    .value(value.clone())
                    .into(),
                Button::new(ActionId::RejectRequest.as_str(), "Reject")
                    .value(value)
                    .into(),
            ])?)
            .block(DividerBlock::new());
    }
    Ok(doc.block(cancel_group()?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl Verdict {
    fn verb(&self) -> &'static str {
        match self {
            Verdict::Accepted => "has picked up",
            Verdict::Rejected => "has rejected",
        }
    }

    pub fn confirmation(&self) -> &'static str {
        match self {
            Verdict::Accepted => "Request accepted",
            Verdict::Rejected => "Request rejected",
        }
    }
}

/// Direct message to a request's owner about what happened to it.
pub fn owner_notification(actor_id: &str, description: &str, verdict: Verdict) -> Document {
    let preview = truncate(description, NOTIFICATION_PREVIEW_LENGTH);
    let tail = format!(" {} your request \"{preview}\"", verdict.verb());
    let rich = RichTextBlock::new(vec![RichTextSection::new(vec![
        RichTextComponent::user(actor_id),
        RichTextComponent::text(tail.clone()),
    ])
    .into()]);
    Document::from_text(format!("<@{actor_id}>{tail}")).block(rich)
}
