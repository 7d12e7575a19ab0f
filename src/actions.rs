//! Interaction callbacks: one handler per action id, selected by the first action in the payload.
//!
//! Missing or undecodable data aborts the interaction with an error log and no reply. Storage and
//! delivery failures propagate as [`AppError`].

use serde::de::DeserializeOwned;

use crate::blocks::{Document, ResponseType};
use crate::commands;
use crate::db::{RequestFilter, RequestPatch};
use crate::error::AppError;
use crate::ids::{self, ActionId};
use crate::interaction::InteractionPayload;
use crate::types::{Queue, QueueRef, Request, RequestAction, RequestStatus};
use crate::views::{self, Verdict};
use crate::AppState;

pub async fn dispatch_interaction(
    state: &AppState,
    payload: &InteractionPayload,
) -> Result<(), AppError> {
    let Some(raw_action) = payload.primary_action_id() else {
        tracing::error!(user_id = payload.user_id(), "interaction carries no action");
        return Ok(());
    };
    let Some(action) = ActionId::parse(raw_action) else {
        tracing::warn!(action_id = raw_action, "unsupported interaction action");
        return Ok(());
    };

    tracing::info!(
        action_id = action.as_str(),
        user_id = payload.user_id(),
        "handling interaction"
    );

    match action {
        ActionId::CancelInteraction => cancel(state, payload).await,
        ActionId::SubmitNewQueue => submit_new_queue(state, payload).await,
        ActionId::DeleteQueue => delete_queue(state, payload).await,
        ActionId::AddRequest => add_request(state, payload).await,
        ActionId::SubmitRequest => submit_request(state, payload).await,
        ActionId::ViewRequests => view_requests(state, payload).await,
        ActionId::AcceptRequest => settle_request(state, payload, Verdict::Accepted).await,
        ActionId::RejectRequest => settle_request(state, payload, Verdict::Rejected).await,
    }
}

fn action_value(payload: &InteractionPayload, action: ActionId) -> Option<&str> {
    let value = payload
        .action_by_id(action.as_str())?
        .value
        .as_deref()
        .filter(|v| !v.is_empty());
    if value.is_none() {
        tracing::error!(action_id = action.as_str(), "action carries no value");
    }
    value
}

fn decode_value<T: DeserializeOwned>(payload: &InteractionPayload, action: ActionId) -> Option<T> {
    let raw = action_value(payload, action)?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!(action_id = action.as_str(), error = %err, "undecodable action value");
            None
        }
    }
}

async fn reply(
    state: &AppState,
    payload: &InteractionPayload,
    document: &Document,
) -> Result<(), AppError> {
    state.messenger.respond(payload.response_url(), document).await
}

async fn cancel(state: &AppState, payload: &InteractionPayload) -> Result<(), AppError> {
    reply(state, payload, &views::cancelled()).await
}

async fn submit_new_queue(state: &AppState, payload: &InteractionPayload) -> Result<(), AppError> {
    // Any non-empty value counts as a choice, whitespace included.
    let selected =
        payload.block_state_value(ids::DEFAULT_QUEUE_BLOCK, ids::DEFAULT_QUEUE_SELECTION);
    let custom = payload.block_state_value(ids::CUSTOM_QUEUE_BLOCK, ids::CUSTOM_QUEUE_FIELD);

    let name = match (selected.is_empty(), custom.is_empty()) {
        (true, true) => {
            let form = commands::queue_form(state, Some(views::ALERT_NO_SELECTION)).await?;
            return reply(state, payload, &form).await;
        }
        (false, false) => {
            let form = commands::queue_form(state, Some(views::ALERT_BOTH_SELECTED)).await?;
            return reply(state, payload, &form).await;
        }
        (false, true) => selected,
        (true, false) => custom,
    };

    let Some(channel) = payload.channel_id() else {
        tracing::error!(user_id = payload.user_id(), "queue creation outside a channel");
        return Ok(());
    };

    let queue = Queue::channel(name, payload.user_id(), channel);
    state.queues.create(&queue).await?;
    tracing::info!(queue_id = %queue.id, channel, "created channel queue");

    let done = Document::from_text(format!("Successfully created the new queue \"{name}\""))
        .replace_original(true)
        .response_type(ResponseType::Ephemeral);
    reply(state, payload, &done).await
}

async fn delete_queue(state: &AppState, payload: &InteractionPayload) -> Result<(), AppError> {
    let Some(target) = decode_value::<QueueRef>(payload, ActionId::DeleteQueue) else {
        return Ok(());
    };

    if !state.queues.delete(&target.id).await? {
        tracing::warn!(queue_id = %target.id, "queue already gone");
    }

    let listing = commands::queue_listing(state, payload.user_id(), payload.channel_id())
        .await?
        .replace_original(true);
    reply(state, payload, &listing).await
}

async fn add_request(state: &AppState, payload: &InteractionPayload) -> Result<(), AppError> {
    let Some(queue) = decode_value::<Queue>(payload, ActionId::AddRequest) else {
        return Ok(());
    };
    let form = views::request_form(&queue, state.config.queue.max_request_length)?;
    reply(state, payload, &form).await
}

async fn submit_request(state: &AppState, payload: &InteractionPayload) -> Result<(), AppError> {
    let description = payload
        .block_state_value(ids::NEW_REQUEST_BLOCK, ids::NEW_REQUEST_FIELD)
        .trim();
    if description.is_empty() {
        tracing::error!(user_id = payload.user_id(), "request form submitted empty");
        return Ok(());
    }
    let Some(queue) = decode_value::<Queue>(payload, ActionId::SubmitRequest) else {
        return Ok(());
    };

    let request = Request::new(queue.id.clone(), description, payload.user_id());
    state.requests.create(&request).await?;
    tracing::info!(request_id = %request.id, queue_id = %queue.id, "request submitted");

    reply(
        state,
        payload,
        &Document::from_text("Successfully submitted your request to queue"),
    )
    .await
}

async fn view_requests(state: &AppState, payload: &InteractionPayload) -> Result<(), AppError> {
    let Some(queue) = decode_value::<Queue>(payload, ActionId::ViewRequests) else {
        return Ok(());
    };
    let filter = RequestFilter {
        queue_id: Some(queue.id.clone()),
        ..RequestFilter::default()
    };
    let requests = state.requests.list(&filter).await?;
    let listing = views::request_listing(&requests, payload.user_id())?;
    reply(state, payload, &listing).await
}

/// Accept or reject. The latest click wins; no earlier status blocks the change.
async fn settle_request(
    state: &AppState,
    payload: &InteractionPayload,
    verdict: Verdict,
) -> Result<(), AppError> {
    let action = match verdict {
        Verdict::Accepted => ActionId::AcceptRequest,
        Verdict::Rejected => ActionId::RejectRequest,
    };
    let Some(target) = decode_value::<RequestAction>(payload, action) else {
        return Ok(());
    };

    let actor = payload.user_id();
    let patch = match verdict {
        Verdict::Accepted => RequestPatch {
            status: Some(RequestStatus::InProgress),
            assignee: Some(actor.to_string()),
            ..RequestPatch::default()
        },
        Verdict::Rejected => RequestPatch {
            status: Some(RequestStatus::Rejected),
            ..RequestPatch::default()
        },
    };
    let Some(stored) = state.requests.update(&target.request_id, &patch).await? else {
        tracing::error!(request_id = %target.request_id, "request not found");
        return Ok(());
    };
    tracing::info!(request_id = %target.request_id, status = ?patch.status, "request settled");

    let description = if target.request_description.is_empty() {
        stored.description.as_str()
    } else {
        target.request_description.as_str()
    };
    let notice = views::owner_notification(actor, description, verdict);
    state
        .messenger
        .post_message(&target.request_owner, &notice)
        .await?;

    reply(state, payload, &Document::from_text(verdict.confirmation())).await
}
