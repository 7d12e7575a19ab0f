pub mod actions;
pub mod blocks;
pub mod channels;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod interaction;
pub mod signature;
pub mod types;
pub mod views;

pub use config::Config;
pub use error::AppError;

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::FormRejection, State},
    http::{HeaderMap, Request as HttpRequest, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::any::AnyPoolOptions;

use self::channels::{Messenger, SlackMessenger};
use self::config::{load_config, resolve_database_url};
use self::db::{Repository, SqlRepository};
use self::interaction::InteractionPayload;
use self::types::{Queue, Request, User};

/// Largest webhook body buffered for signature verification.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub queues: Arc<dyn Repository<Queue>>,
    pub requests: Arc<dyn Repository<Request>>,
    pub users: Arc<dyn Repository<User>>,
    pub messenger: Arc<dyn Messenger>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct InteractionForm {
    pub payload: String,
}

pub async fn create_app() -> anyhow::Result<(AppState, Router)> {
    let state = build_state(load_config()).await?;
    let app = router(state.clone());
    Ok((state, app))
}

/// Connects storage, bootstraps the schema, seeds default queues and wires the Slack client.
pub async fn build_state(config: Config) -> anyhow::Result<AppState> {
    sqlx::any::install_default_drivers();

    let db_url = resolve_database_url(&config);
    let db_kind = db::db_kind_from_url(&db_url);
    let pool = AnyPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&db_url)
        .await?;
    db::init_db(&pool, db_kind).await?;

    let queues: Arc<dyn Repository<Queue>> =
        Arc::new(SqlRepository::<Queue>::new(pool.clone(), db_kind));
    let requests: Arc<dyn Repository<Request>> =
        Arc::new(SqlRepository::<Request>::new(pool.clone(), db_kind));
    let users: Arc<dyn Repository<User>> = Arc::new(SqlRepository::<User>::new(pool, db_kind));

    db::seed_default_queues(queues.as_ref(), &config.queue.default_queues).await?;

    if config.slack.signing_secret.is_none() {
        tracing::warn!("no slack signing secret configured, every signed route will answer 401");
    }
    let bot_token = config.slack.bot_token.clone().unwrap_or_else(|| {
        tracing::warn!("no slack bot token configured, direct messages will fail");
        String::new()
    });
    let messenger = Arc::new(SlackMessenger::new(
        reqwest::Client::new(),
        bot_token,
        config.slack.post_message_url.clone(),
    ));

    Ok(AppState {
        config,
        queues,
        requests,
        users,
        messenger,
    })
}

pub fn router(state: AppState) -> Router {
    let signed_routes = Router::new()
        .route("/commands", post(slash_command))
        .route("/interactions", post(interaction))
        .layer(middleware::from_fn_with_state(state.clone(), verify_slack_request));

    let public_routes = Router::new().route("/health", get(health));

    Router::new()
        .merge(signed_routes)
        .merge(public_routes)
        .with_state(state)
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
}

fn bad_request() -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({"message": "Bad Request"}))).into_response()
}

/// `true` when the timestamp header is within `max_age` seconds of `now`.
pub fn is_fresh(timestamp: Option<&str>, max_age: u64, now: i64) -> bool {
    let Some(ts) = timestamp.and_then(|t| t.trim().parse::<i64>().ok()) else {
        return false;
    };
    now.abs_diff(ts) <= max_age
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

async fn verify_slack_request(
    State(state): State<AppState>,
    req: HttpRequest<Body>,
    next: middleware::Next,
) -> Response {
    let Some(secret) = state.config.slack.signing_secret.as_deref() else {
        tracing::warn!("rejected request: no signing secret configured");
        return unauthorized();
    };

    let (parts, body) = req.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "rejected request: unreadable body");
            return bad_request();
        }
    };

    let timestamp = header_value(&parts.headers, &state.config.slack.timestamp_header);
    let signature = header_value(&parts.headers, &state.config.slack.signature_header);

    if !signature::verify(signature, timestamp, &bytes, secret) {
        return unauthorized();
    }
    if let Some(max_age) = state.config.slack.max_request_age_secs {
        if !is_fresh(timestamp, max_age, Utc::now().timestamp()) {
            tracing::warn!(max_age, "rejected request: stale timestamp");
            return unauthorized();
        }
    }

    next.run(HttpRequest::from_parts(parts, Body::from(bytes))).await
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn slash_command(
    State(state): State<AppState>,
    form: Result<Form<commands::SlashCommandForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected slash command body");
            return bad_request();
        }
    };

    match commands::dispatch_command(&state, &form).await {
        Ok(document) => Json(document).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn interaction(
    State(state): State<AppState>,
    form: Result<Form<InteractionForm>, FormRejection>,
) -> Response {
    let payload = match form {
        Ok(Form(form)) => match InteractionPayload::from_json(&form.payload) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(error = %err, "rejected interaction payload");
                return bad_request();
            }
        },
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected interaction body");
            return bad_request();
        }
    };

    match actions::dispatch_interaction(&state, &payload).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => err.into_response(),
    }
}
