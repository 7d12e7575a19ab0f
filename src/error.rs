use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::blocks::BlockError;

/// Stable codes attached to every [`AppError`], safe to surface in logs and alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    DataAccess,
    Decode,
    Delivery,
    Render,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DataAccess => "1000",
            ErrorCode::Decode => "1100",
            ErrorCode::Delivery => "2000",
            ErrorCode::Render => "3000",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("data access failure: {message}")]
    DataAccess {
        message: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to decode {entity}: {message}")]
    Decode {
        entity: &'static str,
        message: String,
    },
    #[error("outbound delivery failed: {0}")]
    Delivery(String),
    #[error(transparent)]
    Render(#[from] BlockError),
}

impl AppError {
    pub fn data_access(message: impl Into<String>, source: sqlx::Error) -> Self {
        AppError::DataAccess {
            message: message.into(),
            source,
        }
    }

    pub fn decode(entity: &'static str, message: impl Into<String>) -> Self {
        AppError::Decode {
            entity,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::DataAccess { .. } => ErrorCode::DataAccess,
            AppError::Decode { .. } => ErrorCode::Decode,
            AppError::Delivery(_) => ErrorCode::Delivery,
            AppError::Render(_) => ErrorCode::Render,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Delivery(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(code = self.code().as_str(), error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Internal Server Error"})),
        )
            .into_response()
    }
}
