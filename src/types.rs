use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Current time at the precision the store keeps (whole seconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueType {
    Personal,
    Channel,
    Default,
}

impl QueueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueType::Personal => "personal",
            QueueType::Channel => "channel",
            QueueType::Default => "default",
        }
    }
}

impl FromStr for QueueType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "personal" => Ok(QueueType::Personal),
            "channel" => Ok(QueueType::Channel),
            "default" => Ok(QueueType::Default),
            other => Err(format!("unknown queue type {other:?}")),
        }
    }
}

impl fmt::Display for QueueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `done` is part of the persisted vocabulary but no interaction moves a request into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Idle,
    InProgress,
    Done,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Idle => "idle",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Done => "done",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "idle" => Ok(RequestStatus::Idle),
            "in_progress" => Ok(RequestStatus::InProgress),
            "done" => Ok(RequestStatus::Done),
            "rejected" => Ok(RequestStatus::Rejected),
            other => Err(format!("unknown request status {other:?}")),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Queue {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub queue_type: QueueType,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Queue {
    fn build(
        name: impl Into<String>,
        queue_type: QueueType,
        owner: Option<String>,
        channel: Option<String>,
    ) -> Self {
        let now = now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            queue_type,
            owner,
            channel,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn personal(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self::build(name, QueueType::Personal, Some(owner.into()), None)
    }

    pub fn channel(
        name: impl Into<String>,
        owner: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self::build(
            name,
            QueueType::Channel,
            Some(owner.into()),
            Some(channel.into()),
        )
    }

    pub fn default_queue(name: impl Into<String>) -> Self {
        Self::build(name, QueueType::Default, None, None)
    }

    /// The JSON embedded in button values; later interactions decode it back into a `Queue`.
    pub fn to_button_value(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: String,
    pub queue_id: String,
    pub description: String,
    pub status: RequestStatus,
    pub owner: String,
    #[serde(default)]
    pub assignee: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Request {
    pub fn new(
        queue_id: impl Into<String>,
        description: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        let now = now();
        Self {
            id: Uuid::new_v4().to_string(),
            queue_id: queue_id.into(),
            description: description.into(),
            status: RequestStatus::Idle,
            owner: owner.into(),
            assignee: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = now();
        Self {
            id: id.into(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Value carried by the accept and reject buttons of the request listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestAction {
    pub request_id: String,
    #[serde(default)]
    pub user_id: String,
    pub request_owner: String,
    #[serde(default)]
    pub request_description: String,
}

/// Value carried by the delete-queue button; only the id is needed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueueRef {
    pub id: String,
}
