//! Identifiers shared between rendered documents and the interactions they come back as.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionId {
    CancelInteraction,
    SubmitNewQueue,
    DeleteQueue,
    AddRequest,
    SubmitRequest,
    ViewRequests,
    AcceptRequest,
    RejectRequest,
}

impl ActionId {
    pub const ALL: [ActionId; 8] = [
        ActionId::CancelInteraction,
        ActionId::SubmitNewQueue,
        ActionId::DeleteQueue,
        ActionId::AddRequest,
        ActionId::SubmitRequest,
        ActionId::ViewRequests,
        ActionId::AcceptRequest,
        ActionId::RejectRequest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionId::CancelInteraction => "cancel-interaction",
            ActionId::SubmitNewQueue => "submit-new-queue",
            ActionId::DeleteQueue => "delete-queue",
            ActionId::AddRequest => "add-request",
            ActionId::SubmitRequest => "submit-request",
            ActionId::ViewRequests => "view-requests",
            ActionId::AcceptRequest => "accept-request",
            ActionId::RejectRequest => "reject-request",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == value)
    }
}

pub const DEFAULT_QUEUE_BLOCK: &str = "default-queue-input";
pub const DEFAULT_QUEUE_SELECTION: &str = "default-queue-selection";
pub const CUSTOM_QUEUE_BLOCK: &str = "custom-queue-input";
pub const CUSTOM_QUEUE_FIELD: &str = "custom-queue-input";
pub const NEW_REQUEST_BLOCK: &str = "new-request-input";
pub const NEW_REQUEST_FIELD: &str = "request-input-field";

pub const EMOJI_ALERT: &str = ":exclamation:";
pub const EMOJI_PERSONAL_QUEUE: &str = ":crown:";
pub const EMOJI_CHANNEL_QUEUE: &str = ":black_medium_small_square:";
