use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// A `block_actions` callback, decoded from the `payload` form field.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionPayload {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub user: PayloadUser,
    #[serde(default)]
    pub channel: Option<PayloadChannel>,
    #[serde(default)]
    pub actions: Vec<PayloadAction>,
    #[serde(default)]
    pub state: PayloadState,
    #[serde(default)]
    pub container: Value,
    pub response_url: String,
    #[serde(default)]
    pub trigger_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadUser {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadChannel {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadAction {
    pub action_id: String,
    #[serde(default)]
    pub block_id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub selected_option: Option<SelectedOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedOption {
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayloadState {
    #[serde(default)]
    pub values: HashMap<String, HashMap<String, StateValue>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum StateValue {
    #[serde(rename = "radio_buttons")]
    RadioButtons {
        #[serde(default)]
        selected_option: Option<SelectedOption>,
    },
    #[serde(rename = "plain_text_input")]
    PlainTextInput {
        #[serde(default)]
        value: Option<String>,
    },
    #[serde(other)]
    Other,
}

impl InteractionPayload {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user
            .username
            .as_deref()
            .or(self.user.name.as_deref())
    }

    pub fn channel_id(&self) -> Option<&str> {
        self.channel.as_ref().map(|c| c.id.as_str())
    }

    pub fn response_url(&self) -> &str {
        &self.response_url
    }

    /// Slack sends one action per click; if several arrive only the first is acted on.
    pub fn primary_action_id(&self) -> Option<&str> {
        if self.actions.len() > 1 {
            tracing::warn!(
                count = self.actions.len(),
                "interaction carries more than one action, using the first"
            );
        }
        self.actions.first().map(|a| a.action_id.as_str())
    }

    pub fn action_by_id(&self, action_id: &str) -> Option<&PayloadAction> {
        let found = self.actions.iter().find(|a| a.action_id == action_id);
        if found.is_none() {
            tracing::error!(action_id, "action not present in interaction payload");
        }
        found
    }

    /// Current value of an input inside the message's form state, or `""` when it is unset.
    pub fn block_state_value(&self, block_id: &str, action_id: &str) -> &str {
        let value = self
            .state
            .values
            .get(block_id)
            .and_then(|block| block.get(action_id));
        match value {
            Some(StateValue::RadioButtons {
                selected_option: Some(option),
            }) => &option.value,
            Some(StateValue::PlainTextInput { value: Some(value) }) => value,
            _ => "",
        }
    }
}
