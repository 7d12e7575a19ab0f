//! Composition objects: small immutable values shared by blocks and elements.

use serde_json::{json, Map, Value};

use super::elements::ButtonStyle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Text {
    Plain { text: String, emoji: Option<bool> },
    /// `verbatim = true` turns off Slack's automatic link and mention parsing.
    Markdown { text: String, verbatim: bool },
}

impl Text {
    pub fn plain(text: impl Into<String>) -> Self {
        Text::Plain {
            text: text.into(),
            emoji: None,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Text::Markdown {
            text: text.into(),
            verbatim: false,
        }
    }

    /// Only meaningful for plain text; markdown is returned unchanged.
    pub fn emoji(self, flag: bool) -> Self {
        match self {
            Text::Plain { text, .. } => Text::Plain {
                text,
                emoji: Some(flag),
            },
            other => other,
        }
    }

    /// Only meaningful for markdown; plain text is returned unchanged.
    pub fn verbatim(self, flag: bool) -> Self {
        match self {
            Text::Markdown { text, .. } => Text::Markdown {
                text,
                verbatim: flag,
            },
            other => other,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Text::Plain { text, .. } | Text::Markdown { text, .. } => text,
        }
    }

    pub fn char_len(&self) -> usize {
        self.as_str().chars().count()
    }

    pub fn render(&self) -> Value {
        match self {
            Text::Plain { text, emoji } => {
                let mut node = Map::new();
                node.insert("type".into(), json!("plain_text"));
                node.insert("text".into(), json!(text));
                if let Some(emoji) = emoji {
                    node.insert("emoji".into(), json!(emoji));
                }
                Value::Object(node)
            }
            Text::Markdown { text, verbatim } => json!({
                "type": "mrkdwn",
                "text": text,
                "verbatim": verbatim,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionObject {
    text: Text,
    value: String,
    description: Option<Text>,
    url: Option<String>,
}

impl OptionObject {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: Text::plain(label),
            value: value.into(),
            description: None,
            url: None,
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(Text::plain(text));
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn label(&self) -> &str {
        self.text.as_str()
    }

    pub fn render(&self) -> Value {
        let mut node = Map::new();
        node.insert("text".into(), self.text.render());
        node.insert("value".into(), json!(self.value));
        if let Some(description) = &self.description {
            node.insert("description".into(), description.render());
        }
        if let Some(url) = &self.url {
            node.insert("url".into(), json!(url));
        }
        Value::Object(node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationDialog {
    title: Text,
    text: Text,
    confirm: Text,
    deny: Text,
    style: Option<ButtonStyle>,
}

impl ConfirmationDialog {
    pub fn new(
        title: impl Into<String>,
        text: Text,
        confirm: impl Into<String>,
        deny: impl Into<String>,
    ) -> Self {
        Self {
            title: Text::plain(title),
            text,
            confirm: Text::plain(confirm),
            deny: Text::plain(deny),
            style: None,
        }
    }

    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn render(&self) -> Value {
        let mut node = Map::new();
        node.insert("title".into(), self.title.render());
        node.insert("text".into(), self.text.render());
        node.insert("confirm".into(), self.confirm.render());
        node.insert("deny".into(), self.deny.render());
        if let Some(style) = self.style {
            node.insert("style".into(), json!(style.as_str()));
        }
        Value::Object(node)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchTrigger {
    OnEnterPressed,
    OnCharacterEntered,
}

impl DispatchTrigger {
    fn as_str(&self) -> &'static str {
        match self {
            DispatchTrigger::OnEnterPressed => "on_enter_pressed",
            DispatchTrigger::OnCharacterEntered => "on_character_entered",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchActionConfig {
    triggers: Vec<DispatchTrigger>,
}

impl DispatchActionConfig {
    pub fn new(triggers: Vec<DispatchTrigger>) -> Self {
        Self { triggers }
    }

    pub fn render(&self) -> Value {
        let triggers: Vec<&str> = self.triggers.iter().map(DispatchTrigger::as_str).collect();
        json!({ "trigger_actions_on": triggers })
    }
}
