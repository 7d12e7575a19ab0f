use serde_json::{json, Map, Value};

use super::text::{ConfirmationDialog, DispatchActionConfig, OptionObject, Text};
use super::BlockError;

pub const MAX_RADIO_OPTIONS: usize = 10;
pub const MAX_INPUT_LENGTH: u32 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Danger,
}

impl ButtonStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonStyle::Primary => "primary",
            ButtonStyle::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    action_id: String,
    text: Text,
    value: Option<String>,
    style: Option<ButtonStyle>,
    url: Option<String>,
    confirm: Option<ConfirmationDialog>,
    accessibility_label: Option<String>,
}

impl Button {
    pub fn new(action_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            text: Text::plain(label),
            value: None,
            style: None,
            url: None,
            confirm: None,
            accessibility_label: None,
        }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn confirm(mut self, dialog: ConfirmationDialog) -> Self {
        self.confirm = Some(dialog);
        self
    }

    pub fn accessibility_label(mut self, label: impl Into<String>) -> Self {
        self.accessibility_label = Some(label.into());
        self
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    pub fn render(&self) -> Value {
        let mut node = Map::new();
        node.insert("type".into(), json!("button"));
        node.insert("action_id".into(), json!(self.action_id));
        node.insert("text".into(), self.text.render());
        if let Some(value) = &self.value {
            node.insert("value".into(), json!(value));
        }
        if let Some(style) = self.style {
            node.insert("style".into(), json!(style.as_str()));
        }
        if let Some(url) = &self.url {
            node.insert("url".into(), json!(url));
        }
        if let Some(confirm) = &self.confirm {
            node.insert("confirm".into(), confirm.render());
        }
        if let Some(label) = &self.accessibility_label {
            node.insert("accessibility_label".into(), json!(label));
        }
        Value::Object(node)
    }
}

/// A radio group. The option count is capped at [`MAX_RADIO_OPTIONS`] on every mutation, and an
/// initial option must already be one of the group's options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioButtons {
    action_id: String,
    options: Vec<OptionObject>,
    initial_option: Option<OptionObject>,
    confirm: Option<ConfirmationDialog>,
    focus_on_load: Option<bool>,
}

impl RadioButtons {
    pub fn new(action_id: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            options: Vec::new(),
            initial_option: None,
            confirm: None,
            focus_on_load: None,
        }
    }

    pub fn with_options(
        action_id: impl Into<String>,
        options: Vec<OptionObject>,
    ) -> Result<Self, BlockError> {
        if options.len() > MAX_RADIO_OPTIONS {
            return Err(BlockError::TooManyOptions {
                max: MAX_RADIO_OPTIONS,
            });
        }
        let mut radio = Self::new(action_id);
        radio.options = options;
        Ok(radio)
    }

    pub fn add_option(mut self, option: OptionObject) -> Result<Self, BlockError> {
        if self.options.len() >= MAX_RADIO_OPTIONS {
            return Err(BlockError::TooManyOptions {
                max: MAX_RADIO_OPTIONS,
            });
        }
        self.options.push(option);
        Ok(self)
    }

    pub fn set_initial_option(mut self, option: &OptionObject) -> Result<Self, BlockError> {
        if !self.options.contains(option) {
            return Err(BlockError::UnknownInitialOption {
                value: option.value().to_string(),
            });
        }
        self.initial_option = Some(option.clone());
        Ok(self)
    }

    pub fn confirm(mut self, dialog: ConfirmationDialog) -> Self {
        self.confirm = Some(dialog);
        self
    }

    pub fn focus_on_load(mut self, flag: bool) -> Self {
        self.focus_on_load = Some(flag);
        self
    }

    pub fn options(&self) -> &[OptionObject] {
        &self.options
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    pub fn render(&self) -> Value {
        let mut node = Map::new();
        node.insert("type".into(), json!("radio_buttons"));
        node.insert("action_id".into(), json!(self.action_id));
        node.insert(
            "options".into(),
            Value::Array(self.options.iter().map(OptionObject::render).collect()),
        );
        if let Some(initial) = &self.initial_option {
            node.insert("initial_option".into(), initial.render());
        }
        if let Some(confirm) = &self.confirm {
            node.insert("confirm".into(), confirm.render());
        }
        if let Some(focus) = self.focus_on_load {
            node.insert("focus_on_load".into(), json!(focus));
        }
        Value::Object(node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainTextInput {
    action_id: String,
    placeholder: Option<Text>,
    initial_value: Option<String>,
    multiline: Option<bool>,
    min_length: Option<u32>,
    max_length: Option<u32>,
    dispatch_action_config: Option<DispatchActionConfig>,
    focus_on_load: Option<bool>,
}

impl PlainTextInput {
    pub fn new(action_id: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            placeholder: None,
            initial_value: None,
            multiline: None,
            min_length: None,
            max_length: None,
            dispatch_action_config: None,
            focus_on_load: None,
        }
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(Text::plain(text));
        self
    }

    pub fn initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    pub fn multiline(mut self, flag: bool) -> Self {
        self.multiline = Some(flag);
        self
    }

    pub fn min_length(mut self, length: u32) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn max_length(mut self, length: u32) -> Result<Self, BlockError> {
        if length > MAX_INPUT_LENGTH {
            return Err(BlockError::MaxLengthTooLarge {
                requested: length,
                max: MAX_INPUT_LENGTH,
            });
        }
        self.max_length = Some(length);
        Ok(self)
    }

    pub fn dispatch_action_config(mut self, config: DispatchActionConfig) -> Self {
        self.dispatch_action_config = Some(config);
        self
    }

    pub fn focus_on_load(mut self, flag: bool) -> Self {
        self.focus_on_load = Some(flag);
        self
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    pub fn render(&self) -> Value {
        let mut node = Map::new();
        node.insert("type".into(), json!("plain_text_input"));
        node.insert("action_id".into(), json!(self.action_id));
        if let Some(placeholder) = &self.placeholder {
            node.insert("placeholder".into(), placeholder.render());
        }
        if let Some(initial) = &self.initial_value {
            node.insert("initial_value".into(), json!(initial));
        }
        if let Some(multiline) = self.multiline {
            node.insert("multiline".into(), json!(multiline));
        }
        if let Some(min) = self.min_length {
            node.insert("min_length".into(), json!(min));
        }
        if let Some(max) = self.max_length {
            node.insert("max_length".into(), json!(max));
        }
        if let Some(config) = &self.dispatch_action_config {
            node.insert("dispatch_action_config".into(), config.render());
        }
        if let Some(focus) = self.focus_on_load {
            node.insert("focus_on_load".into(), json!(focus));
        }
        Value::Object(node)
    }
}

/// Interactive elements allowed inside an action group or as a section accessory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Button(Button),
    RadioButtons(RadioButtons),
}

impl Element {
    pub fn render(&self) -> Value {
        match self {
            Element::Button(button) => button.render(),
            Element::RadioButtons(radio) => radio.render(),
        }
    }
}

impl From<Button> for Element {
    fn from(button: Button) -> Self {
        Element::Button(button)
    }
}

impl From<RadioButtons> for Element {
    fn from(radio: RadioButtons) -> Self {
        Element::RadioButtons(radio)
    }
}

/// Elements allowed inside an input block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputElement {
    RadioButtons(RadioButtons),
    PlainTextInput(PlainTextInput),
}

impl InputElement {
    pub fn render(&self) -> Value {
        match self {
            InputElement::RadioButtons(radio) => radio.render(),
            InputElement::PlainTextInput(input) => input.render(),
        }
    }
}

impl From<RadioButtons> for InputElement {
    fn from(radio: RadioButtons) -> Self {
        InputElement::RadioButtons(radio)
    }
}

impl From<PlainTextInput> for InputElement {
    fn from(input: PlainTextInput) -> Self {
        InputElement::PlainTextInput(input)
    }
}
