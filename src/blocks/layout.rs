use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::elements::{Element, InputElement};
use super::rich_text::RichTextElement;
use super::text::Text;
use super::BlockError;

pub const MAX_HEADER_LENGTH: usize = 100;
pub const MAX_SECTION_TEXT_LENGTH: usize = 3000;
pub const MAX_SECTION_FIELDS: usize = 10;
pub const MAX_ACTION_ELEMENTS: usize = 25;

fn generated_block_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBlock {
    block_id: String,
    text: Text,
}

impl HeaderBlock {
    pub fn new(text: impl Into<String>) -> Result<Self, BlockError> {
        let text = Text::plain(text);
        let len = text.char_len();
        if len > MAX_HEADER_LENGTH {
            return Err(BlockError::HeaderTooLong {
                len,
                max: MAX_HEADER_LENGTH,
            });
        }
        Ok(Self {
            block_id: generated_block_id(),
            text,
        })
    }

    pub fn block_id(mut self, id: impl Into<String>) -> Self {
        self.block_id = id.into();
        self
    }

    pub fn render(&self) -> Value {
        json!({
            "type": "header",
            "block_id": self.block_id,
            "text": self.text.render(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DividerBlock {
    block_id: String,
}

impl DividerBlock {
    pub fn new() -> Self {
        Self {
            block_id: generated_block_id(),
        }
    }

    pub fn block_id(mut self, id: impl Into<String>) -> Self {
        self.block_id = id.into();
        self
    }

    pub fn render(&self) -> Value {
        json!({"type": "divider", "block_id": self.block_id})
    }
}

impl Default for DividerBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBlock {
    block_id: String,
    text: Text,
    fields: Vec<Text>,
    accessory: Option<Element>,
}

impl SectionBlock {
    pub fn new(text: Text) -> Result<Self, BlockError> {
        let len = text.char_len();
        if len > MAX_SECTION_TEXT_LENGTH {
            return Err(BlockError::SectionTextTooLong {
                len,
                max: MAX_SECTION_TEXT_LENGTH,
            });
        }
        Ok(Self {
            block_id: generated_block_id(),
            text,
            fields: Vec::new(),
            accessory: None,
        })
    }

    pub fn markdown(text: impl Into<String>) -> Result<Self, BlockError> {
        Self::new(Text::markdown(text))
    }

    pub fn block_id(mut self, id: impl Into<String>) -> Self {
        self.block_id = id.into();
        self
    }

    pub fn field(mut self, field: Text) -> Result<Self, BlockError> {
        if self.fields.len() >= MAX_SECTION_FIELDS {
            return Err(BlockError::TooManyFields {
                max: MAX_SECTION_FIELDS,
            });
        }
        self.fields.push(field);
        Ok(self)
    }

    pub fn accessory(mut self, element: impl Into<Element>) -> Self {
        self.accessory = Some(element.into());
        self
    }

    pub fn text(&self) -> &Text {
        &self.text
    }

    pub fn render(&self) -> Value {
        let mut node = Map::new();
        node.insert("type".into(), json!("section"));
        node.insert("block_id".into(), json!(self.block_id));
        node.insert("text".into(), self.text.render());
        if !self.fields.is_empty() {
            node.insert(
                "fields".into(),
                Value::Array(self.fields.iter().map(Text::render).collect()),
            );
        }
        if let Some(accessory) = &self.accessory {
            node.insert("accessory".into(), accessory.render());
        }
        Value::Object(node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionGroup {
    block_id: String,
    elements: Vec<Element>,
}

impl ActionGroup {
    pub fn new(elements: Vec<Element>) -> Result<Self, BlockError> {
        if elements.len() > MAX_ACTION_ELEMENTS {
            return Err(BlockError::TooManyElements {
                max: MAX_ACTION_ELEMENTS,
            });
        }
        Ok(Self {
            block_id: generated_block_id(),
            elements,
        })
    }

    pub fn block_id(mut self, id: impl Into<String>) -> Self {
        self.block_id = id.into();
        self
    }

    pub fn push(mut self, element: impl Into<Element>) -> Result<Self, BlockError> {
        if self.elements.len() >= MAX_ACTION_ELEMENTS {
            return Err(BlockError::TooManyElements {
                max: MAX_ACTION_ELEMENTS,
            });
        }
        self.elements.push(element.into());
        Ok(self)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn render(&self) -> Value {
        json!({
            "type": "actions",
            "block_id": self.block_id,
            "elements": self.elements.iter().map(Element::render).collect::<Vec<_>>(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBlock {
    block_id: String,
    label: Text,
    element: InputElement,
    hint: Option<Text>,
    optional: Option<bool>,
    dispatch_action: Option<bool>,
}

impl InputBlock {
    pub fn new(label: impl Into<String>, element: impl Into<InputElement>) -> Self {
        Self {
            block_id: generated_block_id(),
            label: Text::plain(label),
            element: element.into(),
            hint: None,
            optional: None,
            dispatch_action: None,
        }
    }

    pub fn block_id(mut self, id: impl Into<String>) -> Self {
        self.block_id = id.into();
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(Text::plain(hint));
        self
    }

    pub fn optional(mut self, flag: bool) -> Self {
        self.optional = Some(flag);
        self
    }

    pub fn dispatch_action(mut self, flag: bool) -> Self {
        self.dispatch_action = Some(flag);
        self
    }

    pub fn element(&self) -> &InputElement {
        &self.element
    }

    pub fn render(&self) -> Value {
        let mut node = Map::new();
        node.insert("type".into(), json!("input"));
        node.insert("block_id".into(), json!(self.block_id));
        node.insert("label".into(), self.label.render());
        node.insert("element".into(), self.element.render());
        if let Some(hint) = &self.hint {
            node.insert("hint".into(), hint.render());
        }
        if let Some(optional) = self.optional {
            node.insert("optional".into(), json!(optional));
        }
        if let Some(dispatch) = self.dispatch_action {
            node.insert("dispatch_action".into(), json!(dispatch));
        }
        Value::Object(node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichTextBlock {
    block_id: String,
    elements: Vec<RichTextElement>,
}

impl RichTextBlock {
    pub fn new(elements: Vec<RichTextElement>) -> Self {
        Self {
            block_id: generated_block_id(),
            elements,
        }
    }

    pub fn block_id(mut self, id: impl Into<String>) -> Self {
        self.block_id = id.into();
        self
    }

    pub fn render(&self) -> Value {
        json!({
            "type": "rich_text",
            "block_id": self.block_id,
            "elements": self.elements.iter().map(RichTextElement::render).collect::<Vec<_>>(),
        })
    }
}
