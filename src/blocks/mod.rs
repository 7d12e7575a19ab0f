//! Block Kit message documents.
//!
//! Every node validates its Slack limits when it is built, so a [`Document`] that exists is always
//! renderable. `render()` is pure and omits optional fields that were never set.

pub mod elements;
pub mod layout;
pub mod rich_text;
pub mod text;

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};
use thiserror::Error;

pub use elements::{Button, ButtonStyle, Element, InputElement, PlainTextInput, RadioButtons};
pub use layout::{ActionGroup, DividerBlock, HeaderBlock, InputBlock, RichTextBlock, SectionBlock};
pub use rich_text::{RichTextComponent, RichTextElement, RichTextList, RichTextSection};
pub use text::{ConfirmationDialog, DispatchActionConfig, DispatchTrigger, OptionObject, Text};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("header text is {len} characters, limit is {max}")]
    HeaderTooLong { len: usize, max: usize },
    #[error("section text is {len} characters, limit is {max}")]
    SectionTextTooLong { len: usize, max: usize },
    #[error("a section holds at most {max} fields")]
    TooManyFields { max: usize },
    #[error("an action group holds at most {max} elements")]
    TooManyElements { max: usize },
    #[error("radio buttons hold at most {max} options")]
    TooManyOptions { max: usize },
    #[error("initial option {value:?} is not one of the radio options")]
    UnknownInitialOption { value: String },
    #[error("max_length {requested} exceeds the limit of {max}")]
    MaxLengthTooLarge { requested: u32, max: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Header(HeaderBlock),
    Divider(DividerBlock),
    Section(SectionBlock),
    Actions(ActionGroup),
    Input(InputBlock),
    RichText(RichTextBlock),
}

impl Block {
    pub fn render(&self) -> Value {
        match self {
            Block::Header(block) => block.render(),
            Block::Divider(block) => block.render(),
            Block::Section(block) => block.render(),
            Block::Actions(block) => block.render(),
            Block::Input(block) => block.render(),
            Block::RichText(block) => block.render(),
        }
    }
}

impl From<HeaderBlock> for Block {
    fn from(block: HeaderBlock) -> Self {
        Block::Header(block)
    }
}

impl From<DividerBlock> for Block {
    fn from(block: DividerBlock) -> Self {
        Block::Divider(block)
    }
}

impl From<SectionBlock> for Block {
    fn from(block: SectionBlock) -> Self {
        Block::Section(block)
    }
}

impl From<ActionGroup> for Block {
    fn from(block: ActionGroup) -> Self {
        Block::Actions(block)
    }
}

impl From<InputBlock> for Block {
    fn from(block: InputBlock) -> Self {
        Block::Input(block)
    }
}

impl From<RichTextBlock> for Block {
    fn from(block: RichTextBlock) -> Self {
        Block::RichText(block)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    Ephemeral,
    InChannel,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Ephemeral => "ephemeral",
            ResponseType::InChannel => "in_channel",
        }
    }
}

/// The top-level reply sent to a `response_url`, returned from a slash command, or posted
/// through `chat.postMessage`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    text: Option<String>,
    blocks: Vec<Block>,
    replace_original: Option<bool>,
    delete_original: Option<bool>,
    response_type: Option<ResponseType>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new().text(text)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn block(mut self, block: impl Into<Block>) -> Self {
        self.blocks.push(block.into());
        self
    }

    pub fn blocks(mut self, blocks: impl IntoIterator<Item = Block>) -> Self {
        self.blocks.extend(blocks);
        self
    }

    pub fn replace_original(mut self, flag: bool) -> Self {
        self.replace_original = Some(flag);
        self
    }

    pub fn delete_original(mut self, flag: bool) -> Self {
        self.delete_original = Some(flag);
        self
    }

    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    pub fn fallback_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn block_list(&self) -> &[Block] {
        &self.blocks
    }

    /// `blocks` is always present, possibly empty; every other key appears only when set.
    pub fn render(&self) -> Value {
        let mut node = Map::new();
        if let Some(text) = &self.text {
            node.insert("text".into(), json!(text));
        }
        node.insert(
            "blocks".into(),
            Value::Array(self.blocks.iter().map(Block::render).collect()),
        );
        if let Some(replace) = self.replace_original {
            node.insert("replace_original".into(), json!(replace));
        }
        if let Some(delete) = self.delete_original {
            node.insert("delete_original".into(), json!(delete));
        }
        if let Some(response_type) = self.response_type {
            node.insert("response_type".into(), json!(response_type.as_str()));
        }
        Value::Object(node)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.render().serialize(serializer)
    }
}
