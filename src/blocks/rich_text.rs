use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub strike: bool,
    pub code: bool,
}

impl TextStyle {
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    fn render(&self) -> Value {
        json!({
            "bold": self.bold,
            "italic": self.italic,
            "strike": self.strike,
            "code": self.code,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RichTextComponent {
    Text {
        text: String,
        style: Option<TextStyle>,
    },
    Link {
        url: String,
        text: Option<String>,
        style: Option<TextStyle>,
    },
    User {
        user_id: String,
    },
    UserGroup {
        usergroup_id: String,
    },
    Channel {
        channel_id: String,
    },
    Emoji {
        name: String,
    },
}

impl RichTextComponent {
    pub fn text(text: impl Into<String>) -> Self {
        RichTextComponent::Text {
            text: text.into(),
            style: None,
        }
    }

    pub fn user(user_id: impl Into<String>) -> Self {
        RichTextComponent::User {
            user_id: user_id.into(),
        }
    }

    pub fn render(&self) -> Value {
        match self {
            RichTextComponent::Text { text, style } => {
                let mut node = Map::new();
                node.insert("type".into(), json!("text"));
                node.insert("text".into(), json!(text));
                if let Some(style) = style {
                    node.insert("style".into(), style.render());
                }
                Value::Object(node)
            }
            RichTextComponent::Link { url, text, style } => {
                let mut node = Map::new();
                node.insert("type".into(), json!("link"));
                node.insert("url".into(), json!(url));
                if let Some(text) = text {
                    node.insert("text".into(), json!(text));
                }
                if let Some(style) = style {
                    node.insert("style".into(), style.render());
                }
                Value::Object(node)
            }
            RichTextComponent::User { user_id } => json!({"type": "user", "user_id": user_id}),
            RichTextComponent::UserGroup { usergroup_id } => {
                json!({"type": "usergroup", "usergroup_id": usergroup_id})
            }
            RichTextComponent::Channel { channel_id } => {
                json!({"type": "channel", "channel_id": channel_id})
            }
            RichTextComponent::Emoji { name } => json!({"type": "emoji", "name": name}),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichTextSection {
    elements: Vec<RichTextComponent>,
}

impl RichTextSection {
    pub fn new(elements: Vec<RichTextComponent>) -> Self {
        Self { elements }
    }

    pub fn push(mut self, component: RichTextComponent) -> Self {
        self.elements.push(component);
        self
    }

    pub fn render(&self) -> Value {
        json!({
            "type": "rich_text_section",
            "elements": self.elements.iter().map(RichTextComponent::render).collect::<Vec<_>>(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    Bullet,
    Ordered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichTextList {
    style: ListStyle,
    elements: Vec<RichTextSection>,
    indent: Option<u32>,
    border: Option<u32>,
}

impl RichTextList {
    pub fn new(style: ListStyle, elements: Vec<RichTextSection>) -> Self {
        Self {
            style,
            elements,
            indent: None,
            border: None,
        }
    }

    pub fn indent(mut self, indent: u32) -> Self {
        self.indent = Some(indent);
        self
    }

    pub fn border(mut self, border: u32) -> Self {
        self.border = Some(border);
        self
    }

    pub fn render(&self) -> Value {
        let style = match self.style {
            ListStyle::Bullet => "bullet",
            ListStyle::Ordered => "ordered",
        };
        let mut node = Map::new();
        node.insert("type".into(), json!("rich_text_list"));
        node.insert("style".into(), json!(style));
        node.insert(
            "elements".into(),
            Value::Array(self.elements.iter().map(RichTextSection::render).collect()),
        );
        if let Some(indent) = self.indent {
            node.insert("indent".into(), json!(indent));
        }
        if let Some(border) = self.border {
            node.insert("border".into(), json!(border));
        }
        Value::Object(node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RichTextElement {
    Section(RichTextSection),
    List(RichTextList),
}

impl RichTextElement {
    pub fn render(&self) -> Value {
        match self {
            RichTextElement::Section(section) => section.render(),
            RichTextElement::List(list) => list.render(),
        }
    }
}

impl From<RichTextSection> for RichTextElement {
    fn from(section: RichTextSection) -> Self {
        RichTextElement::Section(section)
    }
}

impl From<RichTextList> for RichTextElement {
    fn from(list: RichTextList) -> Self {
        RichTextElement::List(list)
    }
}
