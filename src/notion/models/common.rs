//! Building blocks shared by pages, databases, blocks and comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::tagged::{Tagged, encode, tagged_serde, typed};

/// A Notion user or bot.
///
/// Objects embedded in other objects (`created_by`, ...) often carry only
/// `object` and `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Always `"user"`
    #[serde(default)]
    pub object: String,
    /// User id
    pub id: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// `"person"` or `"bot"`
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Present for people
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<Person>,
    /// Present for bots; shape varies by integration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot: Option<Map<String, Value>>,
}

/// Person-specific user fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Email address, if the integration may read it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Where a page, database, block or comment lives.
#[derive(Debug, Clone, PartialEq)]
pub enum Parent {
    /// Row of a database
    DatabaseId(String),
    /// Sub-page of a page
    PageId(String),
    /// Child of a block
    BlockId(String),
    /// Top level of the workspace
    Workspace,
    /// A `type` this crate does not model, kept as received
    Unknown {
        /// The `type` discriminant
        kind: String,
        /// The raw type-specific object
        data: Value,
    },
}

impl Tagged for Parent {
    fn from_parts(kind: String, data: Value) -> Self {
        let parsed = match kind.as_str() {
            "database_id" => typed(&data).map(Self::DatabaseId),
            "page_id" => typed(&data).map(Self::PageId),
            "block_id" => typed(&data).map(Self::BlockId),
            "workspace" => Some(Self::Workspace),
            _ => None,
        };
        parsed.unwrap_or(Self::Unknown { kind, data })
    }

    fn to_parts(&self) -> Result<(&str, Value), serde_json::Error> {
        match self {
            Self::DatabaseId(id) => encode("database_id", id),
            Self::PageId(id) => encode("page_id", id),
            Self::BlockId(id) => encode("block_id", id),
            Self::Workspace => Ok(("workspace", Value::Bool(true))),
            Self::Unknown { kind, data } => Ok((kind.as_str(), data.clone())),
        }
    }
}

/// A file hosted outside Notion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalFile {
    /// Public URL
    pub url: String,
}

/// A file hosted by Notion behind an expiring URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedFile {
    /// Signed download URL
    pub url: String,
    /// When the signed URL stops working
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<DateTime<Utc>>,
}

/// Where a file's bytes can be fetched.
#[derive(Debug, Clone, PartialEq)]
pub enum FileSource {
    /// Externally hosted file
    External(ExternalFile),
    /// File hosted by Notion
    File(HostedFile),
    /// A `type` this crate does not model, kept as received
    Unknown {
        /// The `type` discriminant
        kind: String,
        /// The raw type-specific object
        data: Value,
    },
}

impl FileSource {
    /// Download URL, for known sources.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::External(f) => Some(&f.url),
            Self::File(f) => Some(&f.url),
            Self::Unknown { .. } => None,
        }
    }
}

impl Tagged for FileSource {
    fn from_parts(kind: String, data: Value) -> Self {
        let parsed = match kind.as_str() {
            "external" => typed(&data).map(Self::External),
            "file" => typed(&data).map(Self::File),
            _ => None,
        };
        parsed.unwrap_or(Self::Unknown { kind, data })
    }

    fn to_parts(&self) -> Result<(&str, Value), serde_json::Error> {
        match self {
            Self::External(f) => encode("external", f),
            Self::File(f) => encode("file", f),
            Self::Unknown { kind, data } => Ok((kind.as_str(), data.clone())),
        }
    }
}

/// Page or database icon.
#[derive(Debug, Clone, PartialEq)]
pub enum Icon {
    /// Emoji character
    Emoji(String),
    /// Externally hosted image
    External(ExternalFile),
    /// Image hosted by Notion
    File(HostedFile),
    /// A `type` this crate does not model, kept as received
    Unknown {
        /// The `type` discriminant
        kind: String,
        /// The raw type-specific object
        data: Value,
    },
}

impl Tagged for Icon {
    fn from_parts(kind: String, data: Value) -> Self {
        let parsed = match kind.as_str() {
            "emoji" => typed(&data).map(Self::Emoji),
            "external" => typed(&data).map(Self::External),
            "file" => typed(&data).map(Self::File),
            _ => None,
        };
        parsed.unwrap_or(Self::Unknown { kind, data })
    }

    fn to_parts(&self) -> Result<(&str, Value), serde_json::Error> {
        match self {
            Self::Emoji(emoji) => encode("emoji", emoji),
            Self::External(f) => encode("external", f),
            Self::File(f) => encode("file", f),
            Self::Unknown { kind, data } => Ok((kind.as_str(), data.clone())),
        }
    }
}

/// Styling applied to a rich text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Struck-through text
    pub strikethrough: bool,
    /// Underlined text
    pub underline: bool,
    /// Inline code
    pub code: bool,
    /// Text or background color
    pub color: String,
}

impl Default for Annotations {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            strikethrough: false,
            underline: false,
            code: false,
            color: "default".to_string(),
        }
    }
}

/// One run of rich text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    /// Text without styling
    #[serde(default)]
    pub plain_text: String,
    /// Link target, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Styling
    #[serde(default)]
    pub annotations: Annotations,
    /// Type-specific content, keyed by `type`
    #[serde(flatten)]
    pub content: RichTextContent,
}

impl RichText {
    /// Text of the run: `plain_text` when present, otherwise the text content.
    #[must_use]
    pub fn text(&self) -> &str {
        match (&self.content, self.plain_text.is_empty()) {
            (RichTextContent::Text(text), true) => &text.content,
            _ => &self.plain_text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    /// The text itself
    pub content: String,
    /// Inline link, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Link target
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equation {
    /// KaTeX expression
    pub expression: String,
}

/// What a rich text run contains.
#[derive(Debug, Clone, PartialEq)]
pub enum RichTextContent {
    /// Plain or linked text
    Text(TextContent),
    /// Mentions come in many sub-types; kept as raw JSON.
    Mention(Map<String, Value>),
    /// Inline equation
    Equation(Equation),
    /// A `type` this crate does not model, kept as received
    Unknown {
        /// The `type` discriminant
        kind: String,
        /// The raw type-specific object
        data: Value,
    },
}

impl Tagged for RichTextContent {
    fn from_parts(kind: String, data: Value) -> Self {
        let parsed = match kind.as_str() {
            "text" => typed(&data).map(Self::Text),
            "mention" => typed(&data).map(Self::Mention),
            "equation" => typed(&data).map(Self::Equation),
            _ => None,
        };
        parsed.unwrap_or(Self::Unknown { kind, data })
    }

    fn to_parts(&self) -> Result<(&str, Value), serde_json::Error> {
        match self {
            Self::Text(t) => encode("text", t),
            Self::Mention(m) => encode("mention", m),
            Self::Equation(e) => encode("equation", e),
            Self::Unknown { kind, data } => Ok((kind.as_str(), data.clone())),
        }
    }
}

tagged_serde!(Parent, FileSource, Icon, RichTextContent);
