//! Blocks, the content units of pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{FileSource, Parent, RichText, User};
use super::tagged::{Tagged, encode, tagged_serde, typed};

/// A block object.
///
/// Only `id` and the `type` discriminant are required; everything else is
/// optional because partial objects are common in list responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Always `"block"`
    #[serde(default = "block_object")]
    pub object: String,
    /// Block id
    pub id: String,
    /// Parent page, block or database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Parent>,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,
    /// Last edit timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_time: Option<DateTime<Utc>>,
    /// Creator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<User>,
    /// Last editor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_by: Option<User>,
    /// True if the block has nested children
    #[serde(default)]
    pub has_children: bool,
    /// True if the block is in the trash
    #[serde(default)]
    pub archived: bool,
    /// Type-specific content, keyed by `type`
    #[serde(flatten)]
    pub content: BlockContent,
}

fn block_object() -> String {
    "block".to_string()
}

impl Block {
    /// The `type` discriminant, e.g. `"paragraph"`.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.content.kind()
    }
}

/// Shared shape of text-bearing blocks (paragraphs, headings, list items...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Text content
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    /// Display color
    #[serde(default = "default_color")]
    pub color: String,
    /// Type-specific extras such as `is_toggleable` on headings
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_color() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToDoBlock {
    /// Text content
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    /// Checkbox state
    #[serde(default)]
    pub checked: bool,
    /// Display color
    #[serde(default = "default_color")]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Source code
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    /// Caption below the code
    #[serde(default)]
    pub caption: Vec<RichText>,
    /// Highlighting language
    #[serde(default)]
    pub language: String,
}

/// `child_page` and `child_database` blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildBlock {
    /// Title of the child page or database
    pub title: String,
}

/// Image, video, file and PDF blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileBlock {
    /// Where the file lives
    #[serde(flatten)]
    pub source: FileSource,
    /// Caption below the file
    #[serde(default)]
    pub caption: Vec<RichText>,
    /// Original file name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Bookmark and embed blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkBlock {
    /// Target URL
    pub url: String,
    /// Caption below the link
    #[serde(default)]
    pub caption: Vec<RichText>,
}

/// Type-specific block content.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    /// `paragraph`
    Paragraph(TextBlock),
    /// `heading_1`
    Heading1(TextBlock),
    /// `heading_2`
    Heading2(TextBlock),
    /// `heading_3`
    Heading3(TextBlock),
    /// `bulleted_list_item`
    BulletedListItem(TextBlock),
    /// `numbered_list_item`
    NumberedListItem(TextBlock),
    /// `quote`
    Quote(TextBlock),
    /// `toggle`
    Toggle(TextBlock),
    /// `to_do`
    ToDo(ToDoBlock),
    /// `code`
    Code(CodeBlock),
    /// `child_page`
    ChildPage(ChildBlock),
    /// `child_database`
    ChildDatabase(ChildBlock),
    /// `image`
    Image(FileBlock),
    /// `video`
    Video(FileBlock),
    /// `file`
    File(FileBlock),
    /// `pdf`
    Pdf(FileBlock),
    /// `bookmark`
    Bookmark(LinkBlock),
    /// `embed`
    Embed(LinkBlock),
    /// `divider`
    Divider,
    /// Any block type not listed above, with its raw data.
    Unknown { kind: String, data: Value },
}

impl BlockContent {
    /// The `type` discriminant of this content.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Paragraph(_) => "paragraph",
            Self::Heading1(_) => "heading_1",
            Self::Heading2(_) => "heading_2",
            Self::Heading3(_) => "heading_3",
            Self::BulletedListItem(_) => "bulleted_list_item",
            Self::NumberedListItem(_) => "numbered_list_item",
            Self::Quote(_) => "quote",
            Self::Toggle(_) => "toggle",
            Self::ToDo(_) => "to_do",
            Self::Code(_) => "code",
            Self::ChildPage(_) => "child_page",
            Self::ChildDatabase(_) => "child_database",
            Self::Image(_) => "image",
            Self::Video(_) => "video",
            Self::File(_) => "file",
            Self::Pdf(_) => "pdf",
            Self::Bookmark(_) => "bookmark",
            Self::Embed(_) => "embed",
            Self::Divider => "divider",
            Self::Unknown { kind, .. } => kind.as_str(),
        }
    }

    /// Rich text of text-bearing blocks.
    #[must_use]
    pub fn rich_text(&self) -> Option<&[RichText]> {
        match self {
            Self::Paragraph(b)
            | Self::Heading1(b)
            | Self::Heading2(b)
            | Self::Heading3(b)
            | Self::BulletedListItem(b)
            | Self::NumberedListItem(b)
            | Self::Quote(b)
            | Self::Toggle(b) => Some(&b.rich_text),
            Self::ToDo(b) => Some(&b.rich_text),
            Self::Code(b) => Some(&b.rich_text),
            _ => None,
        }
    }
}

impl Tagged for BlockContent {
    fn from_parts(kind: String, data: Value) -> Self {
        let parsed = match kind.as_str() {
            "paragraph" => typed(&data).map(Self::Paragraph),
            "heading_1" => typed(&data).map(Self::Heading1),
            "heading_2" => typed(&data).map(Self::Heading2),
            "heading_3" => typed(&data).map(Self::Heading3),
            "bulleted_list_item" => typed(&data).map(Self::BulletedListItem),
            "numbered_list_item" => typed(&data).map(Self::NumberedListItem),
            "quote" => typed(&data).map(Self::Quote),
            "toggle" => typed(&data).map(Self::Toggle),
            "to_do" => typed(&data).map(Self::ToDo),
            "code" => typed(&data).map(Self::Code),
            "child_page" => typed(&data).map(Self::ChildPage),
            "child_database" => typed(&data).map(Self::ChildDatabase),
            "image" => typed(&data).map(Self::Image),
            "video" => typed(&data).map(Self::Video),
            "file" => typed(&data).map(Self::File),
            "pdf" => typed(&data).map(Self::Pdf),
            "bookmark" => typed(&data).map(Self::Bookmark),
            "embed" => typed(&data).map(Self::Embed),
            "divider" if data.as_object().is_some_and(Map::is_empty) => Some(Self::Divider),
            _ => None,
        };
        parsed.unwrap_or(Self::Unknown { kind, data })
    }

    fn to_parts(&self) -> Result<(&str, Value), serde_json::Error> {
        match self {
            Self::Paragraph(b)
            | Self::Heading1(b)
            | Self::Heading2(b)
            | Self::Heading3(b)
            | Self::BulletedListItem(b)
            | Self::NumberedListItem(b)
            | Self::Quote(b)
            | Self::Toggle(b) => encode(self.kind(), b),
            Self::ToDo(b) => encode("to_do", b),
            Self::Code(b) => encode("code", b),
            Self::ChildPage(b) | Self::ChildDatabase(b) => encode(self.kind(), b),
            Self::Image(b) | Self::Video(b) | Self::File(b) | Self::Pdf(b) => {
                encode(self.kind(), b)
            }
            Self::Bookmark(b) | Self::Embed(b) => encode(self.kind(), b),
            Self::Divider => Ok(("divider", Value::Object(Map::new()))),
            Self::Unknown { kind, data } => Ok((kind.as_str(), data.clone())),
        }
    }
}

tagged_serde!(BlockContent);
