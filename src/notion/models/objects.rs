//! Top-level provider objects and list envelopes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{FileSource, Icon, Parent, RichText, User};
use super::property::{PropertySchema, PropertyValue};

/// A Notion page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Always `"page"`
    pub object: String,
    /// Page id
    pub id: String,
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
    /// Cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<FileSource>,
    /// Page icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    /// Where the page lives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Parent>,
    /// True if the page is in the trash
    #[serde(default)]
    pub archived: bool,
    /// Property values keyed by property name
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
    /// Public Notion URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Page {
    /// Plain text of the page's title property, if it has one.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.properties
            .values()
            .find(|p| p.data.kind() == "title")
            .and_then(|p| p.data.plain_text())
    }
}

/// A Notion database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    /// Always `"database"`
    pub object: String,
    /// Database id
    pub id: String,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,
    /// Last edit timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_time: Option<DateTime<Utc>>,
    /// Database title
    #[serde(default)]
    pub title: Vec<RichText>,
    /// Database description
    #[serde(default)]
    pub description: Vec<RichText>,
    /// Property schema keyed by property name
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,
    /// Where the database lives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Parent>,
    /// Database icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    /// Cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<FileSource>,
    /// Public Notion URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// True if the database is in the trash
    #[serde(default)]
    pub archived: bool,
    /// True if the database is shown inline in its parent page
    #[serde(default)]
    pub is_inline: bool,
}

impl Database {
    /// Plain text of the database title.
    #[must_use]
    pub fn title_text(&self) -> String {
        self.title.iter().map(RichText::text).collect()
    }
}

/// A comment on a page or block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Always `"comment"`
    pub object: String,
    /// Comment id
    pub id: String,
    /// Page or block the comment is attached to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Parent>,
    /// Thread the comment belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussion_id: Option<String>,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,
    /// Last edit timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_time: Option<DateTime<Utc>>,
    /// Author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<User>,
    /// Comment text
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

/// One page of a cursor-paginated list.
///
/// Only a single page is fetched per call; follow `next_cursor` to continue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Always `"list"`
    #[serde(default = "list_object")]
    pub object: String,
    /// Items of this page
    pub results: Vec<T>,
    /// Cursor of the next page
    #[serde(default)]
    pub next_cursor: Option<String>,
    /// True if more pages follow
    #[serde(default)]
    pub has_more: bool,
}

fn list_object() -> String {
    "list".to_string()
}
