//! Request bodies for write and query operations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{FileSource, Icon, Parent};

/// Body of `POST databases/{id}/query`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryDatabasePayload {
    /// Filter object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Map<String, Value>>,
    /// Sort criteria, applied in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorts: Option<Vec<Map<String, Value>>>,
    /// Cursor from a previous page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    /// Page size (at most 100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// Body of `POST pages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePagePayload {
    /// Parent database or page
    pub parent: Parent,
    /// Property values keyed by name or id
    pub properties: Map<String, Value>,
    /// Initial content blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Map<String, Value>>>,
    /// Page icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    /// Cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<FileSource>,
}

/// Body of `PATCH pages/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePagePayload {
    /// Property values to change
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Moves the page to or from the trash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    /// New icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    /// New cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<FileSource>,
}

/// Body of `PATCH blocks/{id}/children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppendBlockChildrenPayload {
    /// Blocks to append
    pub children: Vec<Map<String, Value>>,
}

/// Body of `POST comments`.
///
/// Either `parent` (a new discussion on a page) or `discussion_id` (a
/// reply) must be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCommentPayload {
    /// Page to start a new discussion on, e.g. `{"page_id": "..."}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<BTreeMap<String, String>>,
    /// Existing discussion to reply to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussion_id: Option<String>,
    /// Comment text
    pub rich_text: Vec<Map<String, Value>>,
}
