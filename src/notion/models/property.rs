//! Page property values, property items and database property schemas.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{FileSource, RichText, User};
use super::tagged::{Tagged, encode, tagged_serde, typed};

/// An option of a select or multi-select property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Option id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Option name
    pub name: String,
    /// Option color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Value of a date property. Bounds are kept as sent (date or date-time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Start date or datetime (ISO 8601)
    pub start: String,
    /// End date or datetime
    #[serde(default)]
    pub end: Option<String>,
    /// Time zone name
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// A file attached to a `files` property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    /// File name
    pub name: String,
    /// Where the file lives
    #[serde(flatten)]
    pub source: FileSource,
}

/// Reference to a related page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReference {
    /// Id of the referenced page
    pub id: String,
}

/// The typed value of a page property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyData {
    /// `title`
    Title(Vec<RichText>),
    /// `rich_text`
    RichText(Vec<RichText>),
    /// `number`
    Number(Option<f64>),
    /// `select`
    Select(Option<SelectOption>),
    /// `multi_select`
    MultiSelect(Vec<SelectOption>),
    /// `date`
    Date(Option<DateRange>),
    /// `checkbox`
    Checkbox(bool),
    /// `url`
    Url(Option<String>),
    /// `email`
    Email(Option<String>),
    /// `people`
    People(Vec<User>),
    /// `relation`
    Relation(Vec<PageReference>),
    /// `files`
    Files(Vec<File>),
    /// A `type` this crate does not model, kept as received
    Unknown {
        /// The `type` discriminant
        kind: String,
        /// The raw type-specific object
        data: Value,
    },
}

impl PropertyData {
    /// The `type` discriminant.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Title(_) => "title",
            Self::RichText(_) => "rich_text",
            Self::Number(_) => "number",
            Self::Select(_) => "select",
            Self::MultiSelect(_) => "multi_select",
            Self::Date(_) => "date",
            Self::Checkbox(_) => "checkbox",
            Self::Url(_) => "url",
            Self::Email(_) => "email",
            Self::People(_) => "people",
            Self::Relation(_) => "relation",
            Self::Files(_) => "files",
            Self::Unknown { kind, .. } => kind.as_str(),
        }
    }

    /// Concatenated plain text of title and rich text values.
    #[must_use]
    pub fn plain_text(&self) -> Option<String> {
        match self {
            Self::Title(runs) | Self::RichText(runs) => {
                Some(runs.iter().map(RichText::text).collect())
            }
            _ => None,
        }
    }
}

impl Tagged for PropertyData {
    fn from_parts(kind: String, data: Value) -> Self {
        let parsed = match kind.as_str() {
            "title" => typed(&data).map(Self::Title),
            "rich_text" => typed(&data).map(Self::RichText),
            "number" => typed(&data).map(Self::Number),
            "select" => typed(&data).map(Self::Select),
            "multi_select" => typed(&data).map(Self::MultiSelect),
            "date" => typed(&data).map(Self::Date),
            "checkbox" => typed(&data).map(Self::Checkbox),
            "url" => typed(&data).map(Self::Url),
            "email" => typed(&data).map(Self::Email),
            "people" => typed(&data).map(Self::People),
            "relation" => typed(&data).map(Self::Relation),
            "files" => typed(&data).map(Self::Files),
            _ => None,
        };
        parsed.unwrap_or(Self::Unknown { kind, data })
    }

    fn to_parts(&self) -> Result<(&str, Value), serde_json::Error> {
        match self {
            Self::Title(v) | Self::RichText(v) => encode(self.kind(), v),
            Self::Number(v) => encode("number", v),
            Self::Select(v) => encode("select", v),
            Self::MultiSelect(v) => encode("multi_select", v),
            Self::Date(v) => encode("date", v),
            Self::Checkbox(v) => encode("checkbox", v),
            Self::Url(v) | Self::Email(v) => encode(self.kind(), v),
            Self::People(v) => encode("people", v),
            Self::Relation(v) => encode("relation", v),
            Self::Files(v) => encode("files", v),
            Self::Unknown { kind, data } => Ok((kind.as_str(), data.clone())),
        }
    }
}

tagged_serde!(PropertyData);

/// A property value as embedded in a page's `properties` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    /// Property id
    #[serde(default)]
    pub id: String,
    /// Value, keyed by `type`
    #[serde(flatten)]
    pub data: PropertyData,
}

/// Response of the page property endpoint.
///
/// Single-valued properties come back as one item. Title, rich text,
/// people and relation properties come back as a paginated list
/// (`object == "list"`) whose `results` hold one item per element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyItem {
    /// `"property_item"` or `"list"` for paginated items
    pub object: String,
    /// Property id
    #[serde(default)]
    pub id: String,
    /// Items of a paginated property
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<PropertyItem>,
    /// Cursor of the next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    /// True if more items follow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_more: Option<bool>,
    /// Value, keyed by `type`
    #[serde(flatten)]
    pub value: PropertyData,
}

impl PropertyItem {
    /// Files of a `files` property item.
    #[must_use]
    pub fn files(&self) -> Option<&[File]> {
        match &self.value {
            PropertyData::Files(files) => Some(files),
            _ => None,
        }
    }
}

/// A column definition in a database schema.
///
/// Configuration differs per type and is kept as raw JSON under the type's
/// key (e.g. `{"select": {"options": [...]}}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    /// Property id
    #[serde(default)]
    pub id: String,
    /// Property name
    #[serde(default)]
    pub name: String,
    /// Property type, e.g. `select`
    #[serde(rename = "type")]
    pub kind: String,
    /// Type-specific configuration
    #[serde(flatten)]
    pub config: Map<String, Value>,
}
