//! Database rows, their property values, and list responses.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::{RichText, raw_payload, take_payload};

/// A Notion page, as returned when querying a database.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub url: String,
    /// Properties in the order Notion sent them.
    #[serde(deserialize_with = "ordered_properties")]
    pub properties: Vec<(String, PropertyValue)>,
}

impl Page {
    /// Create a page without properties.
    #[must_use]
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            properties: Vec::new(),
        }
    }

    /// Append a property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.push((name.into(), value));
        self
    }
}

/// Database descriptor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Database {
    pub id: String,
    #[serde(default)]
    pub title: Vec<RichText>,
}

/// One page of a paginated list response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct List<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Response of a database query.
pub type QueryResult = List<Page>;

impl<T> List<T> {
    /// Whether more results exist beyond this page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more || self.next_cursor.is_some()
    }
}

/// A typed property value of a page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawProperty")]
pub enum PropertyValue {
    Number(Option<f64>),
    Title(Vec<RichText>),
    RichText(Vec<RichText>),
    Select(Option<SelectOption>),
    MultiSelect(Vec<SelectOption>),
    Date(Option<DateValue>),
    Relation(Vec<Relation>),
    Url(Option<String>),
    Email(Option<String>),
    PhoneNumber(Option<String>),
    CreatedTime(String),
    LastEditedTime(String),
    CreatedBy(User),
    LastEditedBy(User),
    /// Formula, rollup, people, files, checkbox, and any unknown type.
    Unsupported {
        kind: String,
        payload: Value,
    },
}

impl PropertyValue {
    /// The `type` tag of this value.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Number(_) => "number",
            Self::Title(_) => "title",
            Self::RichText(_) => "rich_text",
            Self::Select(_) => "select",
            Self::MultiSelect(_) => "multi_select",
            Self::Date(_) => "date",
            Self::Relation(_) => "relation",
            Self::Url(_) => "url",
            Self::Email(_) => "email",
            Self::PhoneNumber(_) => "phone_number",
            Self::CreatedTime(_) => "created_time",
            Self::LastEditedTime(_) => "last_edited_time",
            Self::CreatedBy(_) => "created_by",
            Self::LastEditedBy(_) => "last_edited_by",
            Self::Unsupported { kind, .. } => kind,
        }
    }
}

/// Option of a select or multi-select property.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

impl SelectOption {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// Date or date range.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DateValue {
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// Reference to another page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Relation {
    pub id: String,
}

/// Partial user object attached to created/edited-by properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    /// Display name; absent on partial user objects.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Deserialize)]
struct RawProperty {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl TryFrom<RawProperty> for PropertyValue {
    type Error = serde_json::Error;

    fn try_from(raw: RawProperty) -> Result<Self, Self::Error> {
        let RawProperty { kind, mut fields } = raw;
        let f = &mut fields;
        let value = match kind.as_str() {
            "number" => Self::Number(take_payload(f, &kind)?),
            "title" => Self::Title(take_payload(f, &kind)?),
            "rich_text" => Self::RichText(take_payload(f, &kind)?),
            "select" => Self::Select(take_payload(f, &kind)?),
            "multi_select" => Self::MultiSelect(take_payload(f, &kind)?),
            "date" => Self::Date(take_payload(f, &kind)?),
            "relation" => Self::Relation(take_payload(f, &kind)?),
            "url" => Self::Url(take_payload(f, &kind)?),
            "email" => Self::Email(take_payload(f, &kind)?),
            "phone_number" => Self::PhoneNumber(take_payload(f, &kind)?),
            "created_time" => Self::CreatedTime(take_payload(f, &kind)?),
            "last_edited_time" => Self::LastEditedTime(take_payload(f, &kind)?),
            "created_by" => Self::CreatedBy(take_payload(f, &kind)?),
            "last_edited_by" => Self::LastEditedBy(take_payload(f, &kind)?),
            _ => Self::Unsupported {
                payload: raw_payload(&kind, fields),
                kind,
            },
        };
        Ok(value)
    }
}

/// Deserialize the `properties` object keeping the wire order of its keys.
fn ordered_properties<'de, D>(deserializer: D) -> Result<Vec<(String, PropertyValue)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedVisitor;

    impl<'de> Visitor<'de> for OrderedVisitor {
        type Value = Vec<(String, PropertyValue)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of page properties")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut properties = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry()? {
                properties.push(entry);
            }
            Ok(properties)
        }
    }

    deserializer.deserialize_map(OrderedVisitor)
}
