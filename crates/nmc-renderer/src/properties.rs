//! Page property extraction and normalization.
//!
//! Remote property values come in many shapes. [`NormalizedValue`] reduces
//! them to the handful of forms frontmatter and tables need, and
//! [`parse_page_properties`] pulls out the metadata every rendered page
//! requires.

use std::collections::BTreeMap;
use std::fmt;

use nmc_config::DatabaseConfig;
use nmc_notion::{DateValue, Page, PropertyValue};
use serde::{Serialize, Serializer};

use crate::degraded::report_unsupported;
use crate::error::RenderError;
use crate::rich_text::render_rich_text;
use crate::slug::slugify;

/// Name of the property read as the ordering hint.
const ORDER_PROPERTY: &str = "order";

/// Largest integer an `f64` represents exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Property value reduced to a plain form.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValue {
    Null,
    Number(f64),
    Text(String),
    List(Vec<String>),
    Date(DateValue),
}

impl NormalizedValue {
    /// Normalize a remote value. Unsupported types become a marker text
    /// and log a warning.
    #[must_use]
    pub fn from_property(value: &PropertyValue) -> Self {
        match value {
            PropertyValue::Number(n) => n.map_or(Self::Null, Self::Number),
            PropertyValue::Title(runs) | PropertyValue::RichText(runs) => {
                Self::Text(render_rich_text(runs))
            }
            PropertyValue::Select(option) => option
                .as_ref()
                .map_or(Self::Null, |o| Self::Text(o.name.clone())),
            PropertyValue::MultiSelect(options) => {
                Self::List(options.iter().map(|o| o.name.clone()).collect())
            }
            PropertyValue::Date(date) => date.clone().map_or(Self::Null, Self::Date),
            PropertyValue::Relation(relations) => {
                Self::List(relations.iter().map(|r| r.id.clone()).collect())
            }
            PropertyValue::Url(s) | PropertyValue::Email(s) | PropertyValue::PhoneNumber(s) => {
                s.clone().map_or(Self::Null, Self::Text)
            }
            PropertyValue::CreatedTime(ts) | PropertyValue::LastEditedTime(ts) => {
                Self::Text(ts.clone())
            }
            PropertyValue::CreatedBy(user) | PropertyValue::LastEditedBy(user) => {
                user.name.clone().map_or(Self::Null, Self::Text)
            }
            PropertyValue::Unsupported { kind, payload } => Self::Text(report_unsupported(
                format!("unsupported property type: {kind}"),
                payload,
            )),
        }
    }

    /// Value usable as a required text field: non-empty text, or a number
    /// in display form.
    fn as_label(&self) -> Option<String> {
        match self {
            Self::Text(s) if !s.is_empty() => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for NormalizedValue {
    /// Single-line display form used in table cells.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
            Self::Date(date) => match &date.end {
                Some(end) => write!(f, "{} → {end}", date.start),
                None => f.write_str(&date.start),
            },
        }
    }
}

impl Serialize for NormalizedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Number(n) => serialize_number(*n, serializer),
            Self::Text(s) => serializer.serialize_str(s),
            Self::List(items) => serializer.collect_seq(items),
            Self::Date(date) => date.serialize(serializer),
        }
    }
}

/// Whole numbers serialize as integers (`3`, not `3.0`).
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn serialize_number<S: Serializer>(n: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INT {
        serializer.serialize_i64(n as i64)
    } else {
        serializer.serialize_f64(n)
    }
}

/// Identity and required metadata of a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMeta {
    pub id: String,
    pub url: String,
    pub title: String,
    pub category: String,
    pub order: Option<f64>,
}

/// Validated properties of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageProperties {
    pub meta: PageMeta,
    /// Slug to normalized value, for every included property.
    pub values: BTreeMap<String, NormalizedValue>,
    /// Original property name to slug, in output order.
    pub keys: Vec<(String, String)>,
}

impl PageProperties {
    /// Included values in key order, keyed by slug.
    pub fn ordered_values(&self) -> impl Iterator<Item = (&str, &NormalizedValue)> {
        self.keys
            .iter()
            .filter_map(|(_, slug)| self.values.get(slug).map(|v| (slug.as_str(), v)))
    }
}

/// Result of folding over a page's properties, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedProperties {
    pub title: Option<String>,
    pub category: Option<String>,
    pub order: Option<f64>,
    pub values: BTreeMap<String, NormalizedValue>,
    pub keys: Vec<(String, String)>,
}

/// Normalize every property of `page` and pick out title, category and order.
///
/// With an include list only the listed properties are kept, ordered as
/// listed; names the page does not have are skipped. Without one all
/// properties are kept in page order.
#[must_use]
pub fn parse_properties(page: &Page, config: &DatabaseConfig) -> ParsedProperties {
    let include = config.properties.include.as_deref();
    let mut parsed = ParsedProperties::default();

    for (name, value) in &page.properties {
        let normalized = NormalizedValue::from_property(value);

        if matches!(value, PropertyValue::Title(_)) {
            parsed.title = normalized.as_label();
        }
        if *name == config.properties.category {
            parsed.category = normalized.as_label();
        }
        if name == ORDER_PROPERTY {
            parsed.order = normalized.as_number();
        }

        if include.is_none_or(|names| names.contains(name)) {
            let slug = slugify(name);
            parsed.keys.push((name.clone(), slug.clone()));
            parsed.values.insert(slug, normalized);
        }
    }

    if let Some(names) = include {
        parsed.keys = names
            .iter()
            .filter_map(|wanted| parsed.keys.iter().find(|(name, _)| name == wanted).cloned())
            .collect();
    }

    parsed
}

/// Parse and validate the properties of `page`.
///
/// # Errors
///
/// Returns [`RenderError::MissingProperty`] when the page has no title or
/// no value for the configured category property.
pub fn parse_page_properties(
    page: &Page,
    config: &DatabaseConfig,
) -> Result<PageProperties, RenderError> {
    let parsed = parse_properties(page, config);

    let title = parsed
        .title
        .ok_or_else(|| RenderError::missing_title(&page.url))?;
    let category = parsed
        .category
        .ok_or_else(|| RenderError::MissingProperty {
            url: page.url.clone(),
            property: config.properties.category.clone(),
        })?;

    Ok(PageProperties {
        meta: PageMeta {
            id: page.id.clone(),
            url: page.url.clone(),
            title,
            category,
            order: parsed.order,
        },
        values: parsed.values,
        keys: parsed.keys,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{capture_warnings, number, rich_text, select, title};
    use nmc_notion::{Relation, SelectOption, User};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn config() -> DatabaseConfig {
        DatabaseConfig::new("Category")
    }

    fn page() -> Page {
        Page::new("p1", "https://notion.so/p1")
            .with_property("Name", title("Getting Started"))
            .with_property("Category", select("Guides"))
            .with_property("order", number(2.0))
    }

    #[test]
    fn test_normalize_values() {
        let cases = [
            (number(1.5), NormalizedValue::Number(1.5)),
            (PropertyValue::Number(None), NormalizedValue::Null),
            (rich_text("hi"), NormalizedValue::Text("hi".to_owned())),
            (PropertyValue::Select(None), NormalizedValue::Null),
            (
                PropertyValue::MultiSelect(vec![SelectOption::named("a"), SelectOption::named("b")]),
                NormalizedValue::List(vec!["a".to_owned(), "b".to_owned()]),
            ),
            (
                PropertyValue::Relation(vec![Relation { id: "r1".to_owned() }]),
                NormalizedValue::List(vec!["r1".to_owned()]),
            ),
            (
                PropertyValue::Url(Some("https://x".to_owned())),
                NormalizedValue::Text("https://x".to_owned()),
            ),
            (
                PropertyValue::CreatedTime("2024-01-01T00:00:00.000Z".to_owned()),
                NormalizedValue::Text("2024-01-01T00:00:00.000Z".to_owned()),
            ),
            (
                PropertyValue::LastEditedBy(User {
                    id: "u1".to_owned(),
                    name: Some("Ada".to_owned()),
                }),
                NormalizedValue::Text("Ada".to_owned()),
            ),
        ];
        for (value, expected) in cases {
            assert_eq!(NormalizedValue::from_property(&value), expected);
        }
    }

    #[test]
    fn test_unsupported_property_marker_and_warning() {
        let value = PropertyValue::Unsupported {
            kind: "checkbox".to_owned(),
            payload: json!({ "type": "checkbox", "checkbox": true }),
        };
        let (normalized, warnings) = capture_warnings(|| NormalizedValue::from_property(&value));
        assert_eq!(
            normalized,
            NormalizedValue::Text("unsupported property type: checkbox".to_owned())
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "unsupported property type: checkbox");
        let payload = warnings[0].payload.as_deref().unwrap();
        assert!(payload.contains("Bool(true)"), "{payload}");
    }

    #[test]
    fn test_parse_page_properties() {
        let props = parse_page_properties(&page(), &config()).unwrap();
        assert_eq!(
            props.meta,
            PageMeta {
                id: "p1".to_owned(),
                url: "https://notion.so/p1".to_owned(),
                title: "Getting Started".to_owned(),
                category: "Guides".to_owned(),
                order: Some(2.0),
            }
        );
        assert_eq!(
            props.keys,
            vec![
                ("Name".to_owned(), "name".to_owned()),
                ("Category".to_owned(), "category".to_owned()),
                ("order".to_owned(), "order".to_owned()),
            ]
        );
    }

    #[test]
    fn test_include_list_orders_keys() {
        let page = Page::new("p1", "u")
            .with_property("A", rich_text("a"))
            .with_property("B", rich_text("b"))
            .with_property("C", rich_text("c"));
        let mut config = config();
        config.properties.include = Some(vec!["B".to_owned(), "A".to_owned()]);

        let parsed = parse_properties(&page, &config);

        assert_eq!(
            parsed.keys,
            vec![
                ("B".to_owned(), "b".to_owned()),
                ("A".to_owned(), "a".to_owned()),
            ]
        );
        assert!(!parsed.values.contains_key("c"));
    }

    #[test]
    fn test_include_list_skips_absent_names() {
        let mut config = config();
        config.properties.include = Some(vec!["Missing".to_owned(), "Name".to_owned()]);
        let parsed = parse_properties(&page(), &config);
        assert_eq!(parsed.keys, vec![("Name".to_owned(), "name".to_owned())]);
    }

    #[test]
    fn test_title_and_category_tracked_when_not_included() {
        let mut config = config();
        config.properties.include = Some(Vec::new());
        let props = parse_page_properties(&page(), &config).unwrap();
        assert_eq!(props.meta.title, "Getting Started");
        assert_eq!(props.meta.category, "Guides");
        assert!(props.keys.is_empty());
    }

    #[test]
    fn test_missing_title_is_fatal() {
        let page = Page::new("p1", "https://notion.so/p1").with_property("Category", select("Guides"));
        let err = parse_page_properties(&page, &config()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Page https://notion.so/p1 is missing required property of type 'title'"
        );
    }

    #[test]
    fn test_missing_category_is_fatal() {
        let page = Page::new("p1", "https://notion.so/p1")
            .with_property("Name", title("T"))
            .with_property("Category", PropertyValue::Select(None));
        let err = parse_page_properties(&page, &config()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Page https://notion.so/p1 is missing required property Category"
        );
    }

    #[test]
    fn test_non_numeric_order_ignored() {
        let page = page().with_property("order", rich_text("first"));
        let props = parse_page_properties(&page, &config()).unwrap();
        assert_eq!(props.meta.order, None);
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(NormalizedValue::Number(3.0).to_string(), "3");
        assert_eq!(NormalizedValue::Null.to_string(), "");
        assert_eq!(
            NormalizedValue::Date(DateValue {
                start: "2024-01-01".to_owned(),
                end: Some("2024-01-03".to_owned()),
                time_zone: None,
            })
            .to_string(),
            "2024-01-01 → 2024-01-03"
        );
    }

    #[test]
    fn test_serialize_whole_numbers_as_integers() {
        let yaml = serde_yaml::to_string(&vec![
            NormalizedValue::Number(3.0),
            NormalizedValue::Number(2.5),
            NormalizedValue::Null,
        ])
        .unwrap();
        assert_eq!(yaml, "- 3\n- 2.5\n- null\n");
    }
}
