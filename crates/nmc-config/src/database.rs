//! Per-database render configuration.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, SyncConfig, require_non_empty};

/// How the rows of a database are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum RenderAs {
    /// Rows become one inline Markdown table.
    #[default]
    #[serde(rename = "table")]
    Table,
    /// Each row becomes its own page, listed through views.
    #[serde(rename = "pages+views")]
    PagesAndViews,
}

/// Configuration for one Notion database.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Render mode.
    #[serde(default)]
    pub render_as: RenderAs,
    /// Sort order passed to the database query.
    #[serde(default)]
    pub sorts: Vec<DatabaseSort>,
    /// Property selection.
    pub properties: PropertiesConfig,
    /// Static values merged into every page's frontmatter.
    #[serde(default)]
    pub additional_page_frontmatter: serde_json::Map<String, serde_json::Value>,
    /// Sections of the view index (pages+views only).
    #[serde(default)]
    pub views: Vec<ViewConfig>,
}

/// Property selection for a database.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertiesConfig {
    /// Name of the property that holds the page category.
    pub category: String,
    /// Properties to include, in output order. `None` includes all.
    #[serde(default)]
    pub include: Option<Vec<String>>,
}

/// One section of a pages+views index.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    /// Section heading.
    pub title: String,
    /// Only pages in this category are listed. `None` lists all.
    #[serde(default)]
    pub category: Option<String>,
}

/// Sort criterion for a database query, serialized in Notion's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabaseSort {
    /// Property name to sort by.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    /// Page timestamp to sort by.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<SortTimestamp>,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortTimestamp {
    CreatedTime,
    LastEditedTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl DatabaseConfig {
    /// Table-mode configuration reading the category from `category_property`.
    #[must_use]
    pub fn new(category_property: impl Into<String>) -> Self {
        Self {
            render_as: RenderAs::Table,
            sorts: Vec::new(),
            properties: PropertiesConfig {
                category: category_property.into(),
                include: None,
            },
            additional_page_frontmatter: serde_json::Map::new(),
            views: Vec::new(),
        }
    }

    /// Validate the database section keyed by `id`.
    pub(crate) fn validate(&self, id: &str) -> Result<(), ConfigError> {
        require_non_empty(
            &self.properties.category,
            &format!("databases.{id}.properties.category"),
        )?;

        if let Some(include) = &self.properties.include {
            for (i, name) in include.iter().enumerate() {
                if include[..i].contains(name) {
                    return Err(ConfigError::Validation(format!(
                        "databases.{id}.properties.include lists '{name}' twice"
                    )));
                }
            }
        }

        for sort in &self.sorts {
            if sort.property.is_some() == sort.timestamp.is_some() {
                return Err(ConfigError::Validation(format!(
                    "databases.{id}.sorts entries need exactly one of property or timestamp"
                )));
            }
        }

        Ok(())
    }
}

/// Normalize a Notion id for comparison: dashes removed, lowercase.
#[must_use]
pub fn normalize_id(id: &str) -> String {
    id.chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Find the configuration declared for `database_id`.
///
/// # Errors
///
/// Returns [`ConfigError::DatabaseNotConfigured`] when no section matches.
pub fn lookup_database_config<'a>(
    config: &'a SyncConfig,
    database_id: &str,
) -> Result<&'a DatabaseConfig, ConfigError> {
    let wanted = normalize_id(database_id);
    config
        .databases
        .iter()
        .find(|(id, _)| normalize_id(id) == wanted)
        .map(|(_, db)| db)
        .ok_or_else(|| ConfigError::DatabaseNotConfigured(database_id.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(toml: &str) -> DatabaseConfig {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_defaults_to_table_mode() {
        let db = parse(
            r#"
[properties]
category = "Category"
"#,
        );
        assert_eq!(db.render_as, RenderAs::Table);
        assert!(db.sorts.is_empty());
        assert!(db.properties.include.is_none());
        assert!(db.views.is_empty());
    }

    #[test]
    fn test_parse_pages_and_views() {
        let db = parse(
            r#"
render_as = "pages+views"
sorts = [{ property = "order", direction = "descending" }]
additional_page_frontmatter = { layout = "docs", sidebar = true }

[properties]
category = "Section"
include = ["Name", "Section"]

[[views]]
title = "Guides"
category = "guides"
"#,
        );
        assert_eq!(db.render_as, RenderAs::PagesAndViews);
        assert_eq!(
            db.sorts,
            vec![DatabaseSort {
                property: Some("order".to_owned()),
                timestamp: None,
                direction: SortDirection::Descending,
            }]
        );
        assert_eq!(
            db.properties.include,
            Some(vec!["Name".to_owned(), "Section".to_owned()])
        );
        assert_eq!(
            db.additional_page_frontmatter.get("layout"),
            Some(&serde_json::json!("docs"))
        );
        assert_eq!(db.views[0].title, "Guides");
        assert_eq!(db.views[0].category.as_deref(), Some("guides"));
    }

    #[test]
    fn test_sort_serializes_to_notion_format() {
        let sort = DatabaseSort {
            property: None,
            timestamp: Some(SortTimestamp::LastEditedTime),
            direction: SortDirection::Descending,
        };
        assert_eq!(
            serde_json::to_value(&sort).unwrap(),
            serde_json::json!({"timestamp": "last_edited_time", "direction": "descending"})
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_include() {
        let db = parse(
            r#"
[properties]
category = "Category"
include = ["Name", "Name"]
"#,
        );
        let err = db.validate("abc").unwrap_err();
        assert!(err.to_string().contains("'Name' twice"));
    }

    #[test]
    fn test_validate_rejects_empty_category() {
        let db = parse(
            r#"
[properties]
category = ""
"#,
        );
        let err = db.validate("abc").unwrap_err();
        assert!(err.to_string().contains("databases.abc.properties.category"));
    }

    #[test]
    fn test_validate_rejects_ambiguous_sort() {
        let db = parse(
            r#"
sorts = [{ direction = "ascending" }]

[properties]
category = "Category"
"#,
        );
        assert!(db.validate("abc").is_err());
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(
            normalize_id("8F2B1A64-0b2c-4c1e-9f0e-1f2a3b4c5d6e"),
            "8f2b1a640b2c4c1e9f0e1f2a3b4c5d6e"
        );
    }
}
