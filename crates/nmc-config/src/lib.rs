//! Configuration management for NMC.
//!
//! Parses `nmc.toml` sync configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `cms_database_id`
//! - `output_dir`
//! - `assets_dir`
//! - `notion.api_token`
//! - `notion.base_url`

mod database;
mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use database::{
    DatabaseConfig, DatabaseSort, PropertiesConfig, RenderAs, SortDirection, SortTimestamp,
    ViewConfig, lookup_database_config, normalize_id,
};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "nmc.toml";

/// Default Notion REST endpoint.
pub const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com/v1";

/// Notion API version sent with every request.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
}

/// Sync configuration.
#[derive(Debug, Deserialize)]
pub struct SyncConfig {
    /// The designated top-level content database. Always rendered as pages+views.
    pub cms_database_id: String,
    /// Notion API access.
    pub notion: NotionConfig,
    /// Per-database configuration, keyed by database id.
    #[serde(default)]
    pub databases: BTreeMap<String, DatabaseConfig>,
    output_dir: Option<String>,
    assets_dir: Option<String>,

    /// Resolved output paths (set after loading).
    #[serde(skip)]
    pub paths: OutputPaths,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Notion API configuration.
#[derive(Debug, Deserialize)]
pub struct NotionConfig {
    /// Integration token.
    pub api_token: String,
    /// REST endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Value of the `Notion-Version` header.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_base_url() -> String {
    DEFAULT_NOTION_BASE_URL.to_owned()
}

fn default_version() -> String {
    DEFAULT_NOTION_VERSION.to_owned()
}

/// Resolved output locations with absolute paths.
#[derive(Debug, Default, Clone)]
pub struct OutputPaths {
    /// Directory receiving rendered page files.
    pub output_dir: PathBuf,
    /// Directory receiving downloaded assets.
    pub assets_dir: PathBuf,
}

impl OutputPaths {
    /// Asset directory as seen from the output directory, used in image links.
    ///
    /// Falls back to the asset directory's name when it is not nested
    /// under the output directory.
    #[must_use]
    pub fn assets_link_prefix(&self) -> String {
        let relative = self
            .assets_dir
            .strip_prefix(&self.output_dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| {
                self.assets_dir
                    .file_name()
                    .map(PathBuf::from)
                    .unwrap_or_default()
            });
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// No config file given and none discovered.
    #[error("No nmc.toml found in current directory or its parents")]
    NotDiscovered,
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Database id has no `[databases.<id>]` section.
    #[error("No database configuration declared for database {0}")]
    DatabaseNotConfigured(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`notion.api_token`").
        field: String,
        /// Error message (e.g., "${`NOTION_API_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
pub(crate) fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl SyncConfig {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `nmc.toml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if no config file can be found, parsing fails, or
    /// validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            return Err(ConfigError::NotDiscovered);
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Parse configuration from TOML text, resolving paths against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_paths(base_dir);
        config.validate()?;
        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(output_dir) = &settings.output_dir {
            // Keep assets nested under the new output dir when they were nested before.
            if let Ok(relative) = self
                .paths
                .assets_dir
                .strip_prefix(&self.paths.output_dir)
                .map(Path::to_path_buf)
            {
                self.paths.assets_dir = output_dir.join(relative);
            }
            self.paths.output_dir.clone_from(output_dir);
        }
    }

    /// Whether `database_id` is the designated top-level content database.
    #[must_use]
    pub fn is_cms_database(&self, database_id: &str) -> bool {
        normalize_id(&self.cms_database_id) == normalize_id(database_id)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.cms_database_id, "cms_database_id")?;
        require_non_empty(&self.notion.api_token, "notion.api_token")?;
        require_http_url(&self.notion.base_url, "notion.base_url")?;
        require_non_empty(&self.notion.version, "notion.version")?;

        for (id, db) in &self.databases {
            db.validate(id)?;
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.cms_database_id = expand::expand_env(&self.cms_database_id, "cms_database_id")?;
        expand::expand_optional(&mut self.output_dir, "output_dir")?;
        expand::expand_optional(&mut self.assets_dir, "assets_dir")?;
        self.notion.api_token = expand::expand_env(&self.notion.api_token, "notion.api_token")?;
        self.notion.base_url = expand::expand_env(&self.notion.base_url, "notion.base_url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let output_dir = config_dir.join(self.output_dir.as_deref().unwrap_or("content"));
        let assets_dir = match self.assets_dir.as_deref() {
            Some(dir) => config_dir.join(dir),
            None => output_dir.join("assets"),
        };
        self.paths = OutputPaths {
            output_dir,
            assets_dir,
        };
    }
}
