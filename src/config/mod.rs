//! Configuration management.
//!
//! Values are layered: defaults, then a TOML file, then `LINKSHELF_*`
//! environment variables.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::tree::cascade::CascadePolicy;
use crate::{Error, Result};

/// Number of links shown per group page.
pub const DEFAULT_LINKS_PER_PAGE: u32 = 20;

/// Environment variable overriding the database path.
pub const ENV_DATABASE: &str = "LINKSHELF_DATABASE";
/// Environment variable overriding the cascade policy.
pub const ENV_CASCADE_POLICY: &str = "LINKSHELF_CASCADE_POLICY";
/// Environment variable overriding the page size.
pub const ENV_LINKS_PER_PAGE: &str = "LINKSHELF_LINKS_PER_PAGE";
/// Environment variable overriding the search URL prefix.
pub const ENV_BASE_URL: &str = "LINKSHELF_BASE_URL";

/// Main configuration for linkshelf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfConfig {
    /// Path to the `SQLite` database, `None` for the platform default.
    pub database_path: Option<PathBuf>,
    /// What happens to child groups when their parent is deleted.
    pub cascade_policy: CascadePolicy,
    /// Number of links per group page.
    pub links_per_page: u32,
    /// Prefix for absolute URLs in search results.
    pub base_url: String,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Logging section of the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive such as `info` or `linkshelf=debug`.
    pub level: Option<String>,
    /// Output format: `pretty` or `json`.
    pub format: Option<String>,
    /// Log file path, stderr when unset.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Database path.
    pub database_path: Option<String>,
    /// Cascade policy name.
    pub cascade_policy: Option<String>,
    /// Links per page.
    pub links_per_page: Option<u32>,
    /// Search URL prefix.
    pub base_url: Option<String>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            cascade_policy: CascadePolicy::default(),
            links_per_page: DEFAULT_LINKS_PER_PAGE,
            base_url: String::new(),
            logging: LoggingSettings::default(),
        }
    }
}

impl ShelfConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from `path` (or the default location) and applies
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file cannot be read or parsed,
    /// or if an environment override is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::operation("read_config_file", e))?;
        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or holds invalid values.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| Error::operation("parse_config_file", e))?;
        Self::from_config_file(file)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/linkshelf/` on macOS)
    /// 2. XDG config dir (`~/.config/linkshelf/` for Unix compatibility)
    ///
    /// Returns default configuration if no usable config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("linkshelf").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("linkshelf")
                .join("config.toml"),
        ];

        for candidate in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(candidate) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(
                        path = %candidate.display(),
                        error = %e,
                        "Ignoring unreadable config file"
                    );
                },
            }
        }

        Self::default()
    }

    /// Applies `LINKSHELF_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if an override cannot be parsed.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = lookup(ENV_DATABASE) {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Some(policy) = lookup(ENV_CASCADE_POLICY) {
            self.cascade_policy = policy.parse()?;
        }
        if let Some(per_page) = lookup(ENV_LINKS_PER_PAGE) {
            self.links_per_page = parse_links_per_page(&per_page)?;
        }
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        Ok(())
    }

    /// Converts a `ConfigFile` to `ShelfConfig`.
    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = file.database_path {
            config.database_path = Some(PathBuf::from(path));
        }
        if let Some(policy) = file.cascade_policy {
            config.cascade_policy = policy.parse()?;
        }
        if let Some(per_page) = file.links_per_page {
            config.links_per_page = validate_links_per_page(per_page)?;
        }
        if let Some(base_url) = file.base_url {
            config.base_url = base_url;
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        Ok(config)
    }

    /// Sets the database path.
    #[must_use]
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Sets the cascade policy.
    #[must_use]
    pub const fn with_cascade_policy(mut self, policy: CascadePolicy) -> Self {
        self.cascade_policy = policy;
        self
    }
}

fn parse_links_per_page(value: &str) -> Result<u32> {
    let per_page = value
        .trim()
        .parse::<u32>()
        .map_err(|_| Error::InvalidInput(format!("links per page must be a number: {value}")))?;
    validate_links_per_page(per_page)
}

fn validate_links_per_page(per_page: u32) -> Result<u32> {
    if per_page == 0 {
        return Err(Error::InvalidInput(
            "links per page must be at least 1".to_string(),
        ));
    }
    Ok(per_page)
}
