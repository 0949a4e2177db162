//! Search configuration
//!
//! Read from the `[search]` section of a TOML file. Every key is optional:
//!
//! ```toml
//! [search]
//! case_sensitive = false
//! default_fields = ["label", "tags", "ips"]
//!
//! [search.aliases]
//! name = "label"
//! tag = "tags"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::fields::{FieldResolver, DEFAULT_ALIASES, DEFAULT_SEARCH_FIELDS};

/// Directory under the user's home holding `config.toml`
pub const CONFIG_DIR: &str = ".refined-search";

/// Matching behavior for a search engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    /// Match case exactly when comparing terms with field values
    #[serde(default)]
    pub case_sensitive: bool,

    /// Fields searched by a simple query; free-text clauses also search `value`
    #[serde(default = "default_fields")]
    pub default_fields: Vec<String>,

    /// User-facing field synonyms (alias -> canonical key)
    #[serde(default = "default_aliases")]
    pub aliases: BTreeMap<String, String>,
}

fn default_fields() -> Vec<String> {
    DEFAULT_SEARCH_FIELDS.iter().map(|s| s.to_string()).collect()
}

fn default_aliases() -> BTreeMap<String, String> {
    DEFAULT_ALIASES
        .iter()
        .map(|(alias, key)| (alias.to_string(), key.to_string()))
        .collect()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            default_fields: default_fields(),
            aliases: default_aliases(),
        }
    }
}

impl SearchConfig {
    /// Build the field resolver described by this configuration
    pub fn resolver(&self) -> FieldResolver {
        FieldResolver::new(
            self.aliases.iter().map(|(a, k)| (a.clone(), k.clone())),
            self.default_fields.iter().cloned(),
        )
    }

    /// Parse configuration from TOML text.
    ///
    /// A document without a `[search]` section yields the defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let toml_value: toml::Value = toml::from_str(text).context("Failed to parse config TOML")?;

        match toml_value.get("search") {
            Some(search_table) => search_table
                .clone()
                .try_into()
                .context("Failed to parse [search] section"),
            None => {
                log::debug!("No [search] section in config, using defaults");
                Ok(SearchConfig::default())
            }
        }
    }
}

/// Load configuration from `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<SearchConfig> {
    if !path.exists() {
        log::debug!("No config found at {}, using defaults", path.display());
        return Ok(SearchConfig::default());
    }

    let config_str = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    SearchConfig::from_toml_str(&config_str)
        .with_context(|| format!("Invalid configuration in {}", path.display()))
}

/// Location of the per-user configuration file, if a home directory exists
pub fn user_config_path() -> Option<PathBuf> {
    match dirs::home_dir() {
        Some(home) => Some(home.join(CONFIG_DIR).join("config.toml")),
        None => {
            log::debug!("Could not determine home directory");
            None
        }
    }
}

/// Resolve configuration: explicit path first, then the user config, then defaults
pub fn resolve_config(explicit: Option<&Path>) -> Result<SearchConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return load_config(path);
    }

    match user_config_path() {
        Some(path) => load_config(&path),
        None => Ok(SearchConfig::default()),
    }
}
