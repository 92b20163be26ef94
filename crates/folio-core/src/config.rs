//! Configuration for folio.
//!
//! Configuration is a single TOML file. Missing files and missing keys fall
//! back to defaults, so an empty file is a valid configuration.
//!
//! ## File location
//!
//! 1. `FOLIO_CONFIG`: explicit path to the file
//! 2. `FOLIO_CONFIG_DIR`: directory containing `config.toml`
//! 3. Platform config directory (`~/.config/folio/config.toml` on Linux)
//!
//! ## Example
//!
//! ```toml
//! [fetch]
//! timeout_secs = 30
//! user_agent = "folio/0.3"
//!
//! [pagination]
//! char_budget = 4000
//!
//! [search]
//! context_chars = 100
//! max_results = 50
//!
//! [paths]
//! data_dir = "/var/lib/folio"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::paginate::DEFAULT_CHAR_BUDGET;
use crate::search::DEFAULT_CONTEXT_CHARS;
use crate::{Error, Result};

/// Default remote fetch timeout.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub pagination: PaginationConfig,
    pub search: SearchConfig,
    pub paths: PathsConfig,
}

/// Remote fetch behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds. Also bounds decoding of the fetched bytes.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl FetchConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: concat!("folio/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Characters per page when a caller does not pass a budget.
    pub char_budget: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            char_budget: DEFAULT_CHAR_BUDGET,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub context_chars: usize,
    /// Match limit when a caller does not pass one. Unset means unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            context_chars: DEFAULT_CONTEXT_CHARS,
            max_results: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Overrides the platform data directory. `FOLIO_DATA_DIR` wins over this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Load from the default location, or defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;
        fs::write(path, content).map_err(|e| Error::Config(format!("Failed to write config: {e}")))
    }

    /// Reject values that would make every call fail.
    pub fn validate(&self) -> Result<()> {
        if self.pagination.char_budget == 0 {
            return Err(Error::Config(
                "pagination.char_budget must be greater than zero".into(),
            ));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(Error::Config(
                "fetch.timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Path of the configuration file honoring `FOLIO_CONFIG` and `FOLIO_CONFIG_DIR`.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(file) = non_empty_env("FOLIO_CONFIG") {
            return Ok(PathBuf::from(file));
        }
        if let Some(dir) = non_empty_env("FOLIO_CONFIG_DIR") {
            return Ok(PathBuf::from(dir).join(CONFIG_FILE_NAME));
        }

        let dirs = directories::ProjectDirs::from("dev", "folio", "folio")
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))?;
        Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
