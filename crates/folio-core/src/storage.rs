use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::{Error, Result};

const APP_DIR: &str = "folio";
const REGISTRY_FILE: &str = "registry.toml";

/// One persisted registration: the id a locator was loaded under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: String,
    pub locator: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    documents: Vec<RegistryEntry>,
}

/// Local filesystem storage for the document registry.
///
/// Only `{id, locator}` pairs are persisted; document bodies are rebuilt
/// from their locators on restore.
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// Storage rooted at the configured data directory.
    ///
    /// Resolution order: `FOLIO_DATA_DIR`, `[paths] data_dir`,
    /// `XDG_DATA_HOME/folio`, then the platform data directory.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_root(Self::resolve_data_dir(config)?)
    }

    /// Storage rooted at `data_dir`, creating it if needed.
    pub fn with_root(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)
            .map_err(|e| Error::Storage(format!("Failed to create data directory: {e}")))?;
        Ok(Self { data_dir })
    }

    fn resolve_data_dir(config: &Config) -> Result<PathBuf> {
        // Test/dev override
        if let Ok(dir) = std::env::var("FOLIO_DATA_DIR") {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        if let Some(dir) = &config.paths.data_dir {
            return Ok(dir.clone());
        }

        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            let trimmed = xdg.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed).join(APP_DIR));
            }
        }

        ProjectDirs::from("dev", APP_DIR, APP_DIR)
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| Error::Storage("Failed to determine data directory".into()))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn registry_path(&self) -> PathBuf {
        self.data_dir.join(REGISTRY_FILE)
    }

    /// Read the registry. A missing file is an empty registry.
    pub fn load_registry(&self) -> Result<Vec<RegistryEntry>> {
        let path = self.registry_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Storage(format!("Failed to read registry: {e}")))?;
        let file: RegistryFile = toml::from_str(&content)
            .map_err(|e| Error::Storage(format!("Failed to parse registry: {e}")))?;
        Ok(file.documents)
    }

    /// Replace the registry with `entries`, in order.
    pub fn save_registry(&self, entries: &[RegistryEntry]) -> Result<()> {
        let path = self.registry_path();
        let content = toml::to_string_pretty(&RegistryFile {
            documents: entries.to_vec(),
        })
        .map_err(|e| Error::Storage(format!("Failed to serialize registry: {e}")))?;

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .map_err(|e| Error::Storage(format!("Failed to write registry: {e}")))?;

        #[cfg(target_os = "windows")]
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| Error::Storage(format!("Failed to remove existing registry: {e}")))?;
        }

        fs::rename(&tmp_path, &path)
            .map_err(|e| Error::Storage(format!("Failed to commit registry: {e}")))?;

        debug!(entries = entries.len(), path = %path.display(), "saved registry");
        Ok(())
    }
}
