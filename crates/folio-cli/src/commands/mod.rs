//! Command implementations

use std::path::Path;

use anyhow::{Context, Result};
use folio_core::{Config, Library, LoadOutcome};

pub mod info;
pub mod outline;
pub mod search;
pub mod section;
pub mod serve;

/// Load configuration from an explicit file, a config directory, or the
/// default lookup, in that order.
pub fn load_config(file: Option<&Path>, dir: Option<&Path>) -> Result<Config> {
    let config = match (file, dir) {
        (Some(path), _) => Config::load_from(path),
        (None, Some(dir)) => Config::load_from(&dir.join("config.toml")),
        (None, None) => Config::load(),
    };
    config.context("failed to load configuration")
}

/// Build a library that does not touch the registry and load `locator` into it.
pub async fn open_document(config: Config, locator: &str) -> Result<(Library, LoadOutcome)> {
    let library = Library::ephemeral(config)?;
    let outcome = library
        .load(locator)
        .await
        .with_context(|| format!("failed to load {locator}"))?;
    Ok((library, outcome))
}
