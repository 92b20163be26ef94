//! `folio outline`

use anyhow::Result;
use folio_core::Config;
use serde_json::json;

use super::open_document;
use crate::output::{OutputFormat, print_json};

pub async fn execute(config: Config, locator: &str, format: OutputFormat) -> Result<()> {
    let (library, loaded) = open_document(config, locator).await?;
    let outline = library.outline(&loaded.id).await?;

    match format {
        OutputFormat::Text => println!("{outline}"),
        OutputFormat::Json => print_json(&json!({ "id": loaded.id, "outline": outline }))?,
    }
    Ok(())
}
