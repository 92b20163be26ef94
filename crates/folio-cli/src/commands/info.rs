//! `folio info`

use anyhow::Result;
use folio_core::Config;

use super::open_document;
use crate::output::{OutputFormat, print_json, render_info};

pub async fn execute(config: Config, locator: &str, format: OutputFormat) -> Result<()> {
    let (library, loaded) = open_document(config, locator).await?;
    let info = library.info(&loaded.id).await?;

    match format {
        OutputFormat::Text => println!("{}", render_info(&info)),
        OutputFormat::Json => print_json(&info)?,
    }
    Ok(())
}
