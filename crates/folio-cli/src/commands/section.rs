//! `folio section`

use anyhow::{Context, Result};
use folio_core::Config;

use super::open_document;
use crate::cli::SectionArgs;
use crate::output::{OutputFormat, print_json, render_section};

pub async fn execute(config: Config, args: SectionArgs) -> Result<()> {
    let page = args
        .page
        .map(usize::try_from)
        .transpose()
        .context("page number out of range")?;
    let budget = args
        .budget
        .map(usize::try_from)
        .transpose()
        .context("budget out of range")?;

    let (library, loaded) = open_document(config, &args.locator).await?;
    let section = library
        .section(&loaded.id, &args.title, page, budget)
        .await?;

    match args.format.format {
        OutputFormat::Text => println!("{}", render_section(&section)),
        OutputFormat::Json => print_json(&section)?,
    }
    Ok(())
}
