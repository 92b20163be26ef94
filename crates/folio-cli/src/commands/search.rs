//! `folio search`

use anyhow::Result;
use folio_core::{Config, SearchRequest};
use serde_json::json;

use super::open_document;
use crate::cli::SearchArgs;
use crate::output::{OutputFormat, print_json, render_search};

pub async fn execute(config: Config, args: SearchArgs) -> Result<()> {
    let (library, loaded) = open_document(config, &args.locator).await?;

    let request = SearchRequest {
        query: args.query.clone(),
        case_sensitive: Some(args.case_sensitive),
        regex: Some(args.regex),
        max_results: args.limit,
        context_chars: args.context,
    };
    let groups = library.search(&loaded.id, request).await?;

    match args.format.format {
        OutputFormat::Text => println!("{}", render_search(&args.query, &groups)),
        OutputFormat::Json => {
            let total: usize = groups.iter().map(|g| g.matches.len()).sum();
            print_json(&json!({
                "id": loaded.id,
                "query": args.query,
                "totalMatches": total,
                "groups": groups,
            }))?;
        },
    }
    Ok(())
}
