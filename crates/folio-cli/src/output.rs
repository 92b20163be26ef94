//! Output formatting for one-shot commands
//!
//! Text output is meant for people; JSON output mirrors the MCP tool payloads.

use std::fmt::Write as _;

use clap::{Args, ValueEnum};
use folio_core::{DocumentInfo, ExtractionIssue, SearchGroup, SectionPage};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Shared clap argument for commands that accept an output format.
#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct FormatArg {
    /// Output format
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Text,
        env = "FOLIO_OUTPUT_FORMAT"
    )]
    pub format: OutputFormat,
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn render_section(page: &SectionPage) -> String {
    let mut out = page.content.clone();
    if page.total_pages > 1 {
        let _ = write!(
            out,
            "\n\n[{}: page {} of {}]",
            page.section, page.page, page.total_pages
        );
    }
    out
}

pub fn render_search(query: &str, groups: &[SearchGroup]) -> String {
    let total: usize = groups.iter().map(|g| g.matches.len()).sum();
    if total == 0 {
        return format!("No matches for \"{query}\"");
    }

    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{}", group.section);
        for hit in &group.matches {
            let context = hit.context.replace('\n', " ");
            let _ = writeln!(out, "  ...{}...", context.trim());
        }
        out.push('\n');
    }
    let _ = write!(
        out,
        "{total} {} in {} {}",
        if total == 1 { "match" } else { "matches" },
        groups.len(),
        if groups.len() == 1 {
            "section"
        } else {
            "sections"
        }
    );
    out
}

pub fn render_info(info: &DocumentInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "id:        {}", info.id);
    let _ = writeln!(out, "path:      {}", info.path);
    let _ = writeln!(out, "pages:     {}", info.page_count);
    let _ = writeln!(out, "checksum:  {}", info.checksum);
    let _ = writeln!(out, "loaded:    {}", info.loaded_at.to_rfc3339());

    if !info.metadata.is_empty() {
        out.push_str("metadata:\n");
        for (key, value) in &info.metadata {
            let _ = writeln!(out, "  {key}: {value}");
        }
    }

    if !info.issues.is_empty() {
        out.push_str("issues:\n");
        for issue in &info.issues {
            let line = match issue {
                ExtractionIssue::Page { page, reason } => format!("page {page}: {reason}"),
                ExtractionIssue::OutlineNode { title, reason } => {
                    format!("outline \"{title}\": {reason}")
                },
            };
            let _ = writeln!(out, "  {line}");
        }
    }

    out.trim_end().to_string()
}
