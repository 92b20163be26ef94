//! Full-text search with section attribution.

use std::collections::HashMap;

use regex::RegexBuilder;

use crate::headings::HeadingIndex;
use crate::types::{SearchGroup, SearchMatch};
use crate::{Error, Result};

/// Section label for matches that precede every heading.
pub const DOCUMENT_START: &str = "Document Start";

/// Default number of context characters on each side of a match.
pub const DEFAULT_CONTEXT_CHARS: usize = 100;

/// Parameters for a search over one body.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub query: String,
    /// Treat `query` as a regular expression rather than a literal.
    pub regex: bool,
    pub case_sensitive: bool,
    /// Stop after this many matches. `None` means unbounded.
    pub max_results: Option<usize>,
    pub context_chars: usize,
}

impl SearchOptions {
    pub fn literal(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            regex: false,
            case_sensitive: false,
            max_results: None,
            context_chars: DEFAULT_CONTEXT_CHARS,
        }
    }
}

/// Byte range covering `chars` characters on each side of `start..end`.
fn context_bounds(text: &str, start: usize, end: usize, chars: usize) -> (usize, usize) {
    let before = text[..start]
        .char_indices()
        .rev()
        .take(chars)
        .last()
        .map_or(start, |(i, _)| i);
    let after = text[end..]
        .char_indices()
        .nth(chars)
        .map_or(text.len(), |(i, _)| end + i);
    (before, after)
}

/// Search `body` and group the matches by enclosing section.
///
/// Groups appear in the order their first match was found. Scanning stops
/// as soon as `max_results` matches have been collected.
pub fn search(body: &str, index: &HeadingIndex, options: &SearchOptions) -> Result<Vec<SearchGroup>> {
    if options.query.is_empty() {
        return Err(Error::InvalidArgument("Search query must not be empty".into()));
    }

    let pattern = if options.regex {
        options.query.clone()
    } else {
        regex::escape(&options.query)
    };
    let matcher = RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .build()?;

    let limit = options.max_results.unwrap_or(usize::MAX);
    let mut groups: Vec<SearchGroup> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;

    if limit == 0 {
        return Ok(groups);
    }

    for found in matcher.find_iter(body) {
        let section = index
            .enclosing(found.start())
            .map_or(DOCUMENT_START, |h| h.title.as_str());

        let (ctx_start, ctx_end) =
            context_bounds(body, found.start(), found.end(), options.context_chars);
        let hit = SearchMatch {
            text: found.as_str().to_string(),
            context: body[ctx_start..ctx_end].trim().to_string(),
        };

        let slot = *group_index.entry(section.to_string()).or_insert_with(|| {
            groups.push(SearchGroup {
                section: section.to_string(),
                matches: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].matches.push(hit);

        total += 1;
        if total >= limit {
            break;
        }
    }

    tracing::debug!(
        query = %options.query,
        matches = total,
        sections = groups.len(),
        "search complete"
    );

    Ok(groups)
}
