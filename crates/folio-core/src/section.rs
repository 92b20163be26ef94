//! Section lookup by heading title.
//!
//! Matching is case-insensitive substring containment in either direction:
//! `"scope"` finds `"1.2 Scope and Applicability"`, and
//! `"chapter 1 introduction"` finds `"Chapter 1"`.

use crate::headings::HeadingIndex;
use crate::{Error, Result};

/// Number of heading titles offered when a lookup fails.
pub const SUGGESTION_LIMIT: usize = 5;

/// A located section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedSection {
    /// Heading title exactly as it appears in the body.
    pub title: String,
    /// Heading line through the section boundary, trimmed.
    pub content: String,
}

fn title_matches(title: &str, query: &str) -> bool {
    if title.is_empty() {
        return false;
    }
    let title = title.to_lowercase();
    title.contains(query) || query.contains(title.as_str())
}

/// Find the first heading matching `query` and return its section.
///
/// The section runs until the next heading of the same or shallower depth;
/// deeper headings are part of it.
pub fn locate(body: &str, index: &HeadingIndex, query: &str) -> Result<LocatedSection> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(Error::InvalidArgument(
            "Section title must not be empty".into(),
        ));
    }

    let headings = index.headings();
    let Some(pos) = headings
        .iter()
        .position(|h| title_matches(&h.title, &needle))
    else {
        return Err(Error::SectionNotFound {
            query: query.to_string(),
            suggestions: headings
                .iter()
                .take(SUGGESTION_LIMIT)
                .map(|h| h.title.clone())
                .collect(),
        });
    };

    let matched = &headings[pos];
    let end = headings[pos + 1..]
        .iter()
        .find(|h| h.depth <= matched.depth)
        .map_or(body.len(), |h| h.start);

    tracing::debug!(query, title = %matched.title, depth = matched.depth, "section located");

    Ok(LocatedSection {
        title: matched.title.clone(),
        content: body[matched.start..end].trim().to_string(),
    })
}
