//! Locator normalization and document id assignment.
//!
//! Ids are short and readable: the file name when it is unique, otherwise the
//! fewest trailing path segments that tell two sources apart.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// Id used when a locator has no usable path segments.
pub const FALLBACK_ID: &str = "unknown.pdf";

/// A locator after normalization, split into its segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLocator {
    /// Canonical string form, used as the registry key.
    pub normalized: String,
    /// Non-empty segments in order.
    pub segments: Vec<String>,
    /// Separator used to join trailing segments into an id.
    pub separator: char,
    pub is_url: bool,
}

/// Returns true when the locator starts with a URL scheme (`scheme://`).
pub fn is_url(locator: &str) -> bool {
    let Some((scheme, _)) = locator.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Normalize a locator.
///
/// URLs are kept as-is. Paths are made absolute against the current directory
/// and lexically cleaned: `.` dropped, `..` applied, trailing separators removed.
pub fn normalize(locator: &str) -> NormalizedLocator {
    let trimmed = locator.trim();
    if is_url(trimmed) {
        let segments = trimmed
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        return NormalizedLocator {
            normalized: trimmed.to_string(),
            segments,
            separator: '/',
            is_url: true,
        };
    }

    let path = clean_path(&absolute(Path::new(trimmed)));
    let segments = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    NormalizedLocator {
        normalized: path.to_string_lossy().into_owned(),
        segments,
        separator: MAIN_SEPARATOR,
        is_url: false,
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() {
        return PathBuf::new();
    }
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            },
            other => out.push(other),
        }
    }
    out
}

/// Assign an id to `locator` given the existing `id -> normalized locator` map.
///
/// Identical locators always map to the same id. Distinct locators that share a
/// file name are told apart by the minimal number of trailing segments; if all
/// of those are taken, the full normalized locator is used.
pub fn assign_id(locator: &NormalizedLocator, assigned: &HashMap<String, String>) -> String {
    let segments = &locator.segments;
    let Some(last) = segments.last() else {
        return FALLBACK_ID.to_string();
    };

    let owns = |candidate: &str| {
        assigned
            .get(candidate)
            .is_some_and(|existing| existing == &locator.normalized)
    };

    if owns(last) {
        return last.clone();
    }

    let separator = locator.separator.to_string();
    for take in 1..=segments.len() {
        let candidate = segments[segments.len() - take..].join(&separator);
        if !assigned.contains_key(&candidate) || owns(&candidate) {
            return candidate;
        }
    }

    locator.normalized.clone()
}
