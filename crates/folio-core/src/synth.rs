//! Markdown synthesis from page texts and an outline.
//!
//! Outline destinations double as section boundaries: each outline entry with a
//! page becomes a heading followed by the pages it spans. Pages before the first
//! entry form a prologue; pages after the last span are appended verbatim.

use crate::headings::MAX_DEPTH;
use crate::types::OutlineNode;

/// An outline entry flattened into a page span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedSection {
    pub title: String,
    pub level: usize,
    pub start_page: usize,
    /// Last page owned by the section. Less than `start_page` when the next
    /// section starts on the same page; such a section owns no pages.
    pub end_page: usize,
}

impl FlattenedSection {
    /// Whether the section owns at least one page.
    pub const fn has_pages(&self) -> bool {
        self.end_page >= self.start_page
    }
}

/// Flatten an outline into page-ordered sections.
///
/// Traversal is depth-first in document order with an explicit stack. Nodes
/// without a page in `1..=page_count` are skipped, their children are not.
/// Sections are sorted by start page; equal start pages keep discovery order.
pub fn flatten_outline(outline: &[OutlineNode], page_count: usize) -> Vec<FlattenedSection> {
    let mut discovered: Vec<(usize, &OutlineNode)> = Vec::new();
    let mut stack: Vec<&OutlineNode> = outline.iter().rev().collect();

    while let Some(node) = stack.pop() {
        if node.page.is_some_and(|p| (1..=page_count).contains(&p)) {
            discovered.push((discovered.len(), node));
        }
        stack.extend(node.children.iter().rev());
    }

    let mut ordered: Vec<(usize, usize, &OutlineNode)> = discovered
        .into_iter()
        .filter_map(|(index, node)| node.page.map(|page| (page, index, node)))
        .collect();
    ordered.sort_by_key(|&(page, index, _)| (page, index));

    let starts: Vec<usize> = ordered.iter().map(|&(page, _, _)| page).collect();
    ordered
        .iter()
        .enumerate()
        .map(|(i, &(start_page, _, node))| {
            let end_page = starts
                .get(i + 1)
                .map_or(page_count, |next| next.saturating_sub(1));
            FlattenedSection {
                title: node.title.clone(),
                level: node.level,
                start_page,
                end_page,
            }
        })
        .collect()
}

/// Heading line for a section at `level`.
pub fn heading_line(title: &str, level: usize) -> String {
    let depth = (level + 1).clamp(1, MAX_DEPTH);
    format!("{} {}", "#".repeat(depth), title.trim())
}

fn push_pages<'a>(blocks: &mut Vec<&'a str>, pages: &'a [String], from: usize, to: usize) {
    for page in from..=to {
        if let Some(text) = page.checked_sub(1).and_then(|i| pages.get(i)) {
            let text = text.trim();
            if !text.is_empty() {
                blocks.push(text);
            }
        }
    }
}

/// Build the structured body for a document.
///
/// `pages[0]` is page 1. Blank pages are skipped everywhere.
pub fn synthesize(pages: &[String], outline: &[OutlineNode]) -> String {
    let sections = flatten_outline(outline, pages.len());
    let mut blocks: Vec<&str> = Vec::new();
    let mut headings: Vec<(usize, String)> = Vec::new();

    let Some(first) = sections.first() else {
        push_pages(&mut blocks, pages, 1, pages.len());
        return blocks.join("\n\n");
    };

    if first.start_page > 1 {
        push_pages(&mut blocks, pages, 1, first.start_page - 1);
    }

    // Heading strings are owned; remember where each goes and splice after.
    let mut last_end = first.start_page.saturating_sub(1);
    for section in &sections {
        headings.push((blocks.len(), heading_line(&section.title, section.level)));
        if section.has_pages() {
            push_pages(&mut blocks, pages, section.start_page, section.end_page);
            last_end = last_end.max(section.end_page);
        }
    }

    if last_end < pages.len() {
        push_pages(&mut blocks, pages, last_end + 1, pages.len());
    }

    let mut out: Vec<&str> = Vec::with_capacity(blocks.len() + headings.len());
    let mut pending = headings.iter().peekable();
    for (index, block) in blocks.iter().enumerate() {
        while let Some((_, heading)) = pending.next_if(|(at, _)| *at == index) {
            out.push(heading);
        }
        out.push(block);
    }
    out.extend(pending.map(|(_, heading)| heading.as_str()));

    out.join("\n\n").trim().to_string()
}
