//! Size-bounded pagination at paragraph boundaries.
//!
//! The character budget is advisory: content is never cut, so a paragraph
//! longer than the budget gets a page of its own. Joining the pages with
//! [`PARAGRAPH_SEPARATOR`] gives back the input exactly.

use crate::headings::parse_heading_line;
use crate::{Error, Result};

/// Separator between paragraphs (and between pages when re-joined).
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Default character budget per page.
pub const DEFAULT_CHAR_BUDGET: usize = 4000;

const SEPARATOR_CHARS: usize = PARAGRAPH_SEPARATOR.len();

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// A paragraph consisting of a single markdown heading line.
fn is_heading_only(paragraph: &str) -> bool {
    let trimmed = paragraph.trim();
    !trimmed.contains('\n') && parse_heading_line(trimmed).is_some()
}

struct PageBuilder<'a> {
    paragraphs: Vec<&'a str>,
    chars: usize,
}

impl<'a> PageBuilder<'a> {
    const fn new() -> Self {
        Self {
            paragraphs: Vec::new(),
            chars: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Length of the page if `extra` paragraphs (with their char lengths) were appended.
    fn len_with(&self, extra: &[usize]) -> usize {
        let mut len = self.chars;
        let mut count = self.paragraphs.len();
        for &chars in extra {
            if count > 0 {
                len += SEPARATOR_CHARS;
            }
            len += chars;
            count += 1;
        }
        len
    }

    fn push(&mut self, paragraph: &'a str, chars: usize) {
        self.chars = self.len_with(&[chars]);
        self.paragraphs.push(paragraph);
    }

    fn finish(&mut self) -> String {
        self.chars = 0;
        std::mem::take(&mut self.paragraphs).join(PARAGRAPH_SEPARATOR)
    }
}

/// Split `text` into pages of at most `budget` characters where possible.
///
/// A heading-only paragraph pulls the paragraph after it onto the same page
/// when that paragraph still fits; otherwise the page closes with the heading
/// as its last paragraph.
pub fn paginate(text: &str, budget: usize) -> Vec<String> {
    if char_len(text) <= budget {
        return vec![text.to_string()];
    }

    let paragraphs: Vec<&str> = text.split(PARAGRAPH_SEPARATOR).collect();
    let lengths: Vec<usize> = paragraphs.iter().map(|p| char_len(p)).collect();

    let mut pages = Vec::new();
    let mut page = PageBuilder::new();

    let mut i = 0;
    while i < paragraphs.len() {
        let (paragraph, len) = (paragraphs[i], lengths[i]);
        i += 1;

        if !page.is_empty() && page.len_with(&[len]) > budget {
            pages.push(page.finish());
        }
        page.push(paragraph, len);

        if !is_heading_only(paragraph) {
            continue;
        }
        if let Some(&next) = lengths.get(i) {
            if page.len_with(&[next]) <= budget {
                page.push(paragraphs[i], next);
                i += 1;
            } else {
                pages.push(page.finish());
            }
        }
    }

    if !page.is_empty() {
        pages.push(page.finish());
    }

    pages
}

/// Select page `page` (1-based) out of `pages`.
pub fn select_page(pages: &[String], page: usize) -> Result<&str> {
    if page == 0 || page > pages.len() {
        return Err(Error::InvalidRange {
            requested: page,
            total: pages.len(),
        });
    }
    Ok(&pages[page - 1])
}
