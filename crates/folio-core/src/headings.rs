//! Heading discovery over a synthesized body.
//!
//! Headings are ATX lines (`#` to `######`, a space, then the title) found by
//! scanning the body line by line. Page text is never interpreted as
//! markdown, so a code fence or HTML comment inside a page cannot hide the
//! headings that follow it.

/// Deepest heading marker recognized.
pub const MAX_DEPTH: usize = 6;

/// An ATX heading in the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Number of `#` markers (1-6).
    pub depth: usize,
    pub title: String,
    /// Byte offset of the start of the heading line.
    pub start: usize,
}

/// All headings of a body in document order.
#[derive(Debug, Clone, Default)]
pub struct HeadingIndex {
    headings: Vec<Heading>,
}

/// Depth and title of `line` if it is a heading line.
pub fn parse_heading_line(line: &str) -> Option<(usize, &str)> {
    let depth = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=MAX_DEPTH).contains(&depth) {
        return None;
    }

    let rest = &line[depth..];
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let title = rest.trim();
    (!title.is_empty()).then_some((depth, title))
}

impl HeadingIndex {
    /// Collect the heading lines of `text`.
    pub fn build(text: &str) -> Self {
        let mut headings = Vec::new();
        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            let content = line.trim_end_matches(['\n', '\r']);
            if let Some((depth, title)) = parse_heading_line(content) {
                headings.push(Heading {
                    depth,
                    title: title.to_string(),
                    start: offset,
                });
            }
            offset += line.len();
        }

        Self { headings }
    }

    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    /// The nearest heading whose line starts at or before `offset`.
    pub fn enclosing(&self, offset: usize) -> Option<&Heading> {
        let idx = self.headings.partition_point(|h| h.start <= offset);
        idx.checked_sub(1).map(|i| &self.headings[i])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_headings_in_order() {
        let body = "Intro\n\n## Chapter 1\n\nbody\n\n### Details\n\nmore\n\n## Chapter 2\n\nend";
        let index = HeadingIndex::build(body);
        let found: Vec<(usize, &str)> = index
            .headings()
            .iter()
            .map(|h| (h.depth, h.title.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![(2, "Chapter 1"), (3, "Details"), (2, "Chapter 2")]
        );
        assert_eq!(index.headings()[0].start, body.find("## Chapter 1").unwrap());
    }

    #[test]
    fn test_code_fence_in_page_text_does_not_hide_later_headings() {
        let body = "Use ``` to open code\n\n## Chapter 1\n\n```\nlet x = 1;\n\n## Chapter 2\n\nCh2 body";
        let index = HeadingIndex::build(body);
        let titles: Vec<&str> = index.headings().iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["Chapter 1", "Chapter 2"]);

        let html = "<!-- open comment\n\n## After Comment\n\ntext";
        assert_eq!(HeadingIndex::build(html).headings()[0].title, "After Comment");
    }

    #[test]
    fn test_heading_line_parsing() {
        assert_eq!(parse_heading_line("## Chapter 1"), Some((2, "Chapter 1")));
        assert_eq!(parse_heading_line("# C#"), Some((1, "C#")));
        assert_eq!(parse_heading_line("###\tTabbed "), Some((3, "Tabbed")));
        assert_eq!(parse_heading_line("#hashtag"), None);
        assert_eq!(parse_heading_line("####### too deep"), None);
        assert_eq!(parse_heading_line("##   "), None);
        assert_eq!(parse_heading_line("  ## indented"), None);
        assert_eq!(parse_heading_line("plain"), None);
    }

    #[test]
    fn test_crlf_lines_keep_offsets() {
        let body = "pre\r\n## A\r\nbody";
        let index = HeadingIndex::build(body);
        assert_eq!(index.headings()[0].title, "A");
        assert_eq!(index.headings()[0].start, 5);
    }

    #[test]
    fn test_enclosing_heading() {
        let body = "pre\n\n## A\n\naaa\n\n## B\n\nbbb";
        let index = HeadingIndex::build(body);
        assert!(index.enclosing(0).is_none());
        assert_eq!(index.enclosing(body.find("aaa").unwrap()).unwrap().title, "A");
        assert_eq!(index.enclosing(body.find("## B").unwrap()).unwrap().title, "B");
        assert_eq!(index.enclosing(body.len()).unwrap().title, "B");
    }

    #[test]
    fn test_empty_body() {
        assert!(HeadingIndex::build("").is_empty());
    }
}
