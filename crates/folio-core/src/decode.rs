//! Decoding collaborator boundary.
//!
//! A [`DocumentDecoder`] turns raw bytes into loosely typed page texts, outline
//! items and metadata. Nothing here is trusted by synthesis directly: the loader
//! validates and narrows a [`DecodedDocument`] before use.
//!
//! [`LopdfDecoder`] is the PDF implementation backed by `lopdf`.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::{Duration, Instant};

use lopdf::{Dictionary, Document as PdfDocument, Object, ObjectId};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Outcome of extracting one page: its text, or why extraction failed.
pub type PageExtraction = std::result::Result<String, String>;

/// Where an outline item points, as reported by the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDestination {
    /// A page number as the decoder saw it (expected 1-based, not yet validated).
    Page(i64),
    /// A destination exists but could not be resolved.
    Unresolved(String),
    /// The item has no destination at all.
    Missing,
}

/// An outline item straight from the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutlineItem {
    pub title: Option<String>,
    pub destination: RawDestination,
    pub children: Vec<RawOutlineItem>,
}

/// Everything a decoder reports about a document.
#[derive(Debug, Clone, Default)]
pub struct DecodedDocument {
    /// One entry per page, in page order.
    pub pages: Vec<PageExtraction>,
    pub outline: Vec<RawOutlineItem>,
    pub metadata: Map<String, Value>,
}

impl DecodedDocument {
    /// Number of pages, which is the number of page entries.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Deadline and identity of the load a decode belongs to.
#[derive(Debug, Clone)]
pub struct DecodeContext {
    pub locator: String,
    pub timeout: Duration,
    pub deadline: Option<Instant>,
}

impl DecodeContext {
    pub fn new(locator: impl Into<String>, timeout: Duration, deadline: Option<Instant>) -> Self {
        Self {
            locator: locator.into(),
            timeout,
            deadline,
        }
    }

    /// Fail with [`Error::FetchTimeout`] once the deadline has passed.
    pub fn check_deadline(&self) -> Result<()> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Error::FetchTimeout {
                url: self.locator.clone(),
                timeout_secs: self.timeout.as_secs(),
            }),
            _ => Ok(()),
        }
    }
}

/// Decodes document bytes into pages, outline and metadata.
pub trait DocumentDecoder: Send + Sync {
    /// Decode `bytes`. Per-page and per-item failures must be reported inside
    /// the result; an `Err` means the document could not be opened at all.
    fn decode(&self, bytes: &[u8], ctx: &DecodeContext) -> Result<DecodedDocument>;
}

/// PDF decoder backed by `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfDecoder;

impl LopdfDecoder {
    pub const fn new() -> Self {
        Self
    }
}

impl DocumentDecoder for LopdfDecoder {
    fn decode(&self, bytes: &[u8], ctx: &DecodeContext) -> Result<DecodedDocument> {
        let doc = PdfDocument::load_mem(bytes).map_err(|e| Error::Decode(e.to_string()))?;

        let page_ids = doc.get_pages();
        let mut pages = Vec::with_capacity(page_ids.len());
        for &number in page_ids.keys() {
            ctx.check_deadline()?;
            let extraction = doc
                .extract_text(&[number])
                .map_err(|e| format!("Text extraction failed: {e}"));
            if let Err(reason) = &extraction {
                warn!(page = number, %reason, "page text unavailable");
            }
            pages.push(extraction);
        }

        ctx.check_deadline()?;
        let resolver = DestinationResolver::new(&doc, &page_ids);
        let outline = extract_outline(&doc, &resolver);
        let metadata = extract_metadata(&doc);

        debug!(
            pages = pages.len(),
            outline_roots = outline.len(),
            "decoded PDF"
        );

        Ok(DecodedDocument {
            pages,
            outline,
            metadata,
        })
    }
}

/// Follow a reference to the object it points at.
fn deref<'a>(doc: &'a PdfDocument, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn deref_dict<'a>(doc: &'a PdfDocument, obj: &'a Object) -> Option<&'a Dictionary> {
    deref(doc, obj).and_then(|o| o.as_dict().ok())
}

/// Decode a PDF text string (UTF-16BE with BOM, UTF-8, or PDFDocEncoding).
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

fn object_text(doc: &PdfDocument, obj: &Object) -> Option<String> {
    match deref(doc, obj)? {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

/// Resolves outline destinations to 1-based page numbers.
struct DestinationResolver<'a> {
    doc: &'a PdfDocument,
    page_numbers: HashMap<ObjectId, u32>,
    named: HashMap<Vec<u8>, &'a Object>,
}

impl<'a> DestinationResolver<'a> {
    fn new(doc: &'a PdfDocument, pages: &BTreeMap<u32, ObjectId>) -> Self {
        let page_numbers = pages.iter().map(|(&num, &id)| (id, num)).collect();
        Self {
            doc,
            page_numbers,
            named: collect_named_destinations(doc),
        }
    }

    fn resolve(&self, dest: &'a Object) -> RawDestination {
        let Some(dest) = deref(self.doc, dest) else {
            return RawDestination::Unresolved("dangling destination reference".into());
        };

        match dest {
            Object::Array(items) => self.resolve_explicit(items),
            Object::String(name, _) | Object::Name(name) => match self.named.get(name) {
                Some(target) => match deref(self.doc, target) {
                    Some(Object::Array(items)) => self.resolve_explicit(items),
                    Some(Object::Dictionary(dict)) => match dict.get(b"D") {
                        Ok(inner) => match deref(self.doc, inner) {
                            Some(Object::Array(items)) => self.resolve_explicit(items),
                            _ => RawDestination::Unresolved("malformed named destination".into()),
                        },
                        Err(_) => RawDestination::Unresolved("malformed named destination".into()),
                    },
                    _ => RawDestination::Unresolved("malformed named destination".into()),
                },
                None => RawDestination::Unresolved(format!(
                    "unknown named destination '{}'",
                    String::from_utf8_lossy(name)
                )),
            },
            _ => RawDestination::Unresolved("unsupported destination type".into()),
        }
    }

    fn resolve_explicit(&self, items: &[Object]) -> RawDestination {
        match items.first() {
            Some(Object::Reference(id)) => self.page_numbers.get(id).map_or_else(
                || RawDestination::Unresolved("destination page is not in the page tree".into()),
                |&num| RawDestination::Page(i64::from(num)),
            ),
            // Remote-style destinations carry a 0-based page index.
            Some(Object::Integer(index)) => RawDestination::Page(index.saturating_add(1)),
            _ => RawDestination::Unresolved("empty destination array".into()),
        }
    }

    fn resolve_item(&self, item: &'a Dictionary) -> RawDestination {
        if let Ok(dest) = item.get(b"Dest") {
            return self.resolve(dest);
        }

        let Some(action) = item.get(b"A").ok().and_then(|a| deref_dict(self.doc, a)) else {
            return RawDestination::Missing;
        };
        let is_goto = action
            .get(b"S")
            .ok()
            .and_then(|s| s.as_name().ok())
            .is_none_or(|s| s == b"GoTo");
        if !is_goto {
            return RawDestination::Unresolved("action is not a GoTo".into());
        }
        action
            .get(b"D")
            .map_or(RawDestination::Missing, |dest| self.resolve(dest))
    }
}

/// Named destinations from the legacy `/Dests` dictionary and the `/Names`
/// name tree.
fn collect_named_destinations(doc: &PdfDocument) -> HashMap<Vec<u8>, &Object> {
    let mut named = HashMap::new();
    let Ok(catalog) = doc.catalog() else {
        return named;
    };

    if let Some(dests) = catalog.get(b"Dests").ok().and_then(|d| deref_dict(doc, d)) {
        for (key, value) in dests.iter() {
            named.insert(key.clone(), value);
        }
    }

    let root = catalog
        .get(b"Names")
        .ok()
        .and_then(|n| deref_dict(doc, n))
        .and_then(|names| names.get(b"Dests").ok())
        .and_then(|d| deref_dict(doc, d));

    let mut stack: Vec<&Dictionary> = root.into_iter().collect();
    let mut visited: HashSet<*const Dictionary> = HashSet::new();
    while let Some(node) = stack.pop() {
        if !visited.insert(std::ptr::from_ref(node)) {
            continue;
        }
        if let Ok(Object::Array(pairs)) = node.get(b"Names") {
            for pair in pairs.chunks_exact(2) {
                if let Object::String(name, _) = &pair[0] {
                    named.insert(name.clone(), &pair[1]);
                }
            }
        }
        if let Some(Object::Array(kids)) = node.get(b"Kids").ok().and_then(|k| deref(doc, k)) {
            stack.extend(kids.iter().filter_map(|kid| deref_dict(doc, kid)));
        }
    }

    named
}

/// Walk `/Outlines` iteratively, following `First`/`Next` links.
fn extract_outline(doc: &PdfDocument, resolver: &DestinationResolver<'_>) -> Vec<RawOutlineItem> {
    let first = doc
        .catalog()
        .ok()
        .and_then(|c| c.get(b"Outlines").ok())
        .and_then(|o| deref_dict(doc, o))
        .and_then(|o| o.get(b"First").ok())
        .and_then(|f| f.as_reference().ok());

    let Some(first) = first else {
        return Vec::new();
    };

    // Pre-order arena: (item, parent index).
    let mut arena: Vec<(Option<RawOutlineItem>, Option<usize>)> = Vec::new();
    let mut visited: HashSet<ObjectId> = HashSet::new();
    let mut stack: Vec<(ObjectId, Option<usize>)> = vec![(first, None)];

    while let Some((id, parent)) = stack.pop() {
        if !visited.insert(id) {
            warn!(?id, "outline cycle detected; skipping repeated item");
            continue;
        }
        let Ok(dict) = doc.get_dictionary(id) else {
            continue;
        };

        let index = arena.len();
        arena.push((
            Some(RawOutlineItem {
                title: dict.get(b"Title").ok().and_then(|t| object_text(doc, t)),
                destination: resolver.resolve_item(dict),
                children: Vec::new(),
            }),
            parent,
        ));

        // Next sibling below first child so children are visited first.
        if let Some(next) = dict.get(b"Next").ok().and_then(|n| n.as_reference().ok()) {
            stack.push((next, parent));
        }
        if let Some(child) = dict.get(b"First").ok().and_then(|f| f.as_reference().ok()) {
            stack.push((child, Some(index)));
        }
    }

    let mut roots = Vec::new();
    for i in (0..arena.len()).rev() {
        let Some(mut item) = arena[i].0.take() else {
            continue;
        };
        item.children.reverse();
        match arena[i].1 {
            Some(parent) => {
                if let Some(parent_item) = arena[parent].0.as_mut() {
                    parent_item.children.push(item);
                }
            },
            None => roots.push(item),
        }
    }
    roots.reverse();
    roots
}

/// Parse a PDF date string (`D:YYYYMMDDHHmmSS...`) into RFC 3339.
fn parse_pdf_date(raw: &str) -> Option<String> {
    let s = raw.strip_prefix("D:").unwrap_or(raw);
    let field = |range: std::ops::Range<usize>, default: u32| {
        s.get(range).and_then(|v| v.parse().ok()).unwrap_or(default)
    };
    let year: i32 = s.get(0..4)?.parse().ok()?;
    chrono::NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))
        .and_then(|date| date.and_hms_opt(field(8..10, 0), field(10..12, 0), field(12..14, 0)))
        .map(|dt| dt.and_utc().to_rfc3339())
}

fn extract_metadata(doc: &PdfDocument) -> Map<String, Value> {
    let mut metadata = Map::new();
    metadata.insert("pdfVersion".into(), Value::String(doc.version.clone()));
    metadata.insert("encrypted".into(), Value::Bool(doc.is_encrypted()));

    let Some(info) = doc.trailer.get(b"Info").ok().and_then(|i| deref_dict(doc, i)) else {
        return metadata;
    };

    for (key, value) in info.iter() {
        let key = String::from_utf8_lossy(key).into_owned();
        let Some(text) = object_text(doc, value) else {
            continue;
        };
        let value = if key.ends_with("Date") {
            parse_pdf_date(&text).unwrap_or(text)
        } else {
            text
        };
        metadata.insert(key, Value::String(value));
    }

    metadata
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lopdf::{Stream, StringFormat, dictionary};

    #[test]
    fn test_integer_destination_does_not_overflow() {
        let doc = PdfDocument::with_version("1.5");
        let extreme = Object::Array(vec![Object::Integer(i64::MAX), "Fit".into()]);
        let indexed = Object::Array(vec![Object::Integer(2), "Fit".into()]);
        let resolver = DestinationResolver::new(&doc, &BTreeMap::new());

        assert_eq!(resolver.resolve(&extreme), RawDestination::Page(i64::MAX));
        assert_eq!(resolver.resolve(&indexed), RawDestination::Page(3));
    }

    /// Build a PDF with one text page per entry and an outline of
    /// `(title, page index)` roots.
    fn build_pdf(page_texts: &[&str], outline: &[(&str, usize)]) -> Vec<u8> {
        let mut doc = PdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        let mut page_ids = Vec::new();
        for text in page_texts {
            let content = format!("BT /F1 12 Tf 72 712 Td ({text}) Tj ET");
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
            page_ids.push(page_id);
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => i64::try_from(page_texts.len()).unwrap(),
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };

        if !outline.is_empty() {
            let outlines_id = doc.new_object_id();
            let item_ids: Vec<ObjectId> = outline.iter().map(|_| doc.new_object_id()).collect();
            for (i, (title, page)) in outline.iter().enumerate() {
                let mut item = dictionary! {
                    "Title" => Object::String(title.as_bytes().to_vec(), StringFormat::Literal),
                    "Parent" => outlines_id,
                    "Dest" => vec![Object::Reference(page_ids[*page]), "Fit".into()],
                };
                if let Some(next) = item_ids.get(i + 1) {
                    item.set("Next", *next);
                }
                doc.objects.insert(item_ids[i], Object::Dictionary(item));
            }
            doc.objects.insert(
                outlines_id,
                Object::Dictionary(dictionary! {
                    "Type" => "Outlines",
                    "First" => item_ids[0],
                    "Last" => item_ids[item_ids.len() - 1],
                }),
            );
            catalog.set("Outlines", outlines_id);
        }

        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal("Test Document"),
            "CreationDate" => Object::string_literal("D:20240115103045"),
        });
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn ctx() -> DecodeContext {
        DecodeContext::new("test.pdf", Duration::from_secs(5), None)
    }

    #[test]
    fn test_decodes_pages_outline_and_metadata() {
        let bytes = build_pdf(&["Intro", "Chapter one", "Chapter two"], &[("One", 1), ("Two", 2)]);
        let decoded = LopdfDecoder::new().decode(&bytes, &ctx()).unwrap();

        assert_eq!(decoded.pages.len(), 3);
        assert!(decoded.pages[1].as_ref().unwrap().contains("Chapter one"));

        let titles: Vec<_> = decoded
            .outline
            .iter()
            .map(|item| (item.title.clone().unwrap(), item.destination.clone()))
            .collect();
        assert_eq!(
            titles,
            vec![
                ("One".to_string(), RawDestination::Page(2)),
                ("Two".to_string(), RawDestination::Page(3)),
            ]
        );

        assert_eq!(decoded.metadata["Title"], "Test Document");
        assert_eq!(decoded.metadata["CreationDate"], "2024-01-15T10:30:45+00:00");
        assert_eq!(decoded.metadata["encrypted"], false);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let result = LopdfDecoder::new().decode(b"definitely not a pdf", &ctx());
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_expired_deadline_aborts() {
        let bytes = build_pdf(&["a"], &[]);
        let expired = DecodeContext::new(
            "slow.pdf",
            Duration::from_secs(1),
            Instant::now().checked_sub(Duration::from_millis(1)),
        );
        let result = LopdfDecoder::new().decode(&bytes, &expired);
        assert!(matches!(result, Err(Error::FetchTimeout { .. })));
    }

    #[test]
    fn test_text_string_decoding() {
        assert_eq!(decode_text_string(b"plain"), "plain");
        assert_eq!(decode_text_string(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0xE9]), "Aé");
        assert_eq!(decode_text_string(&[0x63, 0x61, 0x66, 0xE9]), "café");
    }

    #[test]
    fn test_pdf_date_parsing() {
        assert_eq!(
            parse_pdf_date("D:2024").as_deref(),
            Some("2024-01-01T00:00:00+00:00")
        );
        assert!(parse_pdf_date("yesterday").is_none());
    }
}
