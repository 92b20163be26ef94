//! # folio-core
//!
//! Core functionality for folio: turn PDF documents into structured markdown
//! and answer section, page and search queries against them.
//!
//! ## Architecture
//!
//! - **Acquisition**: [`Loader`] reads a file or fetches a URL ([`Fetcher`]) and
//!   hands the bytes to a [`DocumentDecoder`] ([`LopdfDecoder`] for PDF)
//! - **Synthesis**: the outline is flattened into page spans and spliced into
//!   the page texts as markdown headings ([`synth`])
//! - **Queries**: heading lookup ([`section`]), paragraph pagination
//!   ([`paginate`]) and regex search with section attribution ([`search`])
//! - **State**: an in-memory [`DocumentStore`] plus a persisted registry of
//!   `{id, locator}` pairs ([`Storage`]), both owned by [`Library`]
//!
//! ## Quick Start
//!
//! ```rust
//! use folio_core::{HeadingIndex, OutlineNode, section, synth};
//!
//! let pages = vec!["Intro".to_string(), "Ch1 body".to_string()];
//! let outline = vec![OutlineNode::new("Chapter 1", 1, Some(2))];
//! let body = synth::synthesize(&pages, &outline);
//! assert_eq!(body, "Intro\n\n## Chapter 1\n\nCh1 body");
//!
//! let index = HeadingIndex::build(&body);
//! let found = section::locate(&body, &index, "chapter")?;
//! assert_eq!(found.title, "Chapter 1");
//! # Ok::<(), folio_core::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`]:
//!
//! ```rust
//! use folio_core::{Error, paginate};
//!
//! let pages = paginate::paginate("short", 100);
//! match paginate::select_page(&pages, 3) {
//!     Err(Error::InvalidRange { requested, total }) => {
//!         assert_eq!((requested, total), (3, 1));
//!     },
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

/// Configuration loading and defaults
pub mod config;
/// Decoding collaborator boundary and the PDF decoder
pub mod decode;
/// Error types and result aliases
pub mod error;
/// HTTP fetching with timeouts
pub mod fetcher;
/// Heading discovery over synthesized bodies
pub mod headings;
/// The library facade
pub mod library;
/// Source acquisition and boundary validation
pub mod loader;
/// Locator normalization and id assignment
pub mod locator;
/// Paragraph-boundary pagination
pub mod paginate;
/// Section-attributed search
pub mod search;
/// Section lookup by title
pub mod section;
/// Registry persistence
pub mod storage;
/// In-memory document store
pub mod store;
/// Markdown body synthesis from pages and outline
pub mod synth;
/// Core data types
pub mod types;

pub use config::{Config, FetchConfig, PaginationConfig, PathsConfig, SearchConfig};
pub use decode::{
    DecodeContext, DecodedDocument, DocumentDecoder, LopdfDecoder, PageExtraction, RawDestination,
    RawOutlineItem,
};
pub use error::{Error, Result};
pub use fetcher::Fetcher;
pub use headings::{Heading, HeadingIndex};
pub use library::{Library, RestoreFailure, RestoreReport, SearchRequest, format_outline};
pub use loader::Loader;
pub use search::SearchOptions;
pub use storage::{RegistryEntry, Storage};
pub use store::DocumentStore;
pub use types::{
    Document, DocumentInfo, DocumentSummary, ExtractionIssue, LoadOutcome, OutlineNode, SearchGroup,
    SearchMatch, SectionPage,
};
