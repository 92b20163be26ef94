//! Error types and handling for folio-core operations.
//!
//! Every public operation returns [`Result<T, Error>`]. Failures are structured
//! so that callers (the MCP server, the CLI) can map them onto their own
//! surfaces without string matching:
//!
//! - **Lookup errors**: unknown document ids, missing sections, out-of-range pages
//! - **Query errors**: malformed regular expressions and empty arguments
//! - **Acquisition errors**: fetch timeouts, failed fetches, undecodable bytes
//! - **Local errors**: file system, registry storage, configuration
//!
//! ## Recovery Hints
//!
//! ```rust
//! use folio_core::Error;
//!
//! let err = Error::FetchTimeout {
//!     url: "https://example.com/a.pdf".to_string(),
//!     timeout_secs: 60,
//! };
//! assert!(err.is_recoverable());
//! assert_eq!(err.category(), "timeout");
//! ```

use thiserror::Error;

/// The main error type for folio-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No document is registered under the requested id, or a local file is missing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A page index was outside `[1, total]`.
    #[error("Page {requested} is out of range (valid range: 1-{total})")]
    InvalidRange {
        /// Page index requested by the caller (1-based).
        requested: usize,
        /// Number of pages available.
        total: usize,
    },

    /// No heading matched the requested section title.
    ///
    /// `suggestions` holds the first few heading titles of the document in
    /// document order so callers can retry with a real title.
    #[error("Section '{query}' not found{}", format_suggestions(.suggestions))]
    SectionNotFound {
        /// Title the caller asked for.
        query: String,
        /// First heading titles found in the document.
        suggestions: Vec<String>,
    },

    /// The search pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// A caller-supplied argument was rejected before any work was done.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A remote fetch (or the decode that followed it) exceeded its deadline.
    ///
    /// ## Recoverability
    ///
    /// Typically recoverable: the remote host may simply have been slow.
    #[error("Timed out after {timeout_secs}s fetching '{url}'")]
    FetchTimeout {
        /// Locator being fetched.
        url: String,
        /// Timeout that elapsed.
        timeout_secs: u64,
    },

    /// A remote fetch returned a non-success status or failed in transport.
    #[error("Failed to fetch '{url}': {reason}")]
    FetchFailed {
        /// Locator being fetched.
        url: String,
        /// Status line or transport error.
        reason: String,
    },

    /// The decoding collaborator could not open the document at all.
    ///
    /// Per-page and per-outline-node failures never surface here; they are
    /// recorded on the loaded document instead.
    #[error("Decode error: {0}")]
    Decode(String),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Registry storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(". Available sections: {}", suggestions.join(", "))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Self::InvalidPattern(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// Timeouts and transport failures are worth retrying; lookup and argument
    /// errors are not, since the same call will fail the same way.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::FetchTimeout { .. } | Self::FetchFailed { .. } => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Useful for structured logging and for mapping onto protocol error codes.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::InvalidRange { .. } => "invalid_range",
            Self::SectionNotFound { .. } => "section_not_found",
            Self::InvalidPattern(_) => "invalid_pattern",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::FetchTimeout { .. } => "timeout",
            Self::FetchFailed { .. } => "fetch",
            Self::Decode(_) => "decode",
            Self::Io(_) => "io",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
        }
    }

    /// Whether the error was caused by the caller's input rather than by the
    /// environment.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::InvalidRange { .. }
                | Self::SectionNotFound { .. }
                | Self::InvalidPattern(_)
                | Self::InvalidArgument(_)
        )
    }
}

/// Result type alias for folio-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_display() {
        let err = Error::InvalidRange {
            requested: 5,
            total: 2,
        };
        assert_eq!(err.to_string(), "Page 5 is out of range (valid range: 1-2)");
        assert_eq!(err.category(), "invalid_range");
    }

    #[test]
    fn test_section_not_found_lists_suggestions() {
        let err = Error::SectionNotFound {
            query: "appendix".to_string(),
            suggestions: vec!["Intro".to_string(), "Methods".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'appendix'"));
        assert!(msg.contains("Intro, Methods"));

        let bare = Error::SectionNotFound {
            query: "x".to_string(),
            suggestions: Vec::new(),
        };
        assert_eq!(bare.to_string(), "Section 'x' not found");
    }

    #[test]
    fn test_recoverability() {
        let recoverable = [
            Error::FetchTimeout {
                url: "https://example.com".to_string(),
                timeout_secs: 1,
            },
            Error::FetchFailed {
                url: "https://example.com".to_string(),
                reason: "503 Service Unavailable".to_string(),
            },
            Error::Io(std::io::Error::new(std::io::ErrorKind::TimedOut, "slow")),
        ];
        for err in recoverable {
            assert!(err.is_recoverable(), "{err} should be recoverable");
        }

        let permanent = [
            Error::NotFound("doc".to_string()),
            Error::InvalidPattern("(".to_string()),
            Error::Decode("not a pdf".to_string()),
        ];
        for err in permanent {
            assert!(!err.is_recoverable(), "{err} should not be recoverable");
        }
    }

    #[test]
    fn test_regex_error_conversion() {
        let err: Error = regex::Regex::new("(unclosed").unwrap_err().into();
        assert!(matches!(err, Error::InvalidPattern(_)));
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io_err.into();
        assert_eq!(err.category(), "io");
        assert!(!err.is_caller_error());
    }
}
