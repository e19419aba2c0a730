//! Error types for the pagelayout library.

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pagelayout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading or normalizing pages.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Page dump could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input is neither a PDF nor a page dump.
    #[error("Unknown file format: expected a PDF or a JSON page dump")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error reading the PDF object structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and requires a password.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The page cannot be normalized at all (e.g. non-positive size).
    #[error("Invalid page: {0}")]
    InvalidPage(String),

    /// Invalid page range string.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// A recoverable page issue promoted to an error by strict mode.
    #[error("Page issue: {0}")]
    Issue(#[from] PageIssue),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

/// Malformed content stream detected during shape extraction.
///
/// Extraction stops at the offending token; the shapes found before it are kept.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreamError {
    /// An operator needed more operands than the stream provides.
    #[error("operator `{operator}` at token {position} is missing operands")]
    OperandUnderflow { operator: String, position: usize },

    /// A token in operand position is not a number.
    #[error("operator `{operator}` expected a number but found `{token}` at token {position}")]
    NonNumericOperand {
        operator: String,
        token: String,
        position: usize,
    },

    /// A restore operator without a matching save.
    #[error("restore at token {position} has no matching save")]
    UnbalancedRestore { position: usize },
}

/// Recoverable problem found while normalizing one page.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum PageIssue {
    /// Shape extraction stopped early.
    #[error("malformed content stream: {error}")]
    MalformedStream { error: StreamError },

    /// No left margin candidate; the default margin was used.
    #[error("no left margin candidate, default margin applied")]
    NoMarginCandidate,

    /// Blocks with non-positive geometry were removed.
    #[error("{count} block(s) with degenerate geometry dropped")]
    DroppedBlocks { count: usize },

    /// The page size is not positive; the layout was passed through untouched.
    #[error("invalid page size {width}x{height}, layout left as decoded")]
    InvalidPageSize { width: f32, height: f32 },
}

impl From<StreamError> for PageIssue {
    fn from(error: StreamError) -> Self {
        PageIssue::MalformedStream { error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_stream_error_display() {
        let err = StreamError::OperandUnderflow {
            operator: "re".to_string(),
            position: 2,
        };
        assert_eq!(
            err.to_string(),
            "operator `re` at token 2 is missing operands"
        );
    }

    #[test]
    fn test_issue_promotes_to_error() {
        let issue: PageIssue = StreamError::UnbalancedRestore { position: 0 }.into();
        let err: Error = issue.into();
        assert!(matches!(
            err,
            Error::Issue(PageIssue::MalformedStream { .. })
        ));
        assert!(err.to_string().contains("no matching save"));
    }

    #[test]
    fn test_invalid_size_issue_serializes() {
        let issue = PageIssue::InvalidPageSize {
            width: 0.0,
            height: 792.0,
        };
        let json = serde_json::to_string(&issue).unwrap();
        assert_eq!(
            json,
            r#"{"issue":"invalid_page_size","width":0.0,"height":792.0}"#
        );
    }

    #[test]
    fn test_issue_serializes_tagged() {
        let json = serde_json::to_string(&PageIssue::DroppedBlocks { count: 2 }).unwrap();
        assert_eq!(json, r#"{"issue":"dropped_blocks","count":2}"#);
    }
}
