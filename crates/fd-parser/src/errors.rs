//! Classification and parse error types.

use thiserror::Error;

/// Fatal outcomes of classification/extraction.
///
/// Everything else (missing names, values, dates) degrades to documented
/// defaults instead of erroring.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The submitted text is not well-formed XML.
    #[error("Malformed XML: {0}")]
    MalformedXml(#[from] roxmltree::Error),

    /// No schema-family predicate matched the document structure.
    #[error("Unrecognized fiscal document type")]
    UnrecognizedDocumentType,
}
