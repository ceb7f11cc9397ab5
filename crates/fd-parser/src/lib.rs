//! # Fiscal XML Classifier/Extractor
//!
//! Pure functions from raw XML text to structured fiscal-record fields.
//!
//! ## Classification
//!
//! Three mutually-incompatible schema families are recognized through a
//! priority-ordered table of structural predicates (first match wins):
//!
//! | Priority | Predicate | Family |
//! |----------|-----------|--------|
//! | 1 | root `nfeProc` or descendant `NFe` | invoice (NFe) |
//! | 2 | root `cteProc` or descendant `CTe` | transport waybill (CTe) |
//! | 3 | descendant `infNfse` | service invoice (NFSe) |
//!
//! No match is `ParseError::UnrecognizedDocumentType`; unparsable text is
//! `ParseError::MalformedXml`. Those two are the only fatal outcomes.
//!
//! ## Extraction
//!
//! Field extraction never fails on absent optional fields: names degrade to
//! the empty string, the total value to zero, the issue date to the current
//! time. Fallback chains follow the source schemas (`xNome` then
//! `RazaoSocial`, `vNF` then `vPrest` then `ValorServicos`, ...).

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod classifier;
pub mod errors;
pub mod extract;

pub use classifier::{classify, classify_and_extract};
pub use errors::ParseError;
pub use extract::ExtractedDocument;
