//! Schema classification and the per-family extraction strategies.
//!
//! Classification is a priority-ordered table of structural predicates.
//! Each entry pairs a predicate with the key-extraction strategy for that
//! family, so supporting a fourth schema is one new table row plus a
//! `DocumentType` variant.

use roxmltree::Document;
use shared_types::DocumentType;
use tracing::debug;
use uuid::Uuid;

use crate::errors::ParseError;
use crate::extract::{
    self, bound_key, descendant, descendant_text, ExtractedDocument,
};

/// One schema family: how to recognize it and how to derive its key.
struct SchemaRule {
    document_type: DocumentType,
    matches: fn(&Document<'_>) -> bool,
    document_key: fn(&Document<'_>) -> String,
}

/// Priority-ordered rule table; first match wins.
static RULES: [SchemaRule; 3] = [
    SchemaRule {
        document_type: DocumentType::Nfe,
        matches: |doc| {
            doc.root_element().has_tag_name("nfeProc")
                || descendant(doc, "NFe").is_some()
        },
        document_key: |doc| attribute_key(doc, "infNFe", "NFe"),
    },
    SchemaRule {
        document_type: DocumentType::Cte,
        matches: |doc| {
            doc.root_element().has_tag_name("cteProc")
                || descendant(doc, "CTe").is_some()
        },
        document_key: |doc| attribute_key(doc, "infCte", "CTe"),
    },
    SchemaRule {
        document_type: DocumentType::Nfse,
        matches: |doc| descendant(doc, "infNfse").is_some(),
        // No access-key attribute in this family: fall back to the numbered
        // document field, then to a random key. The random fallback defeats
        // key-based dedup for NFSe and is a documented correctness gap.
        document_key: |doc| {
            descendant_text(doc, "Numero").unwrap_or_else(|| Uuid::new_v4().to_string())
        },
    },
];

/// Key from an `Id` attribute with its fixed literal prefix stripped,
/// e.g. `Id="NFe3522..."` becomes `3522...`. Empty when absent.
fn attribute_key(doc: &Document<'_>, element: &str, prefix: &str) -> String {
    descendant(doc, element)
        .and_then(|n| n.attribute("Id"))
        .map(|id| id.replace(prefix, ""))
        .unwrap_or_default()
}

/// Classify a parsed document, without extracting fields.
///
/// # Errors
///
/// `ParseError::UnrecognizedDocumentType` when no predicate matches.
pub fn classify(doc: &Document<'_>) -> Result<DocumentType, ParseError> {
    RULES
        .iter()
        .find(|rule| (rule.matches)(doc))
        .map(|rule| rule.document_type)
        .ok_or(ParseError::UnrecognizedDocumentType)
}

/// Classify raw XML text and extract the canonical business fields.
///
/// # Errors
///
/// - `ParseError::MalformedXml` when the text does not parse
/// - `ParseError::UnrecognizedDocumentType` when no family matches
///
/// Missing optional fields never fail; they degrade to empty strings, a
/// zero total, or the current time per the extraction contract.
pub fn classify_and_extract(xml: &str) -> Result<ExtractedDocument, ParseError> {
    let doc = Document::parse(xml)?;

    let rule = RULES
        .iter()
        .find(|rule| (rule.matches)(&doc))
        .ok_or(ParseError::UnrecognizedDocumentType)?;

    let document_key = bound_key((rule.document_key)(&doc));
    let (emitter_tax_id, emitter_name, emitter_region) = extract::extract_emitter(&doc);
    let (recipient_tax_id, recipient_name) = extract::extract_recipient(&doc);

    debug!(
        document_type = %rule.document_type,
        document_key = %document_key,
        "Classified fiscal document"
    );

    Ok(ExtractedDocument {
        document_type: rule.document_type,
        document_key,
        emitter_tax_id,
        emitter_name,
        emitter_region,
        recipient_tax_id,
        recipient_name,
        total_value: extract::extract_total_value(&doc),
        issue_date: extract::extract_issue_date(&doc),
    })
}
