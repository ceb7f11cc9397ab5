//! Field extraction with fallback chains.
//!
//! Every helper here degrades instead of failing: an absent tag yields the
//! chain's next candidate, then the documented default. Only classification
//! and malformed XML are fatal, and those live in `classifier`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use roxmltree::{Document, Node};
use rust_decimal::Decimal;
use shared_types::constants::limits;
use shared_types::DocumentType;
use tracing::debug;

/// Structured fields pulled out of one classified document.
///
/// Carries only what extraction produces; ids, server timestamps, and the
/// encrypted payload are the coordinator's business.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    /// Schema family the document matched.
    pub document_type: DocumentType,
    /// Business-identity key (prefix-stripped attribute or numbered field).
    pub document_key: String,
    /// Emitter tax id, empty when absent.
    pub emitter_tax_id: String,
    /// Emitter legal name, empty when absent.
    pub emitter_name: String,
    /// Emitter region code, empty when absent.
    pub emitter_region: String,
    /// Recipient tax id, empty when absent.
    pub recipient_tax_id: String,
    /// Recipient legal name, empty when absent.
    pub recipient_name: String,
    /// Total value; absent or unparsable maps to zero.
    pub total_value: Decimal,
    /// Issue date; absent or unparsable maps to now.
    pub issue_date: DateTime<Utc>,
}

/// First descendant (document order) with the given local tag name.
pub(crate) fn descendant<'a, 'input>(
    doc: &'a Document<'input>,
    name: &str,
) -> Option<Node<'a, 'input>> {
    doc.descendants().find(|n| n.has_tag_name(name))
}

/// Trimmed text of the first descendant with the given name.
pub(crate) fn descendant_text(doc: &Document<'_>, name: &str) -> Option<String> {
    descendant(doc, name)
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Walk a fallback chain of tag names, returning the first non-empty text.
pub(crate) fn first_text(doc: &Document<'_>, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| descendant_text(doc, name))
}

/// Text of the first descendant of `node` with the given name.
fn inner_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.descendants()
        .find(|n| n.has_tag_name(name))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Fallback chain over descendant names inside a block node.
fn inner_first_text(node: Node<'_, '_>, names: &[&str]) -> String {
    names
        .iter()
        .find_map(|name| inner_text(node, name))
        .unwrap_or_default()
}

/// Emitter fields: the `emit` block (NFe/CTe) or `PrestadorServico` (NFSe).
pub(crate) fn extract_emitter(doc: &Document<'_>) -> (String, String, String) {
    let Some(block) = descendant(doc, "emit").or_else(|| descendant(doc, "PrestadorServico"))
    else {
        return (String::new(), String::new(), String::new());
    };

    let tax_id = inner_first_text(block, &["CNPJ"]);
    let name = bound_name(inner_first_text(block, &["xNome", "RazaoSocial"]));
    let region = inner_first_text(block, &["UF"]);
    (tax_id, name, region)
}

/// Recipient fields: the `dest` block (NFe/CTe) or `TomadorServico` (NFSe).
pub(crate) fn extract_recipient(doc: &Document<'_>) -> (String, String) {
    let Some(block) = descendant(doc, "dest").or_else(|| descendant(doc, "TomadorServico")) else {
        return (String::new(), String::new());
    };

    let tax_id = inner_first_text(block, &["CNPJ", "CPF"]);
    let name = bound_name(inner_first_text(block, &["xNome", "RazaoSocial"]));
    (tax_id, name)
}

/// Total value: `vNF`, then `vPrest`, then `ValorServicos`, else zero.
///
/// Unparsable or negative values also map to zero, keeping the stored
/// record's non-negativity invariant.
pub(crate) fn extract_total_value(doc: &Document<'_>) -> Decimal {
    let Some(raw) = first_text(doc, &["vNF", "vPrest", "ValorServicos"]) else {
        return Decimal::ZERO;
    };

    match raw.parse::<Decimal>() {
        Ok(value) if value >= Decimal::ZERO => value,
        Ok(value) => {
            debug!(%value, "Negative total value in source XML, storing zero");
            Decimal::ZERO
        }
        Err(_) => {
            debug!(raw = %raw, "Unparsable total value in source XML, storing zero");
            Decimal::ZERO
        }
    }
}

/// Issue date: `dhEmi`, then `dEmi`, then `DataEmissao`, else now.
pub(crate) fn extract_issue_date(doc: &Document<'_>) -> DateTime<Utc> {
    first_text(doc, &["dhEmi", "dEmi", "DataEmissao"])
        .and_then(|raw| parse_date(&raw))
        .unwrap_or_else(Utc::now)
}

/// Parse the date shapes the three schemas emit: RFC 3339 with offset,
/// naive datetime, or a bare date (midnight UTC).
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}

/// Bound a document key to the storage column limit.
pub(crate) fn bound_key(key: String) -> String {
    if key.len() > limits::MAX_DOCUMENT_KEY {
        key.chars().take(limits::MAX_DOCUMENT_KEY).collect()
    } else {
        key
    }
}

/// Bound a party name to the storage column limit.
fn bound_name(name: String) -> String {
    if name.chars().count() > limits::MAX_NAME {
        name.chars().take(limits::MAX_NAME).collect()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Document<'_> {
        Document::parse(xml).unwrap()
    }

    #[test]
    fn test_first_text_walks_fallback_chain() {
        let xml = "<root><b>second</b></root>";
        let doc = parse(xml);
        assert_eq!(first_text(&doc, &["a", "b"]), Some("second".into()));
        assert_eq!(first_text(&doc, &["a", "c"]), None);
    }

    #[test]
    fn test_emitter_from_nfse_block() {
        let xml = "<x><PrestadorServico>\
                   <CNPJ>12345678000195</CNPJ>\
                   <RazaoSocial>Servicos SA</RazaoSocial>\
                   </PrestadorServico></x>";
        let doc = parse(xml);
        let (tax_id, name, region) = extract_emitter(&doc);
        assert_eq!(tax_id, "12345678000195");
        assert_eq!(name, "Servicos SA");
        assert_eq!(region, "");
    }

    #[test]
    fn test_emitter_prefers_xnome_over_razao_social() {
        let xml = "<x><emit><xNome>Primary</xNome><RazaoSocial>Legacy</RazaoSocial></emit></x>";
        let (_, name, _) = extract_emitter(&parse(xml));
        assert_eq!(name, "Primary");
    }

    #[test]
    fn test_missing_emitter_block_degrades_to_empty() {
        let (tax_id, name, region) = extract_emitter(&parse("<x/>"));
        assert!(tax_id.is_empty() && name.is_empty() && region.is_empty());
    }

    #[test]
    fn test_recipient_cpf_fallback() {
        let xml = "<x><dest><CPF>12345678901</CPF><xNome>Pessoa</xNome></dest></x>";
        let (tax_id, name) = extract_recipient(&parse(xml));
        assert_eq!(tax_id, "12345678901");
        assert_eq!(name, "Pessoa");
    }

    #[test]
    fn test_total_value_chain_and_default() {
        assert_eq!(
            extract_total_value(&parse("<x><vPrest>1500.75</vPrest></x>")),
            Decimal::new(150075, 2)
        );
        assert_eq!(extract_total_value(&parse("<x/>")), Decimal::ZERO);
        assert_eq!(extract_total_value(&parse("<x><vNF>abc</vNF></x>")), Decimal::ZERO);
        assert_eq!(extract_total_value(&parse("<x><vNF>-5.00</vNF></x>")), Decimal::ZERO);
    }

    #[test]
    fn test_issue_date_formats() {
        let doc = parse("<x><dhEmi>2024-03-15T10:30:00-03:00</dhEmi></x>");
        let dt = extract_issue_date(&doc);
        assert_eq!(dt.to_rfc3339(), "2024-03-15T13:30:00+00:00");

        let doc = parse("<x><dEmi>2024-03-15</dEmi></x>");
        let dt = extract_issue_date(&doc);
        assert_eq!(dt.date_naive().to_string(), "2024-03-15");
    }

    #[test]
    fn test_issue_date_defaults_to_now() {
        let before = Utc::now();
        let dt = extract_issue_date(&parse("<x><dhEmi>not a date</dhEmi></x>"));
        assert!(dt >= before);
    }

    #[test]
    fn test_bound_key_truncates() {
        let long = "9".repeat(80);
        assert_eq!(bound_key(long).len(), limits::MAX_DOCUMENT_KEY);
        assert_eq!(bound_key("short".into()), "short");
    }

    #[test]
    fn test_overlong_names_bounded_at_extraction() {
        let long_name = "N".repeat(limits::MAX_NAME + 50);
        let xml = format!("<x><emit><xNome>{long_name}</xNome></emit></x>");
        let (_, name, _) = extract_emitter(&parse(&xml));
        assert_eq!(name.chars().count(), limits::MAX_NAME);

        let xml = format!("<x><dest><RazaoSocial>{long_name}</RazaoSocial></dest></x>");
        let (_, name) = extract_recipient(&parse(&xml));
        assert_eq!(name.chars().count(), limits::MAX_NAME);
    }
}
