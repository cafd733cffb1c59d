//! Namespace-agnostic field resolution.
//!
//! Fields are located by local tag name anywhere in the document, optionally
//! restricted to the inside of a named group element. Each field carries an
//! ordered list of candidates and the first one with non-empty text wins.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use roxmltree::{Document, Node};
use rust_decimal::Decimal;

use crate::config::parse_iso_day;
use crate::models::{DocumentType, NormalizedDocument, TaxType};

/// One place a field may be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagQuery {
    /// Local name of an enclosing element the tag must sit inside, if any.
    pub group: Option<&'static str>,
    /// Local name of the element holding the value.
    pub tag: &'static str,
}

impl TagQuery {
    /// Matches `tag` anywhere in the document.
    pub const fn anywhere(tag: &'static str) -> Self {
        Self { group: None, tag }
    }

    /// Matches `tag` inside the first `group` element that contains one.
    pub const fn within(group: &'static str, tag: &'static str) -> Self {
        Self {
            group: Some(group),
            tag,
        }
    }

    /// Returns the trimmed text of the first matching element, if non-empty.
    pub fn find(&self, doc: &Document<'_>) -> Option<String> {
        let element = match self.group {
            None => first_element(doc.root(), self.tag),
            Some(group) => doc
                .descendants()
                .filter(|node| has_local_name(node, group))
                .find_map(|group_node| first_element(group_node, self.tag)),
        }?;

        let text = text_content(element);
        (!text.is_empty()).then_some(text)
    }
}

/// The candidate lists for one document variant.
#[derive(Debug, Clone, Copy)]
pub struct FieldCandidates {
    /// Document number.
    pub number: &'static [TagQuery],
    /// Issue date or date-time.
    pub issue_date: &'static [TagQuery],
    /// Emitter jurisdiction (UF).
    pub jurisdiction: &'static [TagQuery],
    /// Alternatives for the taxable base; the first positive one is used.
    pub taxable_base: &'static [&'static [TagQuery]],
    /// Declared tax amount fields.
    pub declared: &'static [(TaxType, &'static [TagQuery])],
}

/// Returns the first non-empty value among the candidates.
pub fn first_text(doc: &Document<'_>, candidates: &[TagQuery]) -> Option<String> {
    candidates.iter().find_map(|query| query.find(doc))
}

/// Parses a monetary amount, resolving anything non-numeric to zero.
///
/// # Example
///
/// ```
/// use fiscal_audit::extraction::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount(Some("16.50")), Decimal::new(1650, 2));
/// assert_eq!(parse_amount(Some("abc")), Decimal::ZERO);
/// assert_eq!(parse_amount(None), Decimal::ZERO);
/// ```
pub fn parse_amount(text: Option<&str>) -> Decimal {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return Decimal::ZERO;
    };

    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .unwrap_or(Decimal::ZERO)
}

/// Parses the day part of an issue date field.
pub fn parse_issue_date(text: Option<&str>) -> Option<NaiveDate> {
    text.and_then(parse_iso_day)
}

/// Builds a normalized document from a parsed XML tree.
pub(crate) fn extract_with(
    doc: &Document<'_>,
    document_type: DocumentType,
    fields: &FieldCandidates,
) -> NormalizedDocument {
    let taxable_base = fields
        .taxable_base
        .iter()
        .map(|candidates| parse_amount(first_text(doc, candidates).as_deref()))
        .find(|amount| *amount > Decimal::ZERO)
        .unwrap_or(Decimal::ZERO);

    let declared_amounts: BTreeMap<TaxType, Decimal> = fields
        .declared
        .iter()
        .filter_map(|(tax, candidates)| {
            first_text(doc, candidates).map(|text| (*tax, parse_amount(Some(&text))))
        })
        .collect();

    NormalizedDocument {
        document_type,
        number: first_text(doc, fields.number),
        issue_date: parse_issue_date(first_text(doc, fields.issue_date).as_deref()),
        jurisdiction: first_text(doc, fields.jurisdiction),
        taxable_base,
        declared_amounts,
    }
}

fn has_local_name(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn first_element<'a, 'input>(scope: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    scope.descendants().find(|node| has_local_name(node, tag))
}

fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}
