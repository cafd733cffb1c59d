//! CT-e (freight invoice) extraction.
//!
//! The taxable base is the total service value (`vTPrest`). CT-e documents
//! carry no PIS/COFINS fields, so nothing is declared for comparison.

use roxmltree::Document;

use crate::models::{DocumentType, NormalizedDocument};

use super::fields::{FieldCandidates, TagQuery, extract_with};

/// Field candidates for CT-e documents.
pub const CTE_FIELDS: FieldCandidates = FieldCandidates {
    number: &[TagQuery::anywhere("nCT")],
    issue_date: &[TagQuery::anywhere("dhEmi"), TagQuery::anywhere("dEmi")],
    jurisdiction: &[
        TagQuery::within("enderEmit", "UF"),
        TagQuery::anywhere("UF"),
    ],
    taxable_base: &[&[TagQuery::within("vPrest", "vTPrest"), TagQuery::anywhere("vTPrest")]],
    declared: &[],
};

/// Extracts a CT-e.
pub fn extract_cte(doc: &Document<'_>) -> NormalizedDocument {
    extract_with(doc, DocumentType::Cte, &CTE_FIELDS)
}
