//! Fiscal document extraction.
//!
//! This module turns a raw NF-e or CT-e XML payload into a
//! [`NormalizedDocument`]. The variant is chosen by sniffing the root element
//! name, and every field is looked up by local tag name so namespace prefixes
//! and nesting differences between schema versions do not matter.
//!
//! # Example
//!
//! ```
//! use fiscal_audit::extraction::extract;
//! use fiscal_audit::models::{DocumentType, TaxType};
//! use rust_decimal::Decimal;
//!
//! let xml = r#"<nfe:NFe xmlns:nfe="http://www.portalfiscal.inf.br/nfe">
//!     <nfe:ide><nfe:nNF>77</nfe:nNF><nfe:dhEmi>2025-04-02T11:00:00-03:00</nfe:dhEmi></nfe:ide>
//!     <nfe:total><nfe:ICMSTot><nfe:vProd>1000.00</nfe:vProd><nfe:vPIS>16.50</nfe:vPIS></nfe:ICMSTot></nfe:total>
//! </nfe:NFe>"#;
//!
//! let doc = extract(xml).unwrap();
//! assert_eq!(doc.document_type, DocumentType::Nfe);
//! assert_eq!(doc.number.as_deref(), Some("77"));
//! assert_eq!(doc.declared(TaxType::Pis), Some(Decimal::new(1650, 2)));
//! ```

mod cte;
mod fields;
mod nfe;

pub use cte::{CTE_FIELDS, extract_cte};
pub use fields::{FieldCandidates, TagQuery, first_text, parse_amount, parse_issue_date};
pub use nfe::{NFE_FIELDS, extract_nfe};

use roxmltree::Document;

use crate::error::{AuditError, AuditResult};
use crate::models::{DocumentType, NormalizedDocument};

/// Classifies a document by the local name of its root element.
///
/// Any root whose name contains `cte` (case-insensitively) is a CT-e;
/// everything else is treated as an NF-e.
///
/// # Example
///
/// ```
/// use fiscal_audit::extraction::classify;
/// use fiscal_audit::models::DocumentType;
///
/// assert_eq!(classify("cteProc"), DocumentType::Cte);
/// assert_eq!(classify("nfeProc"), DocumentType::Nfe);
/// ```
pub fn classify(root_local_name: &str) -> DocumentType {
    if root_local_name.to_ascii_lowercase().contains("cte") {
        DocumentType::Cte
    } else {
        DocumentType::Nfe
    }
}

/// Parses a raw payload and extracts the normalized document.
///
/// Missing fields and malformed numbers never fail extraction; they normalize
/// to `None` or zero.
///
/// # Errors
///
/// Returns `UnparseableDocument` when the payload is not well-formed XML.
pub fn extract(raw_payload: &str) -> AuditResult<NormalizedDocument> {
    let text = raw_payload.trim_start_matches('\u{feff}').trim_start();

    let doc = Document::parse(text).map_err(|e| AuditError::UnparseableDocument {
        message: e.to_string(),
    })?;

    let root_name = doc.root_element().tag_name().name();
    Ok(match classify(root_name) {
        DocumentType::Nfe => extract_nfe(&doc),
        DocumentType::Cte => extract_cte(&doc),
    })
}
