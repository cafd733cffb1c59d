//! Normalized fiscal document model.
//!
//! A [`NormalizedDocument`] is what the extractor produces from one XML payload,
//! regardless of namespace prefixes or schema variant.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxType;

/// The fiscal document variant.
///
/// # Example
///
/// ```
/// use fiscal_audit::models::DocumentType;
///
/// let json = serde_json::to_string(&DocumentType::Cte).unwrap();
/// assert_eq!(json, "\"CT-e\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// Nota Fiscal Eletrônica (goods invoice).
    #[serde(rename = "NF-e")]
    Nfe,
    /// Conhecimento de Transporte Eletrônico (freight invoice).
    #[serde(rename = "CT-e")]
    Cte,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Nfe => f.write_str("NF-e"),
            DocumentType::Cte => f.write_str("CT-e"),
        }
    }
}

/// A fiscal document reduced to the fields the auditor needs.
///
/// `declared_amounts` only holds taxes whose field was present in the payload,
/// so a tax declared as zero and a tax not declared at all stay distinguishable.
///
/// # Example
///
/// ```
/// use fiscal_audit::models::{DocumentType, NormalizedDocument, TaxType};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let mut declared = BTreeMap::new();
/// declared.insert(TaxType::Pis, Decimal::new(1650, 2));
///
/// let doc = NormalizedDocument {
///     document_type: DocumentType::Nfe,
///     number: Some("123".to_string()),
///     issue_date: NaiveDate::from_ymd_opt(2025, 3, 10),
///     jurisdiction: Some("SP".to_string()),
///     taxable_base: Decimal::new(1000, 0),
///     declared_amounts: declared,
/// };
/// assert_eq!(doc.declared(TaxType::Pis), Some(Decimal::new(1650, 2)));
/// assert_eq!(doc.declared(TaxType::Cofins), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    /// The document variant.
    pub document_type: DocumentType,
    /// The document number (`nNF` / `nCT`).
    pub number: Option<String>,
    /// The issue date at day precision.
    pub issue_date: Option<NaiveDate>,
    /// The emitter's UF code.
    pub jurisdiction: Option<String>,
    /// The amount tax percentages are applied to.
    pub taxable_base: Decimal,
    /// Declared tax amounts for the tax fields present in the payload.
    pub declared_amounts: BTreeMap<TaxType, Decimal>,
}

impl NormalizedDocument {
    /// Returns the declared amount for a tax, if its field was present.
    pub fn declared(&self, tax: TaxType) -> Option<Decimal> {
        self.declared_amounts.get(&tax).copied()
    }

    /// Returns the declared amount only when it is positive.
    ///
    /// Amounts of zero or below mean nothing was declared for comparison purposes.
    pub fn declared_positive(&self, tax: TaxType) -> Option<Decimal> {
        self.declared(tax).filter(|amount| *amount > Decimal::ZERO)
    }
}
