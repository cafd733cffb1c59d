//! Tax types audited by the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A tax whose declared amount can be checked against the rate table.
///
/// The variant order is the fixed evaluation order used by the divergence
/// evaluator, so sorted collections keyed by `TaxType` iterate in that order.
///
/// # Example
///
/// ```
/// use fiscal_audit::models::TaxType;
///
/// assert_eq!(TaxType::Cofins.key(), "COFINS");
/// assert!(TaxType::Icms.is_jurisdiction_specific());
/// assert!(TaxType::Cbs.is_new_regime());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaxType {
    /// Programa de Integração Social.
    #[serde(rename = "PIS")]
    Pis,
    /// Contribuição para o Financiamento da Seguridade Social.
    #[serde(rename = "COFINS")]
    Cofins,
    /// State goods-and-services tax, rated per UF.
    #[serde(rename = "ICMS")]
    Icms,
    /// Federal contribution of the consumption-tax reform.
    #[serde(rename = "CBS")]
    Cbs,
    /// Subnational tax of the consumption-tax reform.
    #[serde(rename = "IBS")]
    Ibs,
}

impl TaxType {
    /// Every tax type, in evaluation order.
    pub const ALL: [TaxType; 5] = [
        TaxType::Pis,
        TaxType::Cofins,
        TaxType::Icms,
        TaxType::Cbs,
        TaxType::Ibs,
    ];

    /// Taxes introduced by the reform whose absence from a document is expected
    /// during the transition period.
    pub const NEW_REGIME: [TaxType; 2] = [TaxType::Cbs, TaxType::Ibs];

    /// The key under which this tax is stored in the rate table.
    pub fn key(self) -> &'static str {
        match self {
            TaxType::Pis => "PIS",
            TaxType::Cofins => "COFINS",
            TaxType::Icms => "ICMS",
            TaxType::Cbs => "CBS",
            TaxType::Ibs => "IBS",
        }
    }

    /// Whether the tax is rated per jurisdiction rather than nationally.
    pub fn is_jurisdiction_specific(self) -> bool {
        matches!(self, TaxType::Icms)
    }

    /// Whether the tax belongs to the reform regime.
    pub fn is_new_regime(self) -> bool {
        Self::NEW_REGIME.contains(&self)
    }

    /// The statute the rate comes from, recorded in audit steps.
    pub fn legal_ref(self) -> &'static str {
        match self {
            TaxType::Pis => "Lei 10.637/2002",
            TaxType::Cofins => "Lei 10.833/2003",
            TaxType::Icms => "LC 87/1996",
            TaxType::Cbs | TaxType::Ibs => "LC 214/2025",
        }
    }
}

impl fmt::Display for TaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
