//! Declared-versus-expected comparison for a single tax.

use rust_decimal::Decimal;

use crate::config::RateTable;
use crate::models::{AuditStep, NormalizedDocument, TaxFinding, TaxType};

use super::{divergence_tolerance, expected_tax, two_places};

/// The outcome of checking one declared tax.
#[derive(Debug, Clone)]
pub enum TaxComparison {
    /// A rate was found and the declared amount was compared.
    Compared {
        /// The comparison details.
        finding: TaxFinding,
        /// The audit step recording the comparison.
        audit_step: AuditStep,
    },
    /// No rate applies, so there is nothing to compare against.
    NoExpectation {
        /// The audit step recording why the tax was skipped.
        audit_step: AuditStep,
    },
}

impl TaxComparison {
    /// Returns the finding when a comparison took place.
    pub fn finding(&self) -> Option<&TaxFinding> {
        match self {
            TaxComparison::Compared { finding, .. } => Some(finding),
            TaxComparison::NoExpectation { .. } => None,
        }
    }

    /// Returns the audit step.
    pub fn audit_step(&self) -> &AuditStep {
        match self {
            TaxComparison::Compared { audit_step, .. }
            | TaxComparison::NoExpectation { audit_step } => audit_step,
        }
    }
}

/// Compares a declared tax amount against the amount the rate table implies.
///
/// The rate is resolved for the document's issue date and, for
/// jurisdiction-specific taxes, its jurisdiction. A document without a valid
/// issue date, a date no rate entry covers, or a base so large the expected
/// amount overflows yields `NoExpectation`.
///
/// # Arguments
///
/// * `doc` - The document being audited
/// * `rates` - The rate table for this run
/// * `tax` - The tax to compare
/// * `declared` - The declared amount, already known to be positive
/// * `step_number` - The step number for audit trail sequencing
pub fn compare_tax(
    doc: &NormalizedDocument,
    rates: &RateTable,
    tax: TaxType,
    declared: Decimal,
    step_number: u32,
) -> TaxComparison {
    let jurisdiction = doc.jurisdiction.as_deref();
    let rate = doc
        .issue_date
        .and_then(|date| rates.lookup_rate(tax, date, jurisdiction));

    let input = serde_json::json!({
        "tax": tax.key(),
        "declared": declared.normalize().to_string(),
        "taxable_base": doc.taxable_base.normalize().to_string(),
        "issue_date": doc.issue_date.map(|d| d.to_string()),
        "jurisdiction": jurisdiction,
    });

    let Some(rate) = rate else {
        let reasoning = match (doc.issue_date, tax.is_jurisdiction_specific()) {
            (None, _) => format!("No valid issue date; declared {} not compared", tax),
            (Some(date), true) => format!(
                "No {} rate for jurisdiction {} on {}; declared {} not compared",
                tax,
                jurisdiction.unwrap_or("(none)"),
                date,
                tax
            ),
            (Some(date), false) => {
                format!("No {} rate on {}; declared {} not compared", tax, date, tax)
            }
        };

        return TaxComparison::NoExpectation {
            audit_step: AuditStep {
                step_number,
                rule_id: "rate_lookup".to_string(),
                rule_name: "Rate Lookup".to_string(),
                legal_ref: tax.legal_ref().to_string(),
                input,
                output: serde_json::json!({ "rate": null }),
                reasoning,
            },
        };
    };

    let Some((expected, difference)) = expected_tax(doc.taxable_base, rate)
        .and_then(|expected| Some((expected, declared.checked_sub(expected)?.abs())))
    else {
        return TaxComparison::NoExpectation {
            audit_step: AuditStep {
                step_number,
                rule_id: "tax_comparison".to_string(),
                rule_name: format!("{} Comparison", tax),
                legal_ref: tax.legal_ref().to_string(),
                input,
                output: serde_json::json!({
                    "rate": rate.normalize().to_string(),
                    "expected": null,
                }),
                reasoning: format!(
                    "{} expected amount out of range for base {}; declared {} not compared",
                    tax, doc.taxable_base, tax
                ),
            },
        };
    };
    let tolerance = divergence_tolerance(expected);
    let divergent = difference > tolerance;

    let verdict_text = if divergent {
        "exceeds"
    } else {
        "is within"
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "tax_comparison".to_string(),
        rule_name: format!("{} Comparison", tax),
        legal_ref: tax.legal_ref().to_string(),
        input,
        output: serde_json::json!({
            "rate": rate.normalize().to_string(),
            "expected": expected.normalize().to_string(),
            "difference": difference.normalize().to_string(),
            "tolerance": tolerance.normalize().to_string(),
            "divergent": divergent,
        }),
        reasoning: format!(
            "{} declared {} vs expected {} ({}% of {}); difference {} {} tolerance {}",
            tax,
            two_places(declared),
            two_places(expected),
            two_places(rate),
            two_places(doc.taxable_base),
            two_places(difference),
            verdict_text,
            two_places(tolerance)
        ),
    };

    TaxComparison::Compared {
        finding: TaxFinding {
            tax,
            rate,
            declared,
            expected,
            difference,
            tolerance,
            divergent,
        },
        audit_step,
    }
}
