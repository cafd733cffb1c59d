//! Consumption-tax reform transition review.
//!
//! From 2026 the reform taxes (CBS and IBS) have rates in force while most
//! documents still do not declare them. When a reform rate applies on the issue
//! date and nothing else was flagged, the document is marked for review with the
//! expected reform amounts as guidance. The flag is informational: it never adds
//! exposure.

use rust_decimal::Decimal;

use crate::config::RateTable;
use crate::models::{AuditStep, NormalizedDocument, TaxType};

use super::{expected_tax, two_places};

/// Issue description for documents flagged for transition review.
pub const TRANSITION_REVIEW_ISSUE: &str = "Revisar transição CBS/IBS";

/// The result of a transition review that fired.
#[derive(Debug, Clone)]
pub struct TransitionReviewResult {
    /// Expected amount per reform tax; zero where no rate applies or the amount overflows.
    pub expected: Vec<(TaxType, Decimal)>,
    /// Guidance values, e.g. `CBS~9.00 | IBS~1.00`.
    pub correct_summary: String,
    /// What the reviewer should check.
    pub remediation: String,
    /// The audit step recording the review.
    pub audit_step: AuditStep,
}

/// Checks whether any reform tax has a rate on the document's issue date.
///
/// Returns `None` when the document has no valid issue date or no reform rate
/// applies.
pub fn review_transition(
    doc: &NormalizedDocument,
    rates: &RateTable,
    step_number: u32,
) -> Option<TransitionReviewResult> {
    let date = doc.issue_date?;
    let jurisdiction = doc.jurisdiction.as_deref();

    let resolved: Vec<(TaxType, Option<Decimal>)> = TaxType::NEW_REGIME
        .into_iter()
        .map(|tax| (tax, rates.lookup_rate(tax, date, jurisdiction)))
        .collect();

    if resolved.iter().all(|(_, rate)| rate.is_none()) {
        return None;
    }

    let expected: Vec<(TaxType, Decimal)> = resolved
        .iter()
        .map(|(tax, rate)| {
            let amount = rate
                .and_then(|rate| expected_tax(doc.taxable_base, rate))
                .unwrap_or(Decimal::ZERO);
            (*tax, amount)
        })
        .collect();

    let correct_summary = expected
        .iter()
        .map(|(tax, amount)| format!("{}~{}", tax, two_places(*amount)))
        .collect::<Vec<_>>()
        .join(" | ");

    let remediation = format!("Verificar regras de transição na data {}", date);

    let rates_json: serde_json::Map<String, serde_json::Value> = resolved
        .iter()
        .map(|(tax, rate)| {
            (
                tax.key().to_string(),
                rate.map_or(serde_json::Value::Null, |r| {
                    serde_json::Value::String(r.normalize().to_string())
                }),
            )
        })
        .collect();
    let expected_json: serde_json::Map<String, serde_json::Value> = expected
        .iter()
        .map(|(tax, amount)| {
            (
                tax.key().to_string(),
                serde_json::Value::String(amount.normalize().to_string()),
            )
        })
        .collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "transition_review".to_string(),
        rule_name: "CBS/IBS Transition Review".to_string(),
        legal_ref: TaxType::Cbs.legal_ref().to_string(),
        input: serde_json::json!({
            "issue_date": date.to_string(),
            "taxable_base": doc.taxable_base.normalize().to_string(),
        }),
        output: serde_json::json!({
            "rates": rates_json,
            "expected": expected_json,
            "exposure": "0",
        }),
        reasoning: format!(
            "Reform rates in force on {}; expected {} shown as guidance without exposure",
            date, correct_summary
        ),
    };

    Some(TransitionReviewResult {
        expected,
        correct_summary,
        remediation,
        audit_step,
    })
}
