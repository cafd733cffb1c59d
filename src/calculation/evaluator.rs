//! Per-document divergence evaluation.
//!
//! Combines the tax comparisons and the transition review into a [`Verdict`].

use rust_decimal::Decimal;

use crate::config::RateTable;
use crate::models::{
    AuditStep, IssueKind, NOT_APPLICABLE, NormalizedDocument, TaxFinding, TaxType, Verdict,
    VerdictStatus,
};

use super::{TRANSITION_REVIEW_ISSUE, compare_tax, review_transition, two_places};

/// Evaluates a document against the rate table.
///
/// 1. Every tax with a positive declared amount and a resolvable rate is
///    compared, in [`TaxType::ALL`] order.
/// 2. Divergent taxes are reported together: descriptions joined with `" + "`,
///    values and remediation joined with `" | "`. Exposure is the sum of their
///    differences.
/// 3. When nothing diverged and a reform rate applies, the document is flagged
///    for transition review with zero exposure.
/// 4. Otherwise the document is OK.
///
/// # Example
///
/// ```
/// use fiscal_audit::calculation::evaluate;
/// use fiscal_audit::config::RateTable;
/// use fiscal_audit::models::{DocumentType, NormalizedDocument, TaxType, VerdictStatus};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rates = RateTable::from_json_str(
///     r#"{"PIS": [{"percentual": "1.65", "vigencia_inicio": "2003-01-01", "vigencia_fim": null}]}"#,
/// ).unwrap();
///
/// let doc = NormalizedDocument {
///     document_type: DocumentType::Nfe,
///     number: Some("1".to_string()),
///     issue_date: NaiveDate::from_ymd_opt(2025, 3, 10),
///     jurisdiction: Some("SP".to_string()),
///     taxable_base: Decimal::from(1000),
///     declared_amounts: [(TaxType::Pis, Decimal::from_str("20.00").unwrap())].into_iter().collect(),
/// };
///
/// let verdict = evaluate(&doc, &rates);
/// assert_eq!(verdict.status, VerdictStatus::Divergent);
/// assert_eq!(verdict.exposure, Decimal::from_str("3.50").unwrap());
/// assert_eq!(verdict.issue_description.as_deref(), Some("PIS divergente"));
/// ```
pub fn evaluate(doc: &NormalizedDocument, rates: &RateTable) -> Verdict {
    let mut findings: Vec<TaxFinding> = Vec::new();
    let mut audit_steps: Vec<AuditStep> = Vec::new();
    let mut step_number: u32 = 1;

    for tax in TaxType::ALL {
        let Some(declared) = doc.declared_positive(tax) else {
            continue;
        };

        let comparison = compare_tax(doc, rates, tax, declared, step_number);
        audit_steps.push(comparison.audit_step().clone());
        if let Some(finding) = comparison.finding() {
            findings.push(finding.clone());
        }
        step_number += 1;
    }

    let divergent: Vec<&TaxFinding> = findings.iter().filter(|f| f.divergent).collect();

    if !divergent.is_empty() {
        let issue = divergent
            .iter()
            .map(|f| format!("{} divergente", f.tax))
            .collect::<Vec<_>>()
            .join(" + ");
        let declared_summary = divergent
            .iter()
            .map(|f| two_places(f.declared))
            .collect::<Vec<_>>()
            .join(" | ");
        let correct_summary = divergent
            .iter()
            .map(|f| two_places(f.expected))
            .collect::<Vec<_>>()
            .join(" | ");
        let remediation = divergent
            .iter()
            .map(|f| {
                format!(
                    "Aplicar {} {}% sobre base {}",
                    f.tax,
                    two_places(f.rate),
                    two_places(doc.taxable_base)
                )
            })
            .collect::<Vec<_>>()
            .join(" | ");
        let exposure = divergent
            .iter()
            .fold(Decimal::ZERO, |acc, f| acc.saturating_add(f.difference));

        return Verdict {
            status: VerdictStatus::Divergent,
            issue_kind: Some(IssueKind::Divergence),
            issue_description: Some(issue),
            declared_summary,
            correct_summary,
            remediation,
            exposure,
            findings,
            audit_steps,
        };
    }

    if let Some(review) = review_transition(doc, rates, step_number) {
        audit_steps.push(review.audit_step);
        return Verdict {
            status: VerdictStatus::Divergent,
            issue_kind: Some(IssueKind::TransitionReview),
            issue_description: Some(TRANSITION_REVIEW_ISSUE.to_string()),
            declared_summary: NOT_APPLICABLE.to_string(),
            correct_summary: review.correct_summary,
            remediation: review.remediation,
            exposure: Decimal::ZERO,
            findings,
            audit_steps,
        };
    }

    Verdict::ok(findings, audit_steps)
}
