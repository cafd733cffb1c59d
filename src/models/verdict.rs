//! Verdict models for the divergence evaluator.
//!
//! This module contains the [`Verdict`] type produced for each audited document,
//! together with the per-tax [`TaxFinding`] records and the [`AuditStep`] trace
//! that explains how the verdict was reached.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxType;

/// Placeholder shown in summaries when there is nothing to report.
pub const NOT_APPLICABLE: &str = "—";

/// Whether a document passed the audit.
///
/// # Example
///
/// ```
/// use fiscal_audit::models::VerdictStatus;
///
/// let json = serde_json::to_string(&VerdictStatus::Divergent).unwrap();
/// assert_eq!(json, "\"DIVERGENT\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictStatus {
    /// No issue was raised for the document.
    Ok,
    /// The document was flagged and counts towards the batch risk count.
    Divergent,
}

/// The rule that raised a document's issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// At least one declared tax is outside tolerance.
    Divergence,
    /// Informational flag: a reform-regime rate applies on the issue date.
    TransitionReview,
}

/// The comparison of one declared tax against its expected amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxFinding {
    /// The tax compared.
    pub tax: TaxType,
    /// The percentage found in the rate table.
    pub rate: Decimal,
    /// The amount declared on the document.
    pub declared: Decimal,
    /// The amount implied by the taxable base and rate.
    pub expected: Decimal,
    /// `|declared - expected|`.
    pub difference: Decimal,
    /// The tolerance the difference was compared against.
    pub tolerance: Decimal,
    /// Whether the difference exceeded the tolerance.
    pub divergent: bool,
}

/// A single step in the audit trace recording an evaluation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The statute backing the rule.
    pub legal_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The audit outcome for one document.
///
/// `status` is [`VerdictStatus::Ok`] exactly when `issue_description` is `None`,
/// and `exposure` is never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Overall status.
    pub status: VerdictStatus,
    /// Which rule raised the issue, if any.
    pub issue_kind: Option<IssueKind>,
    /// Description of the issue, `None` when the document is OK.
    pub issue_description: Option<String>,
    /// The declared values behind the issue.
    pub declared_summary: String,
    /// The values the rate table implies.
    pub correct_summary: String,
    /// How to correct the document.
    pub remediation: String,
    /// Monetary gap between declared and expected amounts.
    pub exposure: Decimal,
    /// Every tax comparison performed, in evaluation order.
    pub findings: Vec<TaxFinding>,
    /// The evaluation trace.
    pub audit_steps: Vec<AuditStep>,
}

impl Verdict {
    /// Creates an OK verdict carrying the comparisons that were performed.
    pub fn ok(findings: Vec<TaxFinding>, audit_steps: Vec<AuditStep>) -> Self {
        Self {
            status: VerdictStatus::Ok,
            issue_kind: None,
            issue_description: None,
            declared_summary: NOT_APPLICABLE.to_string(),
            correct_summary: NOT_APPLICABLE.to_string(),
            remediation: NOT_APPLICABLE.to_string(),
            exposure: Decimal::ZERO,
            findings,
            audit_steps,
        }
    }

    /// Returns true when no issue was raised.
    pub fn is_ok(&self) -> bool {
        self.status == VerdictStatus::Ok
    }
}
