//! Batch result models.
//!
//! A [`BatchResult`] is built row by row while a batch is audited and is handed
//! to the caller once every payload has been processed.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{NormalizedDocument, Verdict, VerdictStatus};

/// The raw content of one document submitted for audit.
///
/// # Example
///
/// ```
/// use fiscal_audit::models::DocumentPayload;
///
/// let payload = DocumentPayload::named("nota.xml", "<NFe/>");
/// assert_eq!(payload.name.as_deref(), Some("nota.xml"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPayload {
    /// A label for the payload, usually its file name.
    #[serde(default)]
    pub name: Option<String>,
    /// The XML text.
    pub content: String,
}

impl DocumentPayload {
    /// Creates an unnamed payload.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            name: None,
            content: content.into(),
        }
    }

    /// Creates a payload with a label.
    pub fn named(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            content: content.into(),
        }
    }
}

/// What happened to one payload of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RowOutcome {
    /// The payload was parsed and evaluated.
    Audited {
        /// The extracted document.
        document: NormalizedDocument,
        /// The evaluation result.
        verdict: Verdict,
    },
    /// The payload could not be read or parsed.
    Failed {
        /// Why the payload failed.
        error: String,
    },
}

/// One row of the batch, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRow {
    /// Zero-based position of the payload in the input.
    pub position: usize,
    /// The payload label, when one was given.
    pub source: Option<String>,
    /// The row outcome.
    #[serde(flatten)]
    pub outcome: RowOutcome,
}

impl AuditRow {
    /// Returns the verdict when the row was audited.
    pub fn verdict(&self) -> Option<&Verdict> {
        match &self.outcome {
            RowOutcome::Audited { verdict, .. } => Some(verdict),
            RowOutcome::Failed { .. } => None,
        }
    }

    /// Returns the document when the row was audited.
    pub fn document(&self) -> Option<&NormalizedDocument> {
        match &self.outcome {
            RowOutcome::Audited { document, .. } => Some(document),
            RowOutcome::Failed { .. } => None,
        }
    }

    /// Returns true when the payload failed to parse or read.
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, RowOutcome::Failed { .. })
    }
}

/// Aggregated result of one audit run.
///
/// `total_count` counts audited documents only, so it always equals
/// `ok_count + risk_count`; failed payloads are counted in `error_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Unique identifier for this run.
    pub batch_id: Uuid,
    /// When the run started.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that produced the result.
    pub engine_version: String,
    /// Number of audited documents.
    pub total_count: usize,
    /// Audited documents without issues.
    pub ok_count: usize,
    /// Audited documents with an issue.
    pub risk_count: usize,
    /// Payloads that could not be read or parsed.
    pub error_count: usize,
    /// Sum of verdict exposures, rounded to exactly 2 decimal places.
    pub total_exposure: Decimal,
    /// One row per payload, in input order.
    pub rows: Vec<AuditRow>,
    /// Wall-clock duration of the run in microseconds.
    pub duration_us: u64,
}

impl BatchResult {
    /// Starts an empty result for a new run.
    pub fn begin() -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            total_count: 0,
            ok_count: 0,
            risk_count: 0,
            error_count: 0,
            total_exposure: Decimal::ZERO,
            rows: Vec::new(),
            duration_us: 0,
        }
    }

    /// Appends a row and updates the counters.
    pub fn record(&mut self, row: AuditRow) {
        match row.verdict().map(|v| v.status) {
            Some(VerdictStatus::Ok) => {
                self.total_count += 1;
                self.ok_count += 1;
            }
            Some(VerdictStatus::Divergent) => {
                self.total_count += 1;
                self.risk_count += 1;
            }
            None => self.error_count += 1,
        }
        self.rows.push(row);
    }

    /// Closes the run: totals the exposure and records the duration.
    pub fn finish(mut self, duration_us: u64) -> Self {
        let raw = self
            .audited()
            .fold(Decimal::ZERO, |acc, (_, verdict)| acc.saturating_add(verdict.exposure));
        let mut total = raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        total.rescale(2);
        self.total_exposure = total;
        self.duration_us = duration_us;
        self
    }

    /// Iterates over the audited rows only.
    pub fn audited(&self) -> impl Iterator<Item = (&NormalizedDocument, &Verdict)> {
        self.rows.iter().filter_map(|row| match &row.outcome {
            RowOutcome::Audited { document, verdict } => Some((document, verdict)),
            RowOutcome::Failed { .. } => None,
        })
    }
}
