//! Core data models for the fiscal document auditor.
//!
//! This module contains all the domain models used throughout the engine.

mod batch_result;
mod document;
mod tax;
mod verdict;

pub use batch_result::{AuditRow, BatchResult, DocumentPayload, RowOutcome};
pub use document::{DocumentType, NormalizedDocument};
pub use tax::TaxType;
pub use verdict::{AuditStep, IssueKind, NOT_APPLICABLE, TaxFinding, Verdict, VerdictStatus};
