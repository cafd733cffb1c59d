//! Batch auditing.
//!
//! Runs the extractor and the evaluator over a sequence of payloads and
//! aggregates the verdicts into a [`BatchResult`](crate::models::BatchResult).
//! A payload that fails to parse becomes a failed row; it never aborts the batch.

mod auditor;

pub use auditor::{BatchAuditor, audit_batch, audit_files};
