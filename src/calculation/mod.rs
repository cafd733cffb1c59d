//! Divergence calculation for fiscal documents.
//!
//! This module contains the functions that decide whether a document's
//! declared taxes match the rate table: expected-amount arithmetic, the
//! divergence tolerance, per-tax comparison, the CBS/IBS transition review,
//! and the [`evaluate`] entry point that combines them into a verdict.

mod evaluator;
mod expected_tax;
mod tax_comparison;
mod tolerance;
mod transition_review;

pub use evaluator::evaluate;
pub use expected_tax::{expected_tax, two_places};
pub use tax_comparison::{TaxComparison, compare_tax};
pub use tolerance::{ABSOLUTE_TOLERANCE, RELATIVE_TOLERANCE, divergence_tolerance, is_divergent};
pub use transition_review::{TRANSITION_REVIEW_ISSUE, TransitionReviewResult, review_transition};
