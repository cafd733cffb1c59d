//! Divergence tolerance rule.
//!
//! A declared amount is divergent when it differs from the expected amount by
//! more than 0.50 currency units or 5% of the expected amount, whichever is
//! larger. The comparison is strict: a difference exactly at the threshold is
//! not divergent.

use rust_decimal::Decimal;

/// Absolute tolerance floor, in currency units (0.50).
pub const ABSOLUTE_TOLERANCE: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

/// Relative tolerance as a fraction of the expected amount (0.05).
pub const RELATIVE_TOLERANCE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Returns the tolerance that applies to an expected amount.
///
/// # Example
///
/// ```
/// use fiscal_audit::calculation::divergence_tolerance;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// // 5% of 16.50 is 0.825, above the 0.50 floor
/// assert_eq!(divergence_tolerance(Decimal::from_str("16.50").unwrap()), Decimal::from_str("0.825").unwrap());
/// // 5% of 1.00 is 0.05, so the floor applies
/// assert_eq!(divergence_tolerance(Decimal::ONE), Decimal::from_str("0.50").unwrap());
/// ```
pub fn divergence_tolerance(expected: Decimal) -> Decimal {
    expected.saturating_mul(RELATIVE_TOLERANCE).max(ABSOLUTE_TOLERANCE)
}

/// Returns true when `|declared - expected|` is strictly above the tolerance.
///
/// A gap too large to represent is divergent.
pub fn is_divergent(declared: Decimal, expected: Decimal) -> bool {
    declared
        .checked_sub(expected)
        .is_none_or(|gap| gap.abs() > divergence_tolerance(expected))
}
