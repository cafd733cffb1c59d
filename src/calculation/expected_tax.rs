//! Expected tax amount computation.

use rust_decimal::{Decimal, RoundingStrategy};

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Computes `taxable_base × rate / 100` without rounding.
///
/// Returns `None` when the product does not fit in a `Decimal`; such a
/// document has no usable expectation.
///
/// # Example
///
/// ```
/// use fiscal_audit::calculation::expected_tax;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let expected = expected_tax(Decimal::from(1000), Decimal::from_str("1.65").unwrap());
/// assert_eq!(expected, Some(Decimal::from_str("16.50").unwrap()));
/// assert_eq!(expected_tax(Decimal::MAX, Decimal::from(18)), None);
/// ```
pub fn expected_tax(taxable_base: Decimal, rate: Decimal) -> Option<Decimal> {
    taxable_base.checked_mul(rate)?.checked_div(ONE_HUNDRED)
}

/// Formats an amount or percentage with exactly two decimal places.
///
/// # Example
///
/// ```
/// use fiscal_audit::calculation::two_places;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(two_places(Decimal::from_str("16.5").unwrap()), "16.50");
/// assert_eq!(two_places(Decimal::from_str("0.825").unwrap()), "0.83");
/// ```
pub fn two_places(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}
