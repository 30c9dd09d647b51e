//! Pricing

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::items::CartLine;

/// Errors that can occur while calculating totals.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TotalPriceError {
    /// The sum does not fit in the minor-unit representation.
    #[error("total price overflowed")]
    Overflow,
}

/// Sum of quantities across all lines.
pub fn total_items(lines: &[CartLine]) -> u64 {
    lines
        .iter()
        .map(|line| u64::from(line.quantity().get()))
        .sum()
}

/// Sum of `unit_price * quantity` across all lines, in minor units.
///
/// # Errors
///
/// Returns [`TotalPriceError::Overflow`] if any extended price or the sum overflows.
pub fn subtotal(lines: &[CartLine]) -> Result<u64, TotalPriceError> {
    lines.iter().try_fold(0_u64, |acc, line| {
        line.extended_price()
            .and_then(|extended| acc.checked_add(extended))
            .ok_or(TotalPriceError::Overflow)
    })
}

/// Subtotal as money in the given currency.
///
/// # Errors
///
/// Returns [`TotalPriceError::Overflow`] if the subtotal overflows or cannot be
/// represented as signed minor units.
pub fn subtotal_money(
    lines: &[CartLine],
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, TotalPriceError> {
    to_money(subtotal(lines)?, currency)
}

/// Converts a minor-unit amount to money.
///
/// # Errors
///
/// Returns [`TotalPriceError::Overflow`] if `minor` does not fit in an `i64`.
pub fn to_money(
    minor: u64,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, TotalPriceError> {
    let minor = i64::try_from(minor).map_err(|_overflow| TotalPriceError::Overflow)?;

    Ok(Money::from_minor(minor, currency))
}
