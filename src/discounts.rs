//! Discounts
//!
//! Turns validated coupon terms into an amount taken off the subtotal.
//! Discounts are applied before shipping and never exceed the subtotal.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

use crate::coupons::{AppliedCoupon, DiscountType};

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage or amount could not be safely converted.
    #[error("discount value {0} is not a finite, representable number")]
    InvalidValue(String),
}

/// Amount in minor units to take off `subtotal` for the given coupon.
///
/// Percent values are clamped to `0..=100` and rounded half away from zero.
/// Fixed amounts are capped at the subtotal so the total never goes negative.
///
/// # Errors
///
/// Returns [`DiscountError::InvalidValue`] if the coupon value is not finite or
/// the result cannot be represented in minor units.
pub fn discount_amount(coupon: &AppliedCoupon, subtotal: u64) -> Result<u64, DiscountError> {
    let value = coupon.discount_value;

    if !value.is_finite() {
        return Err(DiscountError::InvalidValue(value.to_string()));
    }

    let amount = match coupon.discount_type {
        DiscountType::Percent => {
            let percent = Percentage::from(value.clamp(0.0, 100.0) / 100.0);

            percent_of_minor(percent, subtotal)?
        }
        DiscountType::Fixed => round_minor(value.max(0.0))?,
    };

    Ok(amount.min(subtotal))
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// # Errors
///
/// Returns [`DiscountError::InvalidValue`] if the calculation overflows.
pub fn percent_of_minor(percent: Percentage, minor: u64) -> Result<u64, DiscountError> {
    let overflow = || DiscountError::InvalidValue(minor.to_string());

    let minor_decimal = Decimal::from_u64(minor).ok_or_else(overflow)?;

    (percent * Decimal::ONE)
        .checked_mul(minor_decimal)
        .ok_or_else(overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or_else(overflow)
}

fn round_minor(value: f64) -> Result<u64, DiscountError> {
    Decimal::from_f64(value)
        .map(|decimal| decimal.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_u64())
        .ok_or_else(|| DiscountError::InvalidValue(value.to_string()))
}
