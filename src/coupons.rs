//! Coupons
//!
//! Coupon reference data and the rules that decide whether a coupon may be
//! applied to a given subtotal. Applying the discount itself lives in
//! [`crate::discounts`].

use std::fmt;

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A coupon code normalised for lookup: trimmed and upper-cased.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CouponCode(String);

impl CouponCode {
    /// Normalise user input into a lookup code.
    pub fn normalise(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// The normalised code
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether nothing but whitespace was entered
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a coupon's `discount_value` is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// `discount_value` is a percentage of the subtotal.
    Percent,

    /// `discount_value` is an amount in minor units.
    Fixed,
}

impl DiscountType {
    /// Wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            DiscountType::Percent => "percent",
            DiscountType::Fixed => "fixed",
        }
    }
}

/// Coupon reference record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    /// Code as stored
    pub code: String,

    /// Discount kind
    pub discount_type: DiscountType,

    /// Percentage or amount, depending on `discount_type`
    pub discount_value: f64,

    /// Minimum subtotal (inclusive) for the coupon to apply
    #[serde(default)]
    pub min_purchase: u64,

    /// Instant from which the coupon is no longer valid
    pub expiry_date: Timestamp,
}

/// Terms of a coupon that passed validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    /// Code as stored
    pub code: String,

    /// Discount kind
    pub discount_type: DiscountType,

    /// Percentage or amount, depending on `discount_type`
    pub discount_value: f64,
}

/// Why a coupon was not applied.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CouponRejection {
    /// No coupon has this code.
    #[error("invalid coupon code")]
    NotFound,

    /// The coupon expired at the given instant.
    #[error("coupon has expired")]
    Expired {
        /// Expiry instant of the coupon
        expired_at: Timestamp,
    },

    /// The subtotal is below the coupon's minimum purchase.
    #[error("minimum purchase for this coupon is {min_purchase}")]
    MinimumNotMet {
        /// Minimum subtotal in minor units
        min_purchase: u64,
    },
}

impl Coupon {
    /// Whether this coupon's code matches, ignoring case and surrounding whitespace.
    pub fn matches(&self, code: &CouponCode) -> bool {
        CouponCode::normalise(&self.code) == *code
    }

    /// Check the coupon against a subtotal at `now`.
    ///
    /// Expiry is checked first; the first failing rule is reported.
    ///
    /// # Errors
    ///
    /// - [`CouponRejection::Expired`]: `now` is at or past `expiry_date`.
    /// - [`CouponRejection::MinimumNotMet`]: `subtotal` is below `min_purchase`.
    pub fn validate(&self, subtotal: u64, now: Timestamp) -> Result<AppliedCoupon, CouponRejection> {
        if now >= self.expiry_date {
            return Err(CouponRejection::Expired {
                expired_at: self.expiry_date,
            });
        }

        if subtotal < self.min_purchase {
            return Err(CouponRejection::MinimumNotMet {
                min_purchase: self.min_purchase,
            });
        }

        Ok(AppliedCoupon {
            code: self.code.clone(),
            discount_type: self.discount_type,
            discount_value: self.discount_value,
        })
    }
}

/// Validate an optional lookup result. `None` is reported as
/// [`CouponRejection::NotFound`].
///
/// # Errors
///
/// See [`Coupon::validate`].
pub fn validate(
    coupon: Option<&Coupon>,
    subtotal: u64,
    now: Timestamp,
) -> Result<AppliedCoupon, CouponRejection> {
    coupon
        .ok_or(CouponRejection::NotFound)?
        .validate(subtotal, now)
}

/// In-memory coupon catalog keyed by normalised code.
#[derive(Debug, Default, Clone)]
pub struct CouponCatalog {
    coupons: FxHashMap<CouponCode, Coupon>,
}

impl CouponCatalog {
    /// Build a catalog. Later coupons replace earlier ones with the same code.
    pub fn new(coupons: impl IntoIterator<Item = Coupon>) -> Self {
        let coupons = coupons
            .into_iter()
            .map(|coupon| (CouponCode::normalise(&coupon.code), coupon))
            .collect();

        Self { coupons }
    }

    /// Look up a coupon by normalised code.
    pub fn find(&self, code: &CouponCode) -> Option<&Coupon> {
        self.coupons.get(code)
    }

    /// Normalise `raw`, look it up and validate it against `subtotal` at `now`.
    ///
    /// # Errors
    ///
    /// Returns a `CouponRejection` describing the first rule that failed.
    pub fn verify(
        &self,
        raw: &str,
        subtotal: u64,
        now: Timestamp,
    ) -> Result<AppliedCoupon, CouponRejection> {
        validate(self.find(&CouponCode::normalise(raw)), subtotal, now)
    }

    /// Number of coupons in the catalog
    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    /// Whether the catalog has no coupons
    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}
