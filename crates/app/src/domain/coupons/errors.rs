//! Coupons service errors.

use jiff::Timestamp;
use thiserror::Error;
use truekicks::coupons::CouponRejection;

#[derive(Debug, Error)]
pub enum CouponsServiceError {
    #[error("invalid coupon code")]
    NotFound,

    #[error("coupon has expired")]
    Expired { expired_at: Timestamp },

    #[error("minimum purchase for this coupon is {min_purchase}")]
    MinimumNotMet { min_purchase: u64 },

    #[error("storage error")]
    Sql(#[source] sqlx::Error),
}

impl From<CouponRejection> for CouponsServiceError {
    fn from(rejection: CouponRejection) -> Self {
        match rejection {
            CouponRejection::NotFound => Self::NotFound,
            CouponRejection::Expired { expired_at } => Self::Expired { expired_at },
            CouponRejection::MinimumNotMet { min_purchase } => Self::MinimumNotMet { min_purchase },
        }
    }
}

impl From<sqlx::Error> for CouponsServiceError {
    fn from(error: sqlx::Error) -> Self {
        if matches!(error, sqlx::Error::RowNotFound) {
            return Self::NotFound;
        }

        Self::Sql(error)
    }
}

impl CouponsServiceError {
    /// Whether the coupon was refused by a business rule rather than a failed lookup.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Sql(_))
    }
}
