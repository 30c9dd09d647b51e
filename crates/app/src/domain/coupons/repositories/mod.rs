//! Coupon Repositories

mod coupons;
mod fixtures;

use async_trait::async_trait;
use mockall::automock;
use truekicks::coupons::{Coupon, CouponCode};

pub use coupons::PgCouponsRepository;
pub use fixtures::FixtureCouponsRepository;

/// Read-only access to coupon reference data.
#[automock]
#[async_trait]
pub trait CouponsRepository: Send + Sync {
    /// Find the coupon whose code matches the normalised `code`.
    async fn find_coupon(&self, code: &CouponCode) -> Result<Option<Coupon>, sqlx::Error>;
}
