//! Coupons service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, error};
use truekicks::coupons::{self, AppliedCoupon, CouponCode};

use crate::domain::coupons::{errors::CouponsServiceError, repositories::CouponsRepository};

#[derive(Clone)]
pub struct DefaultCouponsService {
    repository: Arc<dyn CouponsRepository>,
}

impl DefaultCouponsService {
    #[must_use]
    pub fn new(repository: Arc<dyn CouponsRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl CouponsService for DefaultCouponsService {
    async fn verify_coupon(
        &self,
        code: &str,
        subtotal: u64,
        point_in_time: Timestamp,
    ) -> Result<AppliedCoupon, CouponsServiceError> {
        let code = CouponCode::normalise(code);

        if code.is_empty() {
            return Err(CouponsServiceError::NotFound);
        }

        let coupon = self.repository.find_coupon(&code).await.map_err(|source| {
            error!(%code, "coupon lookup failed: {source}");

            CouponsServiceError::from(source)
        })?;

        debug!(%code, subtotal, found = coupon.is_some(), "coupon lookup");

        Ok(coupons::validate(coupon.as_ref(), subtotal, point_in_time)?)
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Look up `code` and check it against `subtotal` as of `point_in_time`.
    async fn verify_coupon(
        &self,
        code: &str,
        subtotal: u64,
        point_in_time: Timestamp,
    ) -> Result<AppliedCoupon, CouponsServiceError>;
}
