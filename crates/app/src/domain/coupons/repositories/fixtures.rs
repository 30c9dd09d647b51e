//! Fixture-backed coupon catalog

use async_trait::async_trait;
use truekicks::{
    coupons::{Coupon, CouponCatalog, CouponCode},
    fixtures::Fixture,
};

use crate::domain::coupons::repositories::CouponsRepository;

/// Coupon lookup served from a YAML fixture instead of the database.
#[derive(Debug, Clone, Default)]
pub struct FixtureCouponsRepository {
    catalog: CouponCatalog,
}

impl FixtureCouponsRepository {
    #[must_use]
    pub fn new(catalog: CouponCatalog) -> Self {
        Self { catalog }
    }
}

impl From<&Fixture> for FixtureCouponsRepository {
    fn from(fixture: &Fixture) -> Self {
        Self::new(fixture.coupon_catalog())
    }
}

#[async_trait]
impl CouponsRepository for FixtureCouponsRepository {
    async fn find_coupon(&self, code: &CouponCode) -> Result<Option<Coupon>, sqlx::Error> {
        Ok(self.catalog.find(code).cloned())
    }
}
