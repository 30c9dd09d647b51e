//! Coupons Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query_as};
use truekicks::coupons::{Coupon, CouponCode, DiscountType};

use crate::{database::Db, domain::coupons::repositories::CouponsRepository};

const FIND_COUPON_SQL: &str = include_str!("../sql/find_coupon.sql");

#[derive(Debug, Clone)]
pub struct PgCouponsRepository {
    db: Db,
}

impl PgCouponsRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CouponsRepository for PgCouponsRepository {
    async fn find_coupon(&self, code: &CouponCode) -> Result<Option<Coupon>, sqlx::Error> {
        let row = query_as::<Postgres, CouponRow>(FIND_COUPON_SQL)
            .bind(code.as_str())
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(|CouponRow(coupon)| coupon))
    }
}

struct CouponRow(Coupon);

impl<'r> FromRow<'r, PgRow> for CouponRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount_type = match row.try_get::<String, _>("discount_type")?.as_str() {
            "percent" => DiscountType::Percent,
            "fixed" => DiscountType::Fixed,
            other => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "discount_type".to_string(),
                    source: format!("unknown discount type {other:?}").into(),
                });
            }
        };

        let min_purchase_i64: i64 = row.try_get("min_purchase")?;

        let min_purchase = u64::try_from(min_purchase_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "min_purchase".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self(Coupon {
            code: row.try_get("code")?,
            discount_type,
            discount_value: row.try_get("discount_value")?,
            min_purchase,
            expiry_date: row.try_get::<SqlxTimestamp, _>("expiry_date")?.to_jiff(),
        }))
    }
}
