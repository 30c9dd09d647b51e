//! Orders Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query_as, types::Json};
use truekicks::{checkout::OrderSubmission, items::CartLine};

use crate::{
    database::Db,
    domain::orders::{models::Order, repositories::OrdersRepository},
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const LIST_ORDERS_FOR_USER_SQL: &str = include_str!("../sql/list_orders_for_user.sql");

#[derive(Debug, Clone)]
pub struct PgOrdersRepository {
    db: Db,
}

impl PgOrdersRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrdersRepository for PgOrdersRepository {
    async fn create_order(&self, order: &OrderSubmission) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.user_id())
            .bind(order.full_name())
            .bind(order.address())
            .bind(order.city())
            .bind(order.postal_code())
            .bind(order.phone())
            .bind(order.total_price())
            .bind(Json(order.items()))
            .bind(order.status())
            .fetch_one(self.db.pool())
            .await
    }

    async fn list_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_FOR_USER_SQL)
            .bind(user_id)
            .fetch_all(self.db.pool())
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            full_name: row.try_get("full_name")?,
            address: row.try_get("address")?,
            city: row
                .try_get::<Option<String>, _>("city")?
                .unwrap_or_default(),
            postal_code: row
                .try_get::<Option<String>, _>("postal_code")?
                .unwrap_or_default(),
            phone: row
                .try_get::<Option<String>, _>("phone")?
                .unwrap_or_default(),
            total_price: row.try_get("total_price")?,
            items: row.try_get::<Json<Vec<CartLine>>, _>("items")?.0,
            status: row.try_get("status")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
