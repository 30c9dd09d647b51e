//! Order Repositories

mod orders;

use async_trait::async_trait;
use mockall::automock;
use truekicks::checkout::OrderSubmission;

use crate::domain::orders::models::Order;

pub use orders::PgOrdersRepository;

/// Order persistence.
#[automock]
#[async_trait]
pub trait OrdersRepository: Send + Sync {
    /// Store a new order and return the stored record.
    async fn create_order(&self, order: &OrderSubmission) -> Result<Order, sqlx::Error>;

    /// Orders placed by `user_id`, newest first.
    async fn list_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, sqlx::Error>;
}
