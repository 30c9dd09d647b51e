//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{error, info};
use truekicks::checkout::{OrderSubmission, parse_user_id};

use crate::domain::orders::{
    errors::OrdersServiceError, models::Order, repositories::OrdersRepository,
};

#[derive(Clone)]
pub struct DefaultOrdersService {
    repository: Arc<dyn OrdersRepository>,
}

impl DefaultOrdersService {
    #[must_use]
    pub fn new(repository: Arc<dyn OrdersRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl OrdersService for DefaultOrdersService {
    async fn place_order(&self, order: OrderSubmission) -> Result<Order, OrdersServiceError> {
        let created = self.repository.create_order(&order).await.map_err(|source| {
            error!(user_id = order.user_id(), "failed to create order: {source}");

            OrdersServiceError::from(source)
        })?;

        info!(
            order_id = created.id,
            user_id = created.user_id,
            items = created.items.len(),
            total_price = created.total_price,
            "order placed"
        );

        Ok(created)
    }

    async fn order_history(&self, user_id: &str) -> Result<Vec<Order>, OrdersServiceError> {
        let user_id = parse_user_id(user_id)?;

        let mut orders = self
            .repository
            .list_orders_for_user(user_id)
            .await
            .map_err(|source| {
                error!(user_id, "failed to fetch orders: {source}");

                OrdersServiceError::from(source)
            })?;

        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(orders)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Persist an assembled order. The stored status is always `Processing`.
    async fn place_order(&self, order: OrderSubmission) -> Result<Order, OrdersServiceError>;

    /// Orders placed by `user_id`, newest first.
    async fn order_history(&self, user_id: &str) -> Result<Vec<Order>, OrdersServiceError>;
}
