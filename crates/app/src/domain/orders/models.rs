//! Order Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use truekicks::items::CartLine;

/// Order Model, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
    pub total_price: f64,
    pub items: Vec<CartLine>,
    pub status: String,
    pub created_at: Timestamp,
}

impl Order {
    /// Total quantity across the order's items.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        truekicks::pricing::total_items(&self.items)
    }
}
