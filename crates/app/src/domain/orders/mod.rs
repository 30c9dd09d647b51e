//! Orders

pub mod errors;
pub mod models;
mod repositories;
pub mod service;

pub use errors::OrdersServiceError;
pub use repositories::{MockOrdersRepository, OrdersRepository, PgOrdersRepository};
pub use service::*;
