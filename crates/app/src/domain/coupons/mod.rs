//! Coupons

pub mod errors;
mod repositories;
pub mod service;

pub use errors::CouponsServiceError;
pub use repositories::{CouponsRepository, FixtureCouponsRepository, MockCouponsRepository, PgCouponsRepository};
pub use service::*;
