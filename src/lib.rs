//! TrueKicks
//!
//! Cart, coupon and checkout pricing for the TrueKicks storefront. Everything
//! here is synchronous and side-effect free apart from the pluggable
//! [`storage`] backends; talking to the database lives in `truekicks-app`.

pub mod basket;
pub mod checkout;
pub mod coupons;
pub mod discounts;
pub mod fixtures;
pub mod identity;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod storage;
pub mod wishlist;
