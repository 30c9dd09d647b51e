//! Storefront application services, persistence and session wiring.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod observability;
pub mod storefront;
