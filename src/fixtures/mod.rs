//! Fixtures
//!
//! YAML documents describing a coupon catalog and a cart, used by tests, the
//! CLI and local development in place of the hosted database.

use std::{fs, path::Path};

use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    basket::Basket,
    coupons::{Coupon, CouponCatalog},
    items::CartLine,
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Fixture
#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    coupons: Vec<Coupon>,

    #[serde(default)]
    cart: Vec<CartLine>,
}

impl Fixture {
    /// Parse a fixture from YAML text.
    ///
    /// # Errors
    ///
    /// Returns a `FixtureError` if the YAML is malformed.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Read and parse a fixture file.
    ///
    /// # Errors
    ///
    /// Returns a `FixtureError` if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Coupons defined by the fixture
    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    /// Catalog of the fixture's coupons
    pub fn coupon_catalog(&self) -> CouponCatalog {
        CouponCatalog::new(self.coupons.iter().cloned())
    }

    /// Basket holding the fixture's cart lines
    pub fn basket(&self, currency: &'static Currency) -> Basket {
        Basket::with_lines(self.cart.iter().cloned(), currency)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    const YAML: &str = r#"
coupons:
  - code: WELCOME10
    discount_type: percent
    discount_value: 10
    min_purchase: 0
    expiry_date: "2099-12-31T23:59:59Z"
  - code: FLAT50K
    discount_type: fixed
    discount_value: 50000
    min_purchase: 500000
    expiry_date: "2099-12-31T23:59:59Z"
cart:
  - id: 1
    size: M
    quantity: 2
    price: 150000
    name: Court Classic
  - id: 1
    size: M
    quantity: 1
    price: 150000
"#;

    #[test]
    fn parses_coupons_and_cart() -> TestResult {
        let fixture = Fixture::from_yaml(YAML)?;

        assert_eq!(fixture.coupons().len(), 2);
        assert_eq!(fixture.coupon_catalog().len(), 2);

        let basket = fixture.basket(iso::IDR);
        assert_eq!(basket.len(), 1);
        assert_eq!(basket.total_items(), 3);
        assert_eq!(basket.subtotal()?, 450_000);

        Ok(())
    }

    #[test]
    fn empty_document_sections_default() -> TestResult {
        let fixture = Fixture::from_yaml("coupons: []")?;

        assert!(fixture.coupon_catalog().is_empty());
        assert!(fixture.basket(iso::IDR).is_empty());

        Ok(())
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(matches!(
            Fixture::from_yaml("coupons: [unterminated"),
            Err(FixtureError::Yaml(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            Fixture::from_path("/definitely/not/here.yaml"),
            Err(FixtureError::Io(_))
        ));
    }
}
