//! Checkout
//!
//! Validates contact details and freezes the cart into an [`OrderSubmission`]
//! ready to hand to order persistence.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::{
    coupons::AppliedCoupon,
    discounts::{DiscountError, discount_amount},
    items::CartLine,
    pricing::{TotalPriceError, subtotal},
};

/// Status every new order is created with.
pub const INITIAL_STATUS: &str = "Processing";

/// Reasons a checkout is refused before anything is persisted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// The user id is missing or not an integer.
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),

    /// The full name is empty.
    #[error("full name is required")]
    MissingFullName,

    /// The address is empty.
    #[error("address is required")]
    MissingAddress,

    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The total price is not a non-negative number.
    #[error("invalid total price: {0:?}")]
    InvalidTotalPrice(String),

    /// Totals could not be computed.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// The coupon discount could not be computed.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Contact and delivery details entered at checkout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    /// Raw user identifier; must parse as an integer. Decodes from a JSON
    /// number or string.
    #[serde(deserialize_with = "number_or_text")]
    pub user_id: String,

    /// Recipient name
    pub full_name: String,

    /// Street address
    pub address: String,

    /// City, optional
    #[serde(default)]
    pub city: Option<String>,

    /// Postal code, optional
    #[serde(default)]
    pub postal_code: Option<String>,

    /// Contact phone
    #[serde(default)]
    pub phone: String,
}

/// Checkout amounts in minor units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutTotals {
    /// Sum of extended prices
    pub subtotal: u64,

    /// Coupon discount, at most `subtotal`
    pub discount: u64,

    /// Shipping fee, added after the discount
    pub shipping: u64,

    /// `subtotal - discount + shipping`
    pub total: u64,
}

impl CheckoutTotals {
    /// Compute totals for `items` with an optional coupon and a shipping fee.
    ///
    /// # Errors
    ///
    /// Returns a `CheckoutError` if any amount overflows or the coupon value is unusable.
    pub fn compute(
        items: &[CartLine],
        coupon: Option<&AppliedCoupon>,
        shipping: u64,
    ) -> Result<Self, CheckoutError> {
        let subtotal = subtotal(items)?;

        let discount = coupon
            .map(|coupon| discount_amount(coupon, subtotal))
            .transpose()?
            .unwrap_or(0);

        let total = subtotal
            .saturating_sub(discount)
            .checked_add(shipping)
            .ok_or(TotalPriceError::Overflow)?;

        Ok(Self {
            subtotal,
            discount,
            shipping,
            total,
        })
    }
}

/// A validated, immutable order request.
///
/// `items` is an owned copy of the cart taken at assembly time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderSubmission {
    user_id: i64,
    full_name: String,
    address: String,
    city: String,
    postal_code: String,
    phone: String,
    total_price: f64,
    items: Vec<CartLine>,
    status: &'static str,
}

impl OrderSubmission {
    /// Owner of the order
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Recipient name
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Street address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// City, empty when not given
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Postal code, empty when not given
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    /// Contact phone
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Total charged
    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    /// Ordered items
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    /// Initial status, always [`INITIAL_STATUS`]
    pub fn status(&self) -> &'static str {
        self.status
    }
}

/// Assemble an order from the checkout form, the current cart lines and the
/// computed totals. Checks run in order and the first failure is returned.
///
/// # Errors
///
/// Returns a `CheckoutError` for the first required field that is missing or invalid.
pub fn assemble(
    form: &CheckoutForm,
    items: &[CartLine],
    totals: &CheckoutTotals,
) -> Result<OrderSubmission, CheckoutError> {
    #[expect(
        clippy::cast_precision_loss,
        reason = "order totals are far below 2^53 minor units"
    )]
    let total_price = totals.total as f64;

    let user_id = validate_required(form, items)?;

    Ok(build(user_id, form, items, total_price))
}

/// Raw order body as received at the storefront boundary, where the client
/// supplies the total itself.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct OrderRequest {
    /// Contact and delivery details
    #[serde(flatten)]
    pub form: CheckoutForm,

    /// Client-computed total; must parse as a non-negative number. Decodes
    /// from a JSON number or string.
    #[serde(deserialize_with = "number_or_text")]
    pub total_price: String,

    /// Ordered items
    #[serde(default)]
    pub items: Vec<CartLine>,
}

impl OrderRequest {
    /// Validate the request and build the submission.
    ///
    /// # Errors
    ///
    /// Returns a `CheckoutError` for the first invalid field; the total price
    /// is checked after the required fields.
    pub fn into_submission(self) -> Result<OrderSubmission, CheckoutError> {
        let user_id = validate_required(&self.form, &self.items)?;

        let total_price = parse_total_price(&self.total_price)?;

        Ok(build(user_id, &self.form, &self.items, total_price))
    }
}

/// Parse a client-supplied total price.
///
/// # Errors
///
/// Returns [`CheckoutError::InvalidTotalPrice`] unless `raw` is a finite, non-negative number.
pub fn parse_total_price(raw: &str) -> Result<f64, CheckoutError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price >= 0.0)
        .ok_or_else(|| CheckoutError::InvalidTotalPrice(raw.to_string()))
}

/// Parse a user id the way the order endpoints expect it.
///
/// # Errors
///
/// Returns [`CheckoutError::InvalidUserId`] if `raw` is not an integer.
pub fn parse_user_id(raw: &str) -> Result<i64, CheckoutError> {
    raw.trim()
        .parse()
        .map_err(|_invalid| CheckoutError::InvalidUserId(raw.to_string()))
}

fn validate_required(form: &CheckoutForm, items: &[CartLine]) -> Result<i64, CheckoutError> {
    let user_id = parse_user_id(&form.user_id)?;

    if form.full_name.trim().is_empty() {
        return Err(CheckoutError::MissingFullName);
    }

    if form.address.trim().is_empty() {
        return Err(CheckoutError::MissingAddress);
    }

    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    Ok(user_id)
}

fn build(
    user_id: i64,
    form: &CheckoutForm,
    items: &[CartLine],
    total_price: f64,
) -> OrderSubmission {
    OrderSubmission {
        user_id,
        full_name: form.full_name.clone(),
        address: form.address.clone(),
        city: form.city.clone().unwrap_or_default(),
        postal_code: form.postal_code.clone().unwrap_or_default(),
        phone: form.phone.clone(),
        total_price,
        items: items.to_vec(),
        status: INITIAL_STATUS,
    }
}

/// Numeric fields arrive as JSON numbers from some clients and strings from others.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

fn number_or_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Int(value) => value.to_string(),
        NumberOrText::Float(value) => value.to_string(),
        NumberOrText::Text(value) => value,
    })
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use testresult::TestResult;

    use crate::coupons::DiscountType;

    use super::*;

    fn line(product_id: i64, size: &str, quantity: u32, price: u64) -> CartLine {
        CartLine::new(
            product_id,
            size,
            NonZeroU32::new(quantity).unwrap_or(NonZeroU32::MIN),
            price,
        )
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            user_id: "12".to_string(),
            full_name: "Budi Santoso".to_string(),
            address: "Jl. Sudirman 1".to_string(),
            city: None,
            postal_code: None,
            phone: "08123456789".to_string(),
        }
    }

    fn totals(items: &[CartLine]) -> Result<CheckoutTotals, CheckoutError> {
        CheckoutTotals::compute(items, None, 0)
    }

    #[test]
    fn assemble_builds_processing_order() -> TestResult {
        let items = [line(1, "M", 2, 150_000)];
        let order = assemble(&form(), &items, &totals(&items)?)?;

        assert_eq!(order.user_id(), 12);
        assert_eq!(order.status(), "Processing");
        assert_eq!(order.city(), "");
        assert_eq!(order.postal_code(), "");
        assert!((order.total_price() - 300_000.0).abs() < f64::EPSILON);
        assert_eq!(order.items(), &items);

        Ok(())
    }

    #[test]
    fn non_numeric_user_id_is_rejected() -> TestResult {
        let items = [line(1, "M", 1, 100)];
        let form = CheckoutForm {
            user_id: "abc".to_string(),
            ..form()
        };

        assert_eq!(
            assemble(&form, &items, &totals(&items)?),
            Err(CheckoutError::InvalidUserId("abc".to_string()))
        );

        Ok(())
    }

    #[test]
    fn empty_cart_is_rejected() -> TestResult {
        assert_eq!(
            assemble(&form(), &[], &totals(&[])?),
            Err(CheckoutError::EmptyCart)
        );

        Ok(())
    }

    #[test]
    fn first_failing_field_wins() -> TestResult {
        let form = CheckoutForm {
            full_name: "  ".to_string(),
            address: String::new(),
            ..form()
        };

        assert_eq!(
            assemble(&form, &[], &totals(&[])?),
            Err(CheckoutError::MissingFullName)
        );

        Ok(())
    }

    #[test]
    fn missing_address_is_rejected() -> TestResult {
        let items = [line(1, "M", 1, 100)];
        let form = CheckoutForm {
            address: String::new(),
            ..form()
        };

        assert_eq!(
            assemble(&form, &items, &totals(&items)?),
            Err(CheckoutError::MissingAddress)
        );

        Ok(())
    }

    #[test]
    fn optional_fields_are_kept_when_given() -> TestResult {
        let items = [line(1, "M", 1, 100)];
        let form = CheckoutForm {
            city: Some("Bandung".to_string()),
            postal_code: Some("40115".to_string()),
            ..form()
        };

        let order = assemble(&form, &items, &totals(&items)?)?;

        assert_eq!(order.city(), "Bandung");
        assert_eq!(order.postal_code(), "40115");

        Ok(())
    }

    #[test]
    fn totals_apply_discount_before_shipping() -> TestResult {
        let items = [line(1, "M", 2, 150_000)];
        let coupon = AppliedCoupon {
            code: "SAVE10".to_string(),
            discount_type: DiscountType::Percent,
            discount_value: 10.0,
        };

        let totals = CheckoutTotals::compute(&items, Some(&coupon), 20_000)?;

        assert_eq!(
            totals,
            CheckoutTotals {
                subtotal: 300_000,
                discount: 30_000,
                shipping: 20_000,
                total: 290_000,
            }
        );

        Ok(())
    }

    #[test]
    fn fixed_discount_clamps_total_at_shipping() -> TestResult {
        let items = [line(1, "M", 1, 10_000)];
        let coupon = AppliedCoupon {
            code: "FLAT50".to_string(),
            discount_type: DiscountType::Fixed,
            discount_value: 50_000.0,
        };

        let totals = CheckoutTotals::compute(&items, Some(&coupon), 5_000)?;

        assert_eq!(totals.discount, 10_000);
        assert_eq!(totals.total, 5_000);

        Ok(())
    }

    #[test]
    fn request_with_invalid_total_price_is_rejected() {
        let request = OrderRequest {
            form: form(),
            total_price: "lots".to_string(),
            items: vec![line(1, "M", 1, 100)],
        };

        assert_eq!(
            request.into_submission(),
            Err(CheckoutError::InvalidTotalPrice("lots".to_string()))
        );
    }

    #[test]
    fn request_with_negative_total_price_is_rejected() {
        let request = OrderRequest {
            form: form(),
            total_price: "-1".to_string(),
            items: vec![line(1, "M", 1, 100)],
        };

        assert!(matches!(
            request.into_submission(),
            Err(CheckoutError::InvalidTotalPrice(_))
        ));
    }

    #[test]
    fn request_decodes_and_validates() -> TestResult {
        let request: OrderRequest = serde_json::from_str(
            r#"{
                "user_id": "5",
                "full_name": "Siti",
                "address": "Jl. Merdeka 10",
                "phone": "0812",
                "total_price": "450000",
                "items": [{"id": 3, "size": "42", "quantity": 1, "price": 450000}]
            }"#,
        )?;

        let order = request.into_submission()?;

        assert_eq!(order.user_id(), 5);
        assert_eq!(order.items().len(), 1);

        Ok(())
    }

    #[test]
    fn request_accepts_numeric_user_id_and_total() -> TestResult {
        let request: OrderRequest = serde_json::from_str(
            r#"{
                "user_id": 5,
                "full_name": "Siti",
                "address": "Jl. Merdeka 10",
                "phone": "0812",
                "total_price": 450000.5,
                "items": [{"id": 3, "size": "42", "quantity": 1, "price": 450000}]
            }"#,
        )?;

        let order = request.into_submission()?;

        assert_eq!(order.user_id(), 5);
        assert!((order.total_price() - 450_000.5).abs() < f64::EPSILON);

        Ok(())
    }

    #[test]
    fn numeric_body_still_runs_field_validation() -> TestResult {
        let request: OrderRequest = serde_json::from_str(
            r#"{
                "user_id": 5.5,
                "full_name": "Siti",
                "address": "Jl. Merdeka 10",
                "total_price": -10,
                "items": [{"id": 3, "size": "42", "quantity": 1, "price": 450000}]
            }"#,
        )?;

        assert_eq!(
            request.into_submission(),
            Err(CheckoutError::InvalidUserId("5.5".to_string()))
        );

        let request: OrderRequest = serde_json::from_str(
            r#"{
                "user_id": 5,
                "full_name": "Siti",
                "address": "Jl. Merdeka 10",
                "total_price": -10,
                "items": [{"id": 3, "size": "42", "quantity": 1, "price": 450000}]
            }"#,
        )?;

        assert_eq!(
            request.into_submission(),
            Err(CheckoutError::InvalidTotalPrice("-10".to_string()))
        );

        Ok(())
    }

    #[test]
    fn submission_serialises_with_column_names() -> TestResult {
        let items = [line(1, "M", 1, 100)];
        let order = assemble(&form(), &items, &totals(&items)?)?;

        let json = serde_json::to_value(&order)?;

        assert_eq!(json["user_id"], 12);
        assert_eq!(json["status"], "Processing");
        assert_eq!(json["items"][0]["id"], 1);
        assert_eq!(json["city"], "");

        Ok(())
    }
}
