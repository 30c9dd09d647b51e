//! Items

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Product identifier as stored by the catalog.
pub type ProductId = i64;

/// Identity of a cart line: one product in one size.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LineKey {
    /// Product identifier
    pub product_id: ProductId,

    /// Size label (e.g. `"42"` or `"M"`)
    pub size: String,
}

impl LineKey {
    /// Creates a new line key
    pub fn new(product_id: ProductId, size: impl Into<String>) -> Self {
        Self {
            product_id,
            size: size.into(),
        }
    }
}

/// A single product and size selection with a captured unit price.
///
/// Field names on the wire match the persisted cart and the order `items`
/// column, so `product_id` serialises as `id` and `unit_price` as `price`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "id")]
    product_id: ProductId,

    size: String,

    quantity: NonZeroU32,

    #[serde(rename = "price")]
    unit_price: u64,

    #[serde(default)]
    name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

impl CartLine {
    /// Creates a new line
    pub fn new(
        product_id: ProductId,
        size: impl Into<String>,
        quantity: NonZeroU32,
        unit_price: u64,
    ) -> Self {
        Self {
            product_id,
            size: size.into(),
            quantity,
            unit_price,
            name: String::new(),
            image: None,
        }
    }

    /// Attaches the product name shown alongside the line
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Attaches the product image shown alongside the line
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Returns the identity key of this line
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id, self.size.clone())
    }

    /// Returns true when this line has the given product and size
    pub fn matches(&self, product_id: ProductId, size: &str) -> bool {
        self.product_id == product_id && self.size == size
    }

    /// Returns the product identifier
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Returns the size label
    pub fn size(&self) -> &str {
        &self.size
    }

    /// Returns the quantity
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    /// Returns the unit price in minor units
    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    /// Returns the display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the display image, if any
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Returns `unit_price * quantity`, or `None` on overflow
    pub fn extended_price(&self) -> Option<u64> {
        self.unit_price
            .checked_mul(u64::from(self.quantity.get()))
    }

    pub(crate) fn increase_quantity(&mut self, by: NonZeroU32) {
        self.quantity = self.quantity.saturating_add(by.get());
    }

    pub(crate) fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }
}
