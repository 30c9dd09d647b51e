//! Basket
//!
//! The line item store behind the shopping cart. Lines are unique by
//! `(product_id, size)` and keep insertion order.

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};

use crate::{
    items::{CartLine, ProductId},
    pricing::{self, TotalPriceError},
    storage::{self, KeyValueStore, StorageError},
};

/// Key the cart is persisted under.
pub const CART_KEY: &str = "cartItems";

/// Basket
#[derive(Debug, Clone)]
pub struct Basket {
    lines: Vec<CartLine>,
    currency: &'static Currency,
}

impl Basket {
    /// Create a new, empty basket.
    pub fn new(currency: &'static Currency) -> Self {
        Basket {
            lines: Vec::new(),
            currency,
        }
    }

    /// Create a basket from existing lines, merging any that share a key.
    pub fn with_lines(lines: impl IntoIterator<Item = CartLine>, currency: &'static Currency) -> Self {
        let mut basket = Basket::new(currency);

        for line in lines {
            basket.add(line);
        }

        basket
    }

    /// Load the persisted basket. Missing or corrupt state yields an empty basket.
    pub fn load<S>(store: &S, currency: &'static Currency) -> Self
    where
        S: KeyValueStore + ?Sized,
    {
        let lines: Vec<CartLine> = storage::load_json(store, CART_KEY);

        Basket::with_lines(lines, currency)
    }

    /// Persist the basket.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the store could not be written.
    pub fn save<S>(&self, store: &mut S) -> Result<(), StorageError>
    where
        S: KeyValueStore + ?Sized,
    {
        storage::save_json(store, CART_KEY, &self.lines)
    }

    /// Add a line. If a line with the same product and size exists its quantity
    /// is increased by the incoming quantity, otherwise the line is appended.
    pub fn add(&mut self, line: CartLine) {
        match self
            .lines
            .iter_mut()
            .find(|existing| existing.matches(line.product_id(), line.size()))
        {
            Some(existing) => existing.increase_quantity(line.quantity()),
            None => self.lines.push(line),
        }
    }

    /// Remove the line with the given product and size. Absent lines are ignored.
    pub fn remove(&mut self, product_id: ProductId, size: &str) {
        self.lines.retain(|line| !line.matches(product_id, size));
    }

    /// Replace the quantity of a line, clamping anything below one to one.
    ///
    /// Returns `false` if no line matched.
    pub fn set_quantity(&mut self, product_id: ProductId, size: &str, quantity: i64) -> bool {
        let clamped = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        let quantity = NonZeroU32::new(clamped).unwrap_or(NonZeroU32::MIN);

        match self
            .lines
            .iter_mut()
            .find(|line| line.matches(product_id, size))
        {
            Some(line) => {
                line.set_quantity(quantity);
                true
            }
            None => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Find the line with the given product and size.
    pub fn get(&self, product_id: ProductId, size: &str) -> Option<&CartLine> {
        self.lines
            .iter()
            .find(|line| line.matches(product_id, size))
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Detached copy of the current lines.
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    /// Sum of quantities.
    pub fn total_items(&self) -> u64 {
        pricing::total_items(&self.lines)
    }

    /// Calculate the subtotal of the basket in minor units.
    ///
    /// # Errors
    ///
    /// Returns a `TotalPriceError` if the sum overflows.
    pub fn subtotal(&self) -> Result<u64, TotalPriceError> {
        pricing::subtotal(&self.lines)
    }

    /// Calculate the subtotal of the basket as money.
    ///
    /// # Errors
    ///
    /// Returns a `TotalPriceError` if the sum overflows.
    pub fn subtotal_money(&self) -> Result<Money<'static, Currency>, TotalPriceError> {
        pricing::subtotal_money(&self.lines, self.currency)
    }

    /// Get the number of distinct lines in the basket.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the basket.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
