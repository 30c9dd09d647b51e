//! Wishlist

use serde::{Deserialize, Serialize};

use crate::{
    items::ProductId,
    storage::{self, KeyValueStore, StorageError},
};

/// Key the wishlist is persisted under.
pub const WISHLIST_KEY: &str = "wishlistItems";

/// A saved product. Unlike cart lines, wishlist entries are unique by product alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    /// Product identifier
    pub id: ProductId,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Price at the time it was saved, in minor units
    #[serde(default)]
    pub price: u64,

    /// Display image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Saved products in the order they were added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Wishlist {
    items: Vec<WishlistItem>,
}

impl Wishlist {
    /// Empty wishlist
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the persisted wishlist; missing or corrupt state yields an empty one.
    pub fn load<S>(store: &S) -> Self
    where
        S: KeyValueStore + ?Sized,
    {
        let items: Vec<WishlistItem> = storage::load_json(store, WISHLIST_KEY);

        let mut wishlist = Self::new();
        for item in items {
            wishlist.add(item);
        }

        wishlist
    }

    /// Persist the wishlist.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the store could not be written.
    pub fn save<S>(&self, store: &mut S) -> Result<(), StorageError>
    where
        S: KeyValueStore + ?Sized,
    {
        storage::save_json(store, WISHLIST_KEY, &self.items)
    }

    /// Add an item. Returns `false` if the product was already saved.
    pub fn add(&mut self, item: WishlistItem) -> bool {
        if self.contains(item.id) {
            return false;
        }

        self.items.push(item);
        true
    }

    /// Remove a product. Absent products are ignored.
    pub fn remove(&mut self, id: ProductId) {
        self.items.retain(|item| item.id != id);
    }

    /// Add the item if absent, otherwise remove it. Returns whether it is now saved.
    pub fn toggle(&mut self, item: WishlistItem) -> bool {
        if self.contains(item.id) {
            self.remove(item.id);
            false
        } else {
            self.items.push(item);
            true
        }
    }

    /// Whether the product is saved
    pub fn contains(&self, id: ProductId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Saved items
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    /// Number of saved items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is saved
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::storage::MemoryStore;

    use super::*;

    fn item(id: ProductId) -> WishlistItem {
        WishlistItem {
            id,
            name: format!("Product {id}"),
            price: 100_000,
            image: None,
        }
    }

    #[test]
    fn add_is_idempotent() {
        let mut wishlist = Wishlist::new();

        assert!(wishlist.add(item(1)));
        assert!(!wishlist.add(item(1)));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut wishlist = Wishlist::new();

        assert!(wishlist.toggle(item(4)));
        assert!(wishlist.contains(4));
        assert!(!wishlist.toggle(item(4)));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut wishlist = Wishlist::new();
        wishlist.add(item(1));

        wishlist.remove(2);

        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn persists_through_store() -> TestResult {
        let mut store = MemoryStore::new();
        let mut wishlist = Wishlist::new();
        wishlist.add(item(1));
        wishlist.add(item(2));

        wishlist.save(&mut store)?;

        assert_eq!(Wishlist::load(&store), wishlist);

        Ok(())
    }

    #[test]
    fn corrupt_state_loads_empty() -> TestResult {
        let mut store = MemoryStore::new();
        store.set(WISHLIST_KEY, "null".to_string())?;

        assert!(Wishlist::load(&store).is_empty());

        Ok(())
    }
}
