//! Storefront session
//!
//! Ties one shopper's persisted cart, wishlist and identity to coupon
//! verification and order placement.

use std::{fmt, sync::Arc};

use jiff::Timestamp;
use rusty_money::iso;
use thiserror::Error;
use tracing::{info, warn};
use truekicks::{
    basket::{Basket, CART_KEY},
    checkout::{CheckoutError, CheckoutForm, CheckoutTotals, assemble},
    coupons::AppliedCoupon,
    identity::{Identity, ProfileError, ProfileUpdate, User},
    items::{CartLine, ProductId},
    storage::{KeyValueStore, StorageError},
    wishlist::{Wishlist, WishlistItem},
};

use crate::domain::{
    coupons::{CouponsService, CouponsServiceError},
    orders::{OrdersService, OrdersServiceError, models::Order},
};

/// Errors raised by storefront operations.
#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Coupon(#[from] CouponsServiceError),

    #[error(transparent)]
    Orders(#[from] OrdersServiceError),
}

/// Delivery and contact details; the user id comes from the session.
#[derive(Debug, Clone, Default)]
pub struct ContactDetails {
    /// Recipient name
    pub full_name: String,

    /// Street address
    pub address: String,

    /// City, optional
    pub city: Option<String>,

    /// Postal code, optional
    pub postal_code: Option<String>,

    /// Contact phone
    pub phone: String,
}

/// Persisted session state: cart, wishlist and the current shopper.
///
/// Every mutation is written through to the store.
#[derive(Debug)]
pub struct Session<S> {
    store: S,
    basket: Basket,
    wishlist: Wishlist,
    identity: Identity,
}

impl<S> Session<S>
where
    S: KeyValueStore,
{
    /// Load whatever state `store` holds.
    pub fn open(store: S) -> Self {
        Self {
            basket: Basket::load(&store, iso::IDR),
            wishlist: Wishlist::load(&store),
            identity: Identity::resolve(&store),
            store,
        }
    }

    pub fn basket(&self) -> &Basket {
        &self.basket
    }

    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted.
    pub fn add_to_cart(&mut self, line: CartLine) -> Result<(), StorefrontError> {
        self.basket.add(line);

        Ok(self.basket.save(&mut self.store)?)
    }

    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted.
    pub fn remove_from_cart(
        &mut self,
        product_id: ProductId,
        size: &str,
    ) -> Result<(), StorefrontError> {
        self.basket.remove(product_id, size);

        Ok(self.basket.save(&mut self.store)?)
    }

    /// Set a line's quantity, clamped to at least one. Returns whether a line matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        size: &str,
        quantity: i64,
    ) -> Result<bool, StorefrontError> {
        let updated = self.basket.set_quantity(product_id, size, quantity);

        self.basket.save(&mut self.store)?;

        Ok(updated)
    }

    /// Empty the cart and drop its persisted copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted cart could not be removed. The
    /// in-memory cart is empty either way.
    pub fn clear_cart(&mut self) -> Result<(), StorefrontError> {
        self.basket.clear();

        Ok(self.store.remove(CART_KEY)?)
    }

    /// Save or unsave a product. Returns whether it is now saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the wishlist could not be persisted.
    pub fn toggle_wishlist(&mut self, item: WishlistItem) -> Result<bool, StorefrontError> {
        let saved = self.wishlist.toggle(item);

        self.wishlist.save(&mut self.store)?;

        Ok(saved)
    }

    /// # Errors
    ///
    /// Returns an error if the user could not be persisted.
    pub fn login(&mut self, user: User) -> Result<(), StorefrontError> {
        self.identity = Identity::login(&mut self.store, user)?;

        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the user could not be removed from the store.
    pub fn logout(&mut self) -> Result<(), StorefrontError> {
        self.identity = Identity::logout(&mut self.store)?;

        Ok(())
    }

    /// Change the logged-in user's display name.
    ///
    /// # Errors
    ///
    /// Returns a profile error for guests or a blank name, or a storage error
    /// if the user could not be persisted.
    pub fn rename(&mut self, full_name: &str) -> Result<(), StorefrontError> {
        let update = ProfileUpdate::parse(&self.identity.user_id_param(), full_name)?;

        if let Some(mut user) = self.identity.user().cloned() {
            update.apply(&mut user);
            self.identity = Identity::login(&mut self.store, user)?;
        }

        Ok(())
    }
}

/// A [`Session`] plus the applied coupon and the services checkout talks to.
pub struct Storefront<S> {
    session: Session<S>,
    coupon: Option<AppliedCoupon>,
    shipping_fee: u64,
    coupons: Arc<dyn CouponsService>,
    orders: Arc<dyn OrdersService>,
}

impl<S: fmt::Debug> fmt::Debug for Storefront<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storefront")
            .field("session", &self.session)
            .field("coupon", &self.coupon)
            .field("shipping_fee", &self.shipping_fee)
            .finish_non_exhaustive()
    }
}

impl<S> Storefront<S>
where
    S: KeyValueStore,
{
    /// Open a session, loading whatever state `store` holds.
    pub fn open(
        store: S,
        coupons: Arc<dyn CouponsService>,
        orders: Arc<dyn OrdersService>,
        shipping_fee: u64,
    ) -> Self {
        Self {
            session: Session::open(store),
            coupon: None,
            shipping_fee,
            coupons,
            orders,
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    /// Cart, wishlist and login changes. An applied coupon stays applied;
    /// totals are recomputed on every read.
    pub fn session_mut(&mut self) -> &mut Session<S> {
        &mut self.session
    }

    pub fn applied_coupon(&self) -> Option<&AppliedCoupon> {
        self.coupon.as_ref()
    }

    /// Empty the cart and forget any applied coupon.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted cart could not be removed.
    pub fn clear_cart(&mut self) -> Result<(), StorefrontError> {
        self.coupon = None;

        self.session.clear_cart()
    }

    /// Current totals, recomputed from the cart and applied coupon.
    ///
    /// # Errors
    ///
    /// Returns an error if the totals overflow or the coupon value is unusable.
    pub fn totals(&self) -> Result<CheckoutTotals, StorefrontError> {
        Ok(CheckoutTotals::compute(
            self.session.basket.lines(),
            self.coupon.as_ref(),
            self.shipping_fee,
        )?)
    }

    /// Verify `code` against the current subtotal and remember it on success.
    /// A rejected code leaves any previously applied coupon in place.
    ///
    /// # Errors
    ///
    /// Returns the rejection or lookup failure from the coupon service.
    pub async fn apply_coupon(&mut self, code: &str) -> Result<AppliedCoupon, StorefrontError> {
        let subtotal = self.session.basket.subtotal().map_err(CheckoutError::from)?;

        let applied = self
            .coupons
            .verify_coupon(code, subtotal, Timestamp::now())
            .await?;

        self.coupon = Some(applied.clone());

        Ok(applied)
    }

    pub fn remove_coupon(&mut self) {
        self.coupon = None;
    }

    /// Place an order for the current cart.
    ///
    /// An applied coupon is verified again against the current subtotal and
    /// the order is priced on the terms that verification returns. The order
    /// is assembled and validated before anything is sent to order
    /// persistence. Once the order is stored the cart and coupon are cleared;
    /// failing to remove the persisted cart is logged, not returned, since
    /// the order already exists.
    ///
    /// # Errors
    ///
    /// Returns a validation error, a coupon rejection, or an order persistence
    /// failure. The cart is left untouched in each case.
    pub async fn checkout(&mut self, contact: ContactDetails) -> Result<Order, StorefrontError> {
        let form = CheckoutForm {
            user_id: self.session.identity.user_id_param(),
            full_name: contact.full_name,
            address: contact.address,
            city: contact.city,
            postal_code: contact.postal_code,
            phone: contact.phone,
        };

        if let Some(coupon) = self.coupon.clone() {
            let subtotal = self.session.basket.subtotal().map_err(CheckoutError::from)?;

            let refreshed = self
                .coupons
                .verify_coupon(&coupon.code, subtotal, Timestamp::now())
                .await
                .inspect_err(|error| {
                    warn!(code = %coupon.code, "applied coupon no longer valid: {error}");
                })?;

            self.coupon = Some(refreshed);
        }

        let totals = self.totals()?;
        let submission = assemble(&form, self.session.basket.lines(), &totals)?;

        let order = self.orders.place_order(submission).await?;

        info!(
            order_id = order.id,
            total = totals.total,
            discount = totals.discount,
            "checkout complete"
        );

        if let Err(error) = self.clear_cart() {
            warn!(order_id = order.id, "order placed but the cart could not be cleared: {error}");
        }

        Ok(order)
    }

    /// Orders placed by the logged-in user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error for guests or when the lookup fails.
    pub async fn order_history(&self) -> Result<Vec<Order>, StorefrontError> {
        Ok(self
            .orders
            .order_history(&self.session.identity.user_id_param())
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use testresult::TestResult;
    use truekicks::{coupons::DiscountType, storage::MemoryStore};

    use crate::domain::{coupons::MockCouponsService, orders::MockOrdersService};

    use super::*;

    /// Store whose deletes always fail.
    #[derive(Debug, Default)]
    struct UndeletableStore(MemoryStore);

    impl KeyValueStore for UndeletableStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
            self.0.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }

    fn line(product_id: i64, size: &str, quantity: u32, price: u64) -> CartLine {
        CartLine::new(
            product_id,
            size,
            NonZeroU32::new(quantity).unwrap_or(NonZeroU32::MIN),
            price,
        )
    }

    fn user() -> User {
        User {
            id: 12,
            full_name: "Budi".to_string(),
            email: "budi@example.com".to_string(),
        }
    }

    fn contact() -> ContactDetails {
        ContactDetails {
            full_name: "Budi Santoso".to_string(),
            address: "Jl. Sudirman 1".to_string(),
            phone: "0812".to_string(),
            ..ContactDetails::default()
        }
    }

    fn percent_off(discount_value: f64) -> AppliedCoupon {
        AppliedCoupon {
            code: "SAVE10".to_string(),
            discount_type: DiscountType::Percent,
            discount_value,
        }
    }

    fn stored_order(total_price: f64, items: Vec<CartLine>) -> Order {
        Order {
            id: 41,
            user_id: 12,
            full_name: "Budi Santoso".to_string(),
            address: "Jl. Sudirman 1".to_string(),
            city: String::new(),
            postal_code: String::new(),
            phone: "0812".to_string(),
            total_price,
            items,
            status: "Processing".to_string(),
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn storefront(
        store: MemoryStore,
        coupons: MockCouponsService,
        orders: MockOrdersService,
    ) -> Storefront<MemoryStore> {
        Storefront::open(store, Arc::new(coupons), Arc::new(orders), 0)
    }

    #[tokio::test]
    async fn checkout_with_coupon_places_discounted_order_and_clears_cart() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_verify_coupon()
            .times(2)
            .withf(|code, subtotal, _| {
                code.trim().eq_ignore_ascii_case("save10") && *subtotal == 300_000
            })
            .returning(|_, _, _| Ok(percent_off(10.0)));

        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .withf(|order| {
                order.user_id() == 12
                    && (order.total_price() - 270_000.0).abs() < f64::EPSILON
                    && order.items().len() == 1
            })
            .returning(|order| Ok(stored_order(order.total_price(), order.items().to_vec())));

        let mut storefront = storefront(MemoryStore::new(), coupons, orders);

        storefront.session_mut().login(user())?;
        storefront
            .session_mut()
            .add_to_cart(line(1, "M", 2, 150_000))?;
        storefront.apply_coupon(" save10 ").await?;

        let order = storefront.checkout(contact()).await?;

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total_items(), 2);
        assert!(storefront.session().basket().is_empty());
        assert!(storefront.applied_coupon().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn checkout_prices_on_reverified_coupon_terms() -> TestResult {
        let mut coupons = MockCouponsService::new();
        let mut verified = 0;

        coupons
            .expect_verify_coupon()
            .times(2)
            .returning(move |_, _, _| {
                verified += 1;

                Ok(percent_off(if verified == 1 { 10.0 } else { 20.0 }))
            });

        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .withf(|order| (order.total_price() - 240_000.0).abs() < f64::EPSILON)
            .returning(|order| Ok(stored_order(order.total_price(), order.items().to_vec())));

        let mut storefront = storefront(MemoryStore::new(), coupons, orders);

        storefront.session_mut().login(user())?;
        storefront
            .session_mut()
            .add_to_cart(line(1, "M", 2, 150_000))?;
        storefront.apply_coupon("SAVE10").await?;

        let order = storefront.checkout(contact()).await?;

        assert!((order.total_price - 240_000.0).abs() < f64::EPSILON);

        Ok(())
    }

    #[tokio::test]
    async fn placed_order_is_returned_when_cart_cleanup_fails() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .returning(|order| Ok(stored_order(order.total_price(), order.items().to_vec())));

        let mut storefront = Storefront::open(
            UndeletableStore::default(),
            Arc::new(MockCouponsService::new()),
            Arc::new(orders),
            0,
        );

        storefront.session_mut().login(user())?;
        storefront.session_mut().add_to_cart(line(1, "M", 1, 100))?;

        let order = storefront.checkout(contact()).await?;

        assert_eq!(order.id, 41);
        assert!(storefront.session().basket().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_checkout_never_reaches_persistence() -> TestResult {
        let mut orders = MockOrdersService::new();
        orders.expect_place_order().never();

        let mut storefront = storefront(MemoryStore::new(), MockCouponsService::new(), orders);
        storefront.session_mut().login(user())?;

        let result = storefront.checkout(contact()).await;

        assert!(matches!(
            result,
            Err(StorefrontError::Checkout(CheckoutError::EmptyCart))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn guest_checkout_is_rejected_as_invalid_user() -> TestResult {
        let mut orders = MockOrdersService::new();
        orders.expect_place_order().never();

        let mut storefront = storefront(MemoryStore::new(), MockCouponsService::new(), orders);
        storefront.session_mut().add_to_cart(line(1, "M", 1, 100))?;

        let result = storefront.checkout(contact()).await;

        assert!(matches!(
            result,
            Err(StorefrontError::Checkout(CheckoutError::InvalidUserId(_)))
        ));
        assert_eq!(storefront.session().basket().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn failed_order_keeps_cart() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .returning(|_| Err(OrdersServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let mut storefront = storefront(MemoryStore::new(), MockCouponsService::new(), orders);
        storefront.session_mut().login(user())?;
        storefront.session_mut().add_to_cart(line(1, "M", 1, 100))?;

        let result = storefront.checkout(contact()).await;

        assert!(matches!(result, Err(StorefrontError::Orders(_))));
        assert_eq!(storefront.session().basket().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn coupon_no_longer_valid_blocks_checkout() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_verify_coupon()
            .once()
            .withf(|_, subtotal, _| *subtotal == 200_000)
            .returning(|_, _, _| Ok(percent_off(10.0)));

        coupons
            .expect_verify_coupon()
            .once()
            .withf(|_, subtotal, _| *subtotal == 100_000)
            .returning(|_, _, _| {
                Err(CouponsServiceError::MinimumNotMet {
                    min_purchase: 150_000,
                })
            });

        let mut orders = MockOrdersService::new();
        orders.expect_place_order().never();

        let mut storefront = storefront(MemoryStore::new(), coupons, orders);
        storefront.session_mut().login(user())?;
        storefront
            .session_mut()
            .add_to_cart(line(1, "M", 2, 100_000))?;
        storefront.apply_coupon("SAVE10").await?;
        storefront.session_mut().update_quantity(1, "M", 1)?;

        let result = storefront.checkout(contact()).await;

        assert!(matches!(
            result,
            Err(StorefrontError::Coupon(
                CouponsServiceError::MinimumNotMet { .. }
            ))
        ));
        assert_eq!(storefront.session().basket().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn rejected_coupon_is_not_applied() {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_verify_coupon()
            .once()
            .returning(|_, _, _| Err(CouponsServiceError::NotFound));

        let mut storefront = storefront(MemoryStore::new(), coupons, MockOrdersService::new());

        let result = storefront.apply_coupon("NOPE").await;

        assert!(matches!(
            result,
            Err(StorefrontError::Coupon(CouponsServiceError::NotFound))
        ));
        assert!(storefront.applied_coupon().is_none());
    }

    #[test]
    fn session_state_survives_reopen() -> TestResult {
        let mut session = Session::open(MemoryStore::new());

        session.login(user())?;
        session.add_to_cart(line(7, "42", 1, 1_000))?;
        session.add_to_cart(line(7, "42", 2, 1_000))?;
        session.toggle_wishlist(WishlistItem {
            id: 7,
            name: "Air Runner".to_string(),
            price: 1_000,
            image: None,
        })?;

        let reopened = Session::open(session.store.clone());

        assert_eq!(reopened.basket().len(), 1);
        assert_eq!(reopened.basket().total_items(), 3);
        assert!(reopened.wishlist().contains(7));
        assert_eq!(reopened.identity().user(), Some(&user()));

        Ok(())
    }

    #[test]
    fn rename_updates_persisted_user() -> TestResult {
        let mut session = Session::open(MemoryStore::new());

        assert!(matches!(
            session.rename("Budi"),
            Err(StorefrontError::Profile(ProfileError::InvalidUserId))
        ));

        session.login(user())?;
        session.rename("  Budi Santoso ")?;

        let reopened = Session::open(session.store.clone());

        assert_eq!(
            reopened.identity().user().map(|user| user.full_name.as_str()),
            Some("Budi Santoso")
        );

        Ok(())
    }

    #[test]
    fn totals_include_shipping_after_discount() -> TestResult {
        let mut storefront = Storefront::open(
            MemoryStore::new(),
            Arc::new(MockCouponsService::new()),
            Arc::new(MockOrdersService::new()),
            25_000,
        );

        storefront
            .session_mut()
            .add_to_cart(line(1, "M", 1, 100_000))?;
        storefront.coupon = Some(percent_off(10.0));

        let totals = storefront.totals()?;

        assert_eq!(totals.discount, 10_000);
        assert_eq!(totals.total, 115_000);

        Ok(())
    }

    #[test]
    fn debug_output_skips_services() {
        let storefront = storefront(
            MemoryStore::new(),
            MockCouponsService::new(),
            MockOrdersService::new(),
        );

        let debug = format!("{storefront:?}");

        assert!(debug.starts_with("Storefront"));
        assert!(debug.contains("shipping_fee: 0"));
        assert!(debug.ends_with(".. }"));
    }
}
