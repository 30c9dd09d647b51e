//! TrueKicks prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Basket, CART_KEY},
    checkout::{
        CheckoutError, CheckoutForm, CheckoutTotals, INITIAL_STATUS, OrderRequest,
        OrderSubmission, assemble,
    },
    coupons::{AppliedCoupon, Coupon, CouponCatalog, CouponCode, CouponRejection, DiscountType},
    discounts::{DiscountError, discount_amount},
    fixtures::{Fixture, FixtureError},
    identity::{Identity, ProfileError, ProfileUpdate, User},
    items::{CartLine, LineKey, ProductId},
    pricing::{TotalPriceError, subtotal, total_items},
    storage::{FileStore, KeyValueStore, MemoryStore, StorageError},
    wishlist::{Wishlist, WishlistItem},
};
