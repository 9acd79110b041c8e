//! Domain core for the Filigree storefront.
//!
//! Everything in this crate is pure logic over in-memory state: the cart
//! and wishlist containers with their derived totals, the catalog filter,
//! the session/identity cache, and the checkout orchestration sequence.
//! External collaborators (order persistence, the payment gateway, mail)
//! sit behind traits so the whole flow runs against in-memory fakes in
//! tests and against sea-orm / HTTP adapters in `filigree-api`.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod order;
pub mod persist;
pub mod session;
pub mod wishlist;

/// Collision-resistant id for every generated row.
pub fn create_id() -> String {
    cuid2::create_id()
}
