//! The shopping cart state container.
//!
//! One `CartItem` per product id; adding an already-present product
//! increments its quantity. Derived totals are computed on demand, not
//! cached. Every mutation persists the whole cart through the configured
//! [`StatePersistence`]; save failures are logged and swallowed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::persist::{CART_KEY, StatePersistence};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

pub struct CartStore {
    items: Vec<CartItem>,
    persistence: Option<Arc<dyn StatePersistence>>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            persistence: None,
        }
    }

    /// Restores the cart from the persistence layer. A missing or
    /// unreadable blob yields an empty cart.
    pub fn with_persistence(persistence: Arc<dyn StatePersistence>) -> Self {
        let items = match persistence.load(CART_KEY) {
            Ok(Some(blob)) => serde_json::from_str(&blob).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Discarding unreadable cart blob");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load cart");
                Vec::new()
            }
        };
        Self {
            items,
            persistence: Some(persistence),
        }
    }

    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self {
            items,
            persistence: None,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds `quantity` of the product, merging with an existing line for
    /// the same product id. No upper bound is enforced here; clamping
    /// against stock is the caller's responsibility.
    pub fn add_item(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|i| i.product.id == product.id) {
            Some(item) => item.quantity += quantity,
            None => self.items.push(CartItem { product, quantity }),
        }
        self.persist();
    }

    /// No-op when the product is not in the cart.
    pub fn remove_item(&mut self, product_id: &str) {
        let before = self.items.len();
        self.items.retain(|i| i.product.id != product_id);
        if self.items.len() != before {
            self.persist();
        }
    }

    /// Replaces the stored quantity. Zero or negative removes the line
    /// entirely, matching `remove_item`.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            self.persist();
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn subtotal(&self) -> i64 {
        self.items
            .iter()
            .map(|i| i.product.price * i64::from(i.quantity))
            .sum()
    }

    pub fn total_savings(&self) -> i64 {
        self.items
            .iter()
            .map(|i| i.product.making_charges_saved * i64::from(i.quantity))
            .sum()
    }

    fn persist(&self) {
        let Some(persistence) = &self.persistence else {
            return;
        };
        let blob = match serde_json::to_string(&self.items) {
            Ok(blob) => blob,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to serialize cart");
                return;
            }
        };
        if let Err(err) = persistence.save(CART_KEY, &blob) {
            tracing::warn!(error = %err, "Failed to persist cart");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MetalPurity, MetalType, ProductCategory};
    use crate::persist::MemoryPersistence;

    fn product(id: &str, price: i64, mrp: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Piece {id}"),
            description: String::new(),
            category: ProductCategory::Ring,
            metal_type: MetalType::Gold,
            metal_purity: MetalPurity::K18,
            weight_grams: 3.5,
            stone_weight_carats: None,
            stone_quality: None,
            stone_grade: None,
            stone_setting: None,
            stone_count: None,
            price,
            mrp,
            making_charges_saved: Product::compute_making_charges_saved(mrp, price),
            images: vec!["https://cdn.example/img.webp".to_string()],
            videos: vec![],
            stock_quantity: 10,
            active: true,
        }
    }

    #[test]
    fn test_add_item_merges_duplicate_product_ids() {
        let mut cart = CartStore::new();
        cart.add_item(product("a", 1_000, 1_200), 1);
        cart.add_item(product("a", 1_000, 1_200), 2);
        cart.add_item(product("b", 500, 500), 1);

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_remove_missing_item_is_a_no_op() {
        let mut cart = CartStore::new();
        cart.add_item(product("a", 1_000, 1_200), 1);
        cart.remove_item("nope");
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        let mut cart = CartStore::new();
        cart.add_item(product("a", 1_000, 1_200), 2);
        cart.update_quantity("a", 0);
        assert!(cart.is_empty());

        cart.add_item(product("a", 1_000, 1_200), 2);
        cart.update_quantity("a", -5);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_saturates_instead_of_wrapping() {
        let mut cart = CartStore::new();
        cart.add_item(product("a", 1_000, 1_200), 1);
        cart.update_quantity("a", i64::from(u32::MAX) + 5);
        assert_eq!(cart.items()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_totals_scenario() {
        // Two of a 10000/12000 piece plus one zero-savings piece.
        let mut cart = CartStore::new();
        cart.add_item(product("a", 10_000, 12_000), 2);
        cart.add_item(product("b", 5_000, 5_000), 1);

        assert_eq!(cart.subtotal(), 25_000);
        assert_eq!(cart.total_savings(), 4_000);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_randomized_mutations_match_reference_accumulator() {
        // xorshift keeps the sequence deterministic without a rand dep.
        let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed
        };

        let catalog: Vec<Product> = (0..8)
            .map(|i| product(&format!("p{i}"), 500 * (i + 1), 700 * (i + 1)))
            .collect();

        let mut cart = CartStore::new();
        let mut reference: std::collections::HashMap<String, (i64, i64, i64)> =
            std::collections::HashMap::new();

        for _ in 0..500 {
            let p = &catalog[(next() % 8) as usize];
            match next() % 3 {
                0 => {
                    let qty = (next() % 4 + 1) as u32;
                    cart.add_item(p.clone(), qty);
                    let entry = reference.entry(p.id.clone()).or_insert((
                        0,
                        p.price,
                        p.making_charges_saved,
                    ));
                    entry.0 += i64::from(qty);
                }
                1 => {
                    cart.remove_item(&p.id);
                    reference.remove(&p.id);
                }
                _ => {
                    let qty = (next() % 6) as i64 - 1;
                    if reference.contains_key(&p.id) {
                        cart.update_quantity(&p.id, qty);
                        if qty <= 0 {
                            reference.remove(&p.id);
                        } else if let Some(entry) = reference.get_mut(&p.id) {
                            entry.0 = qty;
                        }
                    }
                }
            }

            let expected_count: i64 = reference.values().map(|(q, _, _)| q).sum();
            let expected_subtotal: i64 = reference.values().map(|(q, price, _)| q * price).sum();
            let expected_savings: i64 = reference.values().map(|(q, _, s)| q * s).sum();

            assert_eq!(i64::from(cart.item_count()), expected_count);
            assert_eq!(cart.subtotal(), expected_subtotal);
            assert_eq!(cart.total_savings(), expected_savings);
            assert_eq!(cart.items().len(), reference.len(), "one line per product id");
        }
    }

    #[test]
    fn test_cart_survives_reload_through_persistence() {
        let persistence = Arc::new(MemoryPersistence::new());

        let mut cart = CartStore::with_persistence(persistence.clone());
        cart.add_item(product("a", 10_000, 12_000), 2);
        drop(cart);

        let restored = CartStore::with_persistence(persistence);
        assert_eq!(restored.item_count(), 2);
        assert_eq!(restored.subtotal(), 20_000);
    }
}
