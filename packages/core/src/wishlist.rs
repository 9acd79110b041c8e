//! The wishlist state container: a deduplicated set of product
//! snapshots keyed by product id. No quantities, no checkout
//! interaction; lifecycle is fully independent of the cart.

use std::sync::Arc;

use crate::catalog::Product;
use crate::persist::{StatePersistence, WISHLIST_KEY};

pub struct WishlistStore {
    items: Vec<Product>,
    persistence: Option<Arc<dyn StatePersistence>>,
}

impl Default for WishlistStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WishlistStore {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            persistence: None,
        }
    }

    pub fn with_persistence(persistence: Arc<dyn StatePersistence>) -> Self {
        let items = match persistence.load(WISHLIST_KEY) {
            Ok(Some(blob)) => serde_json::from_str(&blob).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Discarding unreadable wishlist blob");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load wishlist");
                Vec::new()
            }
        };
        Self {
            items,
            persistence: Some(persistence),
        }
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|p| p.id == product_id)
    }

    pub fn add_item(&mut self, product: Product) {
        if self.contains(&product.id) {
            return;
        }
        self.items.push(product);
        self.persist();
    }

    pub fn remove_item(&mut self, product_id: &str) {
        let before = self.items.len();
        self.items.retain(|p| p.id != product_id);
        if self.items.len() != before {
            self.persist();
        }
    }

    /// Add when absent, remove when present. Self-inverse.
    pub fn toggle(&mut self, product: Product) {
        if self.contains(&product.id) {
            self.remove_item(&product.id);
        } else {
            self.add_item(product);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    fn persist(&self) {
        let Some(persistence) = &self.persistence else {
            return;
        };
        let blob = match serde_json::to_string(&self.items) {
            Ok(blob) => blob,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to serialize wishlist");
                return;
            }
        };
        if let Err(err) = persistence.save(WISHLIST_KEY, &blob) {
            tracing::warn!(error = %err, "Failed to persist wishlist");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MetalPurity, MetalType, ProductCategory};

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Piece {id}"),
            description: String::new(),
            category: ProductCategory::Earring,
            metal_type: MetalType::Silver,
            metal_purity: MetalPurity::S925,
            weight_grams: 2.0,
            stone_weight_carats: None,
            stone_quality: None,
            stone_grade: None,
            stone_setting: None,
            stone_count: None,
            price: 3_000,
            mrp: 3_500,
            making_charges_saved: 500,
            images: vec![],
            videos: vec![],
            stock_quantity: 5,
            active: true,
        }
    }

    #[test]
    fn test_add_is_deduplicated_by_product_id() {
        let mut wishlist = WishlistStore::new();
        wishlist.add_item(product("a"));
        wishlist.add_item(product("a"));
        assert_eq!(wishlist.items().len(), 1);
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut wishlist = WishlistStore::new();
        wishlist.add_item(product("a"));

        wishlist.toggle(product("b"));
        assert!(wishlist.contains("b"));
        wishlist.toggle(product("b"));
        assert!(!wishlist.contains("b"));

        assert_eq!(wishlist.items().len(), 1);
        assert!(wishlist.contains("a"));
    }

    #[test]
    fn test_clear_empties_the_list() {
        let mut wishlist = WishlistStore::new();
        wishlist.add_item(product("a"));
        wishlist.add_item(product("b"));
        wishlist.clear();
        assert!(wishlist.items().is_empty());
    }
}
