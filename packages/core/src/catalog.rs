//! Catalog snapshot types and the query/filter layer.
//!
//! `Product` here is the client-facing snapshot that the cart, wishlist
//! and order flows operate on. `CatalogFilter` narrows an active product
//! set by category and free-text query; the category half round-trips
//! through a URL query parameter so filtered views stay shareable.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Ring,
    Necklace,
    Earring,
    Bracelet,
    Pendant,
    Chain,
    Bangle,
    Anklet,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 8] = [
        ProductCategory::Ring,
        ProductCategory::Necklace,
        ProductCategory::Earring,
        ProductCategory::Bracelet,
        ProductCategory::Pendant,
        ProductCategory::Chain,
        ProductCategory::Bangle,
        ProductCategory::Anklet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Ring => "ring",
            ProductCategory::Necklace => "necklace",
            ProductCategory::Earring => "earring",
            ProductCategory::Bracelet => "bracelet",
            ProductCategory::Pendant => "pendant",
            ProductCategory::Chain => "chain",
            ProductCategory::Bangle => "bangle",
            ProductCategory::Anklet => "anklet",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(value))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetalType {
    Gold,
    Silver,
    Platinum,
    WhiteGold,
    RoseGold,
}

impl MetalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetalType::Gold => "gold",
            MetalType::Silver => "silver",
            MetalType::Platinum => "platinum",
            MetalType::WhiteGold => "white_gold",
            MetalType::RoseGold => "rose_gold",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetalPurity {
    K14,
    K18,
    K22,
    K24,
    S925,
    Pt950,
}

/// Catalog entity as the storefront sees it. Prices are whole currency
/// units; `making_charges_saved` is always `mrp - price` at the time the
/// row was written and is never edited independently.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub metal_type: MetalType,
    pub metal_purity: MetalPurity,
    pub weight_grams: f64,
    pub stone_weight_carats: Option<f64>,
    pub stone_quality: Option<String>,
    pub stone_grade: Option<String>,
    pub stone_setting: Option<String>,
    pub stone_count: Option<i32>,
    pub price: i64,
    pub mrp: i64,
    pub making_charges_saved: i64,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub stock_quantity: i32,
    pub active: bool,
}

impl Product {
    /// Derived field, recomputed on every write. Callers must have
    /// already rejected `mrp < price`.
    pub fn compute_making_charges_saved(mrp: i64, price: i64) -> i64 {
        mrp - price
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(ProductCategory),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogFilter {
    pub category: CategoryFilter,
    pub query: Option<String>,
}

impl CatalogFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn category(category: ProductCategory) -> Self {
        Self {
            category: CategoryFilter::Category(category),
            query: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = if query.trim().is_empty() {
            None
        } else {
            Some(query)
        };
        self
    }

    /// The value mirrored into the `category` URL parameter.
    pub fn category_param(&self) -> &'static str {
        match self.category {
            CategoryFilter::All => "all",
            CategoryFilter::Category(c) => c.as_str(),
        }
    }

    /// Restores a filter from a URL parameter value. Unknown values fall
    /// back to `all` so stale links keep working.
    pub fn from_category_param(value: &str) -> Self {
        match ProductCategory::parse(value) {
            Some(category) => Self::category(category),
            None => Self::all(),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        if !product.active {
            return false;
        }

        if let CategoryFilter::Category(category) = self.category
            && product.category != category
        {
            return false;
        }

        let Some(query) = &self.query else {
            return true;
        };
        let needle = query.to_lowercase();
        product.name.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle)
            || product.category.as_str().contains(&needle)
    }

    pub fn filter<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn product(id: &str, category: ProductCategory, active: bool) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Test {id}"),
            description: "Handcrafted piece".to_string(),
            category,
            metal_type: MetalType::Gold,
            metal_purity: MetalPurity::K22,
            weight_grams: 4.2,
            stone_weight_carats: None,
            stone_quality: None,
            stone_grade: None,
            stone_setting: None,
            stone_count: None,
            price: 10_000,
            mrp: 12_000,
            making_charges_saved: 2_000,
            images: vec![],
            videos: vec![],
            stock_quantity: 3,
            active,
        }
    }

    #[test]
    fn test_category_filter_returns_only_matching_active() {
        let products = vec![
            product("r1", ProductCategory::Ring, true),
            product("r2", ProductCategory::Ring, false),
            product("n1", ProductCategory::Necklace, true),
        ];

        let rings = CatalogFilter::category(ProductCategory::Ring).filter(&products);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].id, "r1");

        let all = CatalogFilter::all().filter(&products);
        assert_eq!(all.len(), 2, "inactive products never surface");
    }

    #[test]
    fn test_query_matches_name_description_and_category() {
        let mut p = product("p1", ProductCategory::Pendant, true);
        p.name = "Lotus Drop".to_string();
        p.description = "Rose gold with a single diamond".to_string();
        let products = vec![p];

        for query in ["lotus", "DIAMOND", "pend"] {
            let hits = CatalogFilter::all().with_query(query).filter(&products);
            assert_eq!(hits.len(), 1, "query {query:?} should match");
        }

        let misses = CatalogFilter::all().with_query("bangle").filter(&products);
        assert!(misses.is_empty());
    }

    #[test]
    fn test_category_param_round_trip() {
        for category in ProductCategory::ALL {
            let filter = CatalogFilter::category(category);
            let restored = CatalogFilter::from_category_param(filter.category_param());
            assert_eq!(filter, restored);
        }

        assert_eq!(
            CatalogFilter::from_category_param("all"),
            CatalogFilter::all()
        );
        // Stale/unknown params degrade to the unfiltered view.
        assert_eq!(
            CatalogFilter::from_category_param("tiara"),
            CatalogFilter::all()
        );
    }

    #[test]
    fn test_making_charges_saved_is_mrp_minus_price() {
        assert_eq!(Product::compute_making_charges_saved(12_000, 10_000), 2_000);
        assert_eq!(Product::compute_making_charges_saved(5_000, 5_000), 0);
    }
}
