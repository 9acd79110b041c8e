//! Order types shared between the checkout flow and the API layer.
//!
//! `OrderItem` is a frozen copy of a cart line at checkout time: later
//! catalog edits never change a placed order. `total_amount` is fixed at
//! creation (`subtotal + shipping_cost`) and never recomputed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::create_id;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Placed,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    PaymentFailed,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ShippingAddress {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Frozen snapshot of a cart line, independent of later catalog edits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub price: i64,
    pub quantity: u32,
    pub image: Option<String>,
    pub weight_grams: f64,
    pub making_charges_saved: i64,
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id.clone(),
            name: item.product.name.clone(),
            price: item.product.price,
            quantity: item.quantity,
            image: item.product.images.first().cloned(),
            weight_grams: item.product.weight_grams,
            making_charges_saved: item.product.making_charges_saved,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Order {
    pub id: String,
    pub order_number: String,
    pub customer: CustomerDetails,
    pub address: ShippingAddress,
    pub items: Vec<OrderItem>,
    pub subtotal: i64,
    pub total_savings: i64,
    pub shipping_cost: i64,
    pub total_amount: i64,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub payment_id: Option<String>,
    pub payment_method: Option<String>,
    pub gateway_order_id: Option<String>,
    pub tracking_number: Option<String>,
    pub shipping_provider: Option<String>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// A fresh order in its initial state: payment pending, placed.
    pub fn draft(
        customer: CustomerDetails,
        address: ShippingAddress,
        items: Vec<OrderItem>,
        subtotal: i64,
        total_savings: i64,
        shipping_cost: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: create_id(),
            order_number: generate_order_number(now),
            customer,
            address,
            items,
            subtotal,
            total_savings,
            shipping_cost,
            total_amount: subtotal + shipping_cost,
            payment_status: PaymentStatus::Pending,
            order_status: OrderStatus::Placed,
            payment_id: None,
            payment_method: None,
            gateway_order_id: None,
            tracking_number: None,
            shipping_provider: None,
            admin_notes: None,
            created_at: now,
        }
    }
}

/// Human-shareable order number: date plus a random suffix, e.g.
/// `FLG-20260829-K3JF7Q`.
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix: String = create_id()
        .chars()
        .rev()
        .take(6)
        .collect::<String>()
        .to_uppercase();
    format!("FLG-{}-{}", now.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MetalPurity, MetalType, Product, ProductCategory};

    fn cart_item(id: &str, price: i64, quantity: u32) -> CartItem {
        CartItem {
            product: Product {
                id: id.to_string(),
                name: format!("Piece {id}"),
                description: String::new(),
                category: ProductCategory::Ring,
                metal_type: MetalType::Gold,
                metal_purity: MetalPurity::K22,
                weight_grams: 4.0,
                stone_weight_carats: None,
                stone_quality: None,
                stone_grade: None,
                stone_setting: None,
                stone_count: None,
                price,
                mrp: price + 1_000,
                making_charges_saved: 1_000,
                images: vec!["https://cdn.example/a.webp".to_string()],
                videos: vec![],
                stock_quantity: 2,
                active: true,
            },
            quantity,
        }
    }

    #[test]
    fn test_order_number_shape() {
        let number = generate_order_number(Utc::now());
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "FLG");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn test_order_numbers_differ() {
        let now = Utc::now();
        let a = generate_order_number(now);
        let b = generate_order_number(now);
        assert_ne!(a, b);
    }

    #[test]
    fn test_snapshot_is_independent_of_later_edits() {
        let mut item = cart_item("a", 10_000, 2);
        let snapshot = OrderItem::from(&item);

        item.product.price = 99_999;
        item.product.name = "Renamed".to_string();

        assert_eq!(snapshot.price, 10_000);
        assert_eq!(snapshot.name, "Piece a");
        assert_eq!(snapshot.image.as_deref(), Some("https://cdn.example/a.webp"));
    }

    #[test]
    fn test_draft_totals_invariant() {
        let items = vec![OrderItem::from(&cart_item("a", 10_000, 2))];
        let order = Order::draft(
            CustomerDetails::default(),
            ShippingAddress::default(),
            items,
            20_000,
            2_000,
            200,
        );
        assert_eq!(order.total_amount, 20_200);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.order_status, OrderStatus::Placed);
    }
}
