use super::sea_orm_active_enums::{OrderStatus, PaymentStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(schema_name = "public", table_name = "Order")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,
    #[sea_orm(column_name = "orderNumber", column_type = "Text", unique)]
    pub order_number: String,
    #[sea_orm(column_name = "customerName", column_type = "Text")]
    pub customer_name: String,
    #[sea_orm(column_name = "customerEmail", column_type = "Text")]
    pub customer_email: String,
    #[sea_orm(column_name = "customerPhone", column_type = "Text")]
    pub customer_phone: String,
    /// Shipping address as a JSON object, same shape the checkout form submits.
    pub address: Json,
    /// List of order item snapshots, priced at placement time.
    pub items: Json,
    pub subtotal: i64,
    #[sea_orm(column_name = "totalSavings")]
    pub total_savings: i64,
    #[sea_orm(column_name = "shippingCost")]
    pub shipping_cost: i64,
    #[sea_orm(column_name = "totalAmount")]
    pub total_amount: i64,
    #[sea_orm(column_name = "paymentStatus")]
    pub payment_status: PaymentStatus,
    #[sea_orm(column_name = "orderStatus")]
    pub order_status: OrderStatus,
    #[sea_orm(column_name = "paymentId", column_type = "Text", nullable)]
    pub payment_id: Option<String>,
    #[sea_orm(column_name = "paymentMethod", column_type = "Text", nullable)]
    pub payment_method: Option<String>,
    #[sea_orm(column_name = "gatewayOrderId", column_type = "Text", nullable)]
    pub gateway_order_id: Option<String>,
    #[sea_orm(column_name = "trackingNumber", column_type = "Text", nullable)]
    pub tracking_number: Option<String>,
    #[sea_orm(column_name = "shippingProvider", column_type = "Text", nullable)]
    pub shipping_provider: Option<String>,
    #[sea_orm(column_name = "adminNotes", column_type = "Text", nullable)]
    pub admin_notes: Option<String>,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime,
    #[sea_orm(column_name = "updatedAt")]
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
