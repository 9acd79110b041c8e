use filigree_core::catalog;
use filigree_core::order;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "product_category")]
pub enum ProductCategory {
    #[sea_orm(string_value = "RING")]
    Ring,
    #[sea_orm(string_value = "NECKLACE")]
    Necklace,
    #[sea_orm(string_value = "EARRING")]
    Earring,
    #[sea_orm(string_value = "BRACELET")]
    Bracelet,
    #[sea_orm(string_value = "PENDANT")]
    Pendant,
    #[sea_orm(string_value = "CHAIN")]
    Chain,
    #[sea_orm(string_value = "BANGLE")]
    Bangle,
    #[sea_orm(string_value = "ANKLET")]
    Anklet,
}

impl From<catalog::ProductCategory> for ProductCategory {
    fn from(value: catalog::ProductCategory) -> Self {
        match value {
            catalog::ProductCategory::Ring => ProductCategory::Ring,
            catalog::ProductCategory::Necklace => ProductCategory::Necklace,
            catalog::ProductCategory::Earring => ProductCategory::Earring,
            catalog::ProductCategory::Bracelet => ProductCategory::Bracelet,
            catalog::ProductCategory::Pendant => ProductCategory::Pendant,
            catalog::ProductCategory::Chain => ProductCategory::Chain,
            catalog::ProductCategory::Bangle => ProductCategory::Bangle,
            catalog::ProductCategory::Anklet => ProductCategory::Anklet,
        }
    }
}

impl From<ProductCategory> for catalog::ProductCategory {
    fn from(value: ProductCategory) -> Self {
        match value {
            ProductCategory::Ring => catalog::ProductCategory::Ring,
            ProductCategory::Necklace => catalog::ProductCategory::Necklace,
            ProductCategory::Earring => catalog::ProductCategory::Earring,
            ProductCategory::Bracelet => catalog::ProductCategory::Bracelet,
            ProductCategory::Pendant => catalog::ProductCategory::Pendant,
            ProductCategory::Chain => catalog::ProductCategory::Chain,
            ProductCategory::Bangle => catalog::ProductCategory::Bangle,
            ProductCategory::Anklet => catalog::ProductCategory::Anklet,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "metal_type")]
pub enum MetalType {
    #[sea_orm(string_value = "GOLD")]
    Gold,
    #[sea_orm(string_value = "SILVER")]
    Silver,
    #[sea_orm(string_value = "PLATINUM")]
    Platinum,
    #[sea_orm(string_value = "WHITE_GOLD")]
    WhiteGold,
    #[sea_orm(string_value = "ROSE_GOLD")]
    RoseGold,
}

impl From<catalog::MetalType> for MetalType {
    fn from(value: catalog::MetalType) -> Self {
        match value {
            catalog::MetalType::Gold => MetalType::Gold,
            catalog::MetalType::Silver => MetalType::Silver,
            catalog::MetalType::Platinum => MetalType::Platinum,
            catalog::MetalType::WhiteGold => MetalType::WhiteGold,
            catalog::MetalType::RoseGold => MetalType::RoseGold,
        }
    }
}

impl From<MetalType> for catalog::MetalType {
    fn from(value: MetalType) -> Self {
        match value {
            MetalType::Gold => catalog::MetalType::Gold,
            MetalType::Silver => catalog::MetalType::Silver,
            MetalType::Platinum => catalog::MetalType::Platinum,
            MetalType::WhiteGold => catalog::MetalType::WhiteGold,
            MetalType::RoseGold => catalog::MetalType::RoseGold,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "metal_purity")]
pub enum MetalPurity {
    #[sea_orm(string_value = "K14")]
    K14,
    #[sea_orm(string_value = "K18")]
    K18,
    #[sea_orm(string_value = "K22")]
    K22,
    #[sea_orm(string_value = "K24")]
    K24,
    #[sea_orm(string_value = "S925")]
    S925,
    #[sea_orm(string_value = "PT950")]
    Pt950,
}

impl From<catalog::MetalPurity> for MetalPurity {
    fn from(value: catalog::MetalPurity) -> Self {
        match value {
            catalog::MetalPurity::K14 => MetalPurity::K14,
            catalog::MetalPurity::K18 => MetalPurity::K18,
            catalog::MetalPurity::K22 => MetalPurity::K22,
            catalog::MetalPurity::K24 => MetalPurity::K24,
            catalog::MetalPurity::S925 => MetalPurity::S925,
            catalog::MetalPurity::Pt950 => MetalPurity::Pt950,
        }
    }
}

impl From<MetalPurity> for catalog::MetalPurity {
    fn from(value: MetalPurity) -> Self {
        match value {
            MetalPurity::K14 => catalog::MetalPurity::K14,
            MetalPurity::K18 => catalog::MetalPurity::K18,
            MetalPurity::K22 => catalog::MetalPurity::K22,
            MetalPurity::K24 => catalog::MetalPurity::K24,
            MetalPurity::S925 => catalog::MetalPurity::S925,
            MetalPurity::Pt950 => catalog::MetalPurity::Pt950,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "FAILED")]
    Failed,
    #[sea_orm(string_value = "REFUNDED")]
    Refunded,
}

impl From<order::PaymentStatus> for PaymentStatus {
    fn from(value: order::PaymentStatus) -> Self {
        match value {
            order::PaymentStatus::Pending => PaymentStatus::Pending,
            order::PaymentStatus::Paid => PaymentStatus::Paid,
            order::PaymentStatus::Failed => PaymentStatus::Failed,
            order::PaymentStatus::Refunded => PaymentStatus::Refunded,
        }
    }
}

impl From<PaymentStatus> for order::PaymentStatus {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::Pending => order::PaymentStatus::Pending,
            PaymentStatus::Paid => order::PaymentStatus::Paid,
            PaymentStatus::Failed => order::PaymentStatus::Failed,
            PaymentStatus::Refunded => order::PaymentStatus::Refunded,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_status")]
pub enum OrderStatus {
    #[sea_orm(string_value = "PLACED")]
    Placed,
    #[sea_orm(string_value = "CONFIRMED")]
    Confirmed,
    #[sea_orm(string_value = "PROCESSING")]
    Processing,
    #[sea_orm(string_value = "SHIPPED")]
    Shipped,
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
    #[sea_orm(string_value = "PAYMENT_FAILED")]
    PaymentFailed,
}

impl From<order::OrderStatus> for OrderStatus {
    fn from(value: order::OrderStatus) -> Self {
        match value {
            order::OrderStatus::Placed => OrderStatus::Placed,
            order::OrderStatus::Confirmed => OrderStatus::Confirmed,
            order::OrderStatus::Processing => OrderStatus::Processing,
            order::OrderStatus::Shipped => OrderStatus::Shipped,
            order::OrderStatus::Delivered => OrderStatus::Delivered,
            order::OrderStatus::Cancelled => OrderStatus::Cancelled,
            order::OrderStatus::PaymentFailed => OrderStatus::PaymentFailed,
        }
    }
}

impl From<OrderStatus> for order::OrderStatus {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Placed => order::OrderStatus::Placed,
            OrderStatus::Confirmed => order::OrderStatus::Confirmed,
            OrderStatus::Processing => order::OrderStatus::Processing,
            OrderStatus::Shipped => order::OrderStatus::Shipped,
            OrderStatus::Delivered => order::OrderStatus::Delivered,
            OrderStatus::Cancelled => order::OrderStatus::Cancelled,
            OrderStatus::PaymentFailed => order::OrderStatus::PaymentFailed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "request_status")]
pub enum RequestStatus {
    #[sea_orm(string_value = "NEW")]
    New,
    #[sea_orm(string_value = "REVIEWING")]
    Reviewing,
    #[sea_orm(string_value = "QUOTED")]
    Quoted,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "DECLINED")]
    Declined,
}
