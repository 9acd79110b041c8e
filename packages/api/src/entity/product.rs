use super::sea_orm_active_enums::{MetalPurity, MetalType, ProductCategory};
use filigree_core::catalog;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(schema_name = "public", table_name = "Product")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: ProductCategory,
    #[sea_orm(column_name = "metalType")]
    pub metal_type: MetalType,
    #[sea_orm(column_name = "metalPurity")]
    pub metal_purity: MetalPurity,
    #[sea_orm(column_name = "weightGrams")]
    pub weight_grams: f64,
    #[sea_orm(column_name = "stoneWeightCarats", nullable)]
    pub stone_weight_carats: Option<f64>,
    #[sea_orm(column_name = "stoneQuality", column_type = "Text", nullable)]
    pub stone_quality: Option<String>,
    #[sea_orm(column_name = "stoneGrade", column_type = "Text", nullable)]
    pub stone_grade: Option<String>,
    #[sea_orm(column_name = "stoneSetting", column_type = "Text", nullable)]
    pub stone_setting: Option<String>,
    #[sea_orm(column_name = "stoneCount", nullable)]
    pub stone_count: Option<i32>,
    pub price: i64,
    pub mrp: i64,
    #[sea_orm(column_name = "makingChargesSaved")]
    pub making_charges_saved: i64,
    pub images: Json,
    pub videos: Json,
    #[sea_orm(column_name = "stockQuantity")]
    pub stock_quantity: i32,
    pub active: bool,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime,
    #[sea_orm(column_name = "updatedAt")]
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Lossy mapping into the in-memory catalog shape. Media arrays that
    /// fail to parse come back empty rather than failing the whole row.
    pub fn into_catalog(self) -> catalog::Product {
        let images = serde_json::from_value(self.images).unwrap_or_default();
        let videos = serde_json::from_value(self.videos).unwrap_or_default();
        catalog::Product {
            id: self.id,
            name: self.name,
            description: self.description,
            category: self.category.into(),
            metal_type: self.metal_type.into(),
            metal_purity: self.metal_purity.into(),
            weight_grams: self.weight_grams,
            stone_weight_carats: self.stone_weight_carats,
            stone_quality: self.stone_quality,
            stone_grade: self.stone_grade,
            stone_setting: self.stone_setting,
            stone_count: self.stone_count,
            price: self.price,
            mrp: self.mrp,
            making_charges_saved: self.making_charges_saved,
            images,
            videos,
            stock_quantity: self.stock_quantity,
            active: self.active,
        }
    }
}
