use super::sea_orm_active_enums::{ProductCategory, RequestStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(schema_name = "public", table_name = "CustomRequest")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub email: String,
    #[sea_orm(column_type = "Text")]
    pub phone: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(nullable)]
    pub category: Option<ProductCategory>,
    #[sea_orm(column_name = "budgetMin", nullable)]
    pub budget_min: Option<i64>,
    #[sea_orm(column_name = "budgetMax", nullable)]
    pub budget_max: Option<i64>,
    /// Uploaded reference image URLs as a JSON array.
    #[sea_orm(column_name = "referenceImages")]
    pub reference_images: Json,
    pub status: RequestStatus,
    #[sea_orm(column_name = "adminNotes", column_type = "Text", nullable)]
    pub admin_notes: Option<String>,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime,
    #[sea_orm(column_name = "updatedAt")]
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::custom_request_comment::Entity")]
    CustomRequestComment,
}

impl Related<super::custom_request_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomRequestComment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
