use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(schema_name = "public", table_name = "AdminLog")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,
    #[sea_orm(column_name = "adminEmail", column_type = "Text")]
    pub admin_email: String,
    #[sea_orm(column_type = "Text")]
    pub action: String,
    #[sea_orm(column_name = "entityType", column_type = "Text")]
    pub entity_type: String,
    #[sea_orm(column_name = "entityId", column_type = "Text")]
    pub entity_id: String,
    #[sea_orm(nullable)]
    pub detail: Option<Json>,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
