use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(schema_name = "public", table_name = "CustomRequestComment")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,
    #[sea_orm(column_name = "requestId", column_type = "Text")]
    pub request_id: String,
    #[sea_orm(column_name = "authorName", column_type = "Text")]
    pub author_name: String,
    #[sea_orm(column_name = "fromAdmin")]
    pub from_admin: bool,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::custom_request::Entity",
        from = "Column::RequestId",
        to = "super::custom_request::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    CustomRequest,
}

impl Related<super::custom_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
