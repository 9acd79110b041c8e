use axum::{
    Extension, Json, Router,
    extract::State,
    routing::get,
};
use filigree_core::create_id;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, QuerySelect, Set};

use crate::{
    entity::admin_log, error::ApiError, middleware::jwt::AppUser, state::AppState,
};

pub mod orders;
pub mod products;
pub mod requests;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", products::routes())
        .nest("/orders", orders::routes())
        .nest("/requests", requests::routes())
        .route("/logs", get(list_logs))
}

/// Append-only audit trail of back-office mutations.
pub(crate) async fn log_admin_action(
    state: &AppState,
    admin_email: &str,
    action: &str,
    entity_type: &str,
    entity_id: &str,
    detail: Option<serde_json::Value>,
) -> Result<(), ApiError> {
    admin_log::ActiveModel {
        id: Set(create_id()),
        admin_email: Set(admin_email.to_string()),
        action: Set(action.to_string()),
        entity_type: Set(entity_type.to_string()),
        entity_id: Set(entity_id.to_string()),
        detail: Set(detail),
        created_at: Set(chrono::Utc::now().naive_utc()),
    }
    .insert(&state.db)
    .await?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/admin/logs",
    tag = "admin",
    responses(
        (status = 200, description = "Recent admin actions, newest first", body = Vec<admin_log::Model>)
    )
)]
#[tracing::instrument(name = "GET /admin/logs", skip(state, user))]
pub async fn list_logs(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
) -> Result<Json<Vec<admin_log::Model>>, ApiError> {
    user.require_admin(&state).await?;

    let rows = admin_log::Entity::find()
        .order_by_desc(admin_log::Column::CreatedAt)
        .limit(200)
        .all(&state.db)
        .await?;
    Ok(Json(rows))
}
