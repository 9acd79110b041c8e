use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use filigree_core::create_id;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    entity::{custom_request, custom_request_comment, sea_orm_active_enums::RequestStatus},
    error::ApiError,
    middleware::jwt::AppUser,
    routes::admin::log_admin_action,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_requests))
        .route("/{request_id}", put(update_request))
        .route("/{request_id}/comments", post(add_comment))
}

fn parse_status(value: &str) -> Option<RequestStatus> {
    Some(match value {
        "new" => RequestStatus::New,
        "reviewing" => RequestStatus::Reviewing,
        "quoted" => RequestStatus::Quoted,
        "in_progress" => RequestStatus::InProgress,
        "completed" => RequestStatus::Completed,
        "declined" => RequestStatus::Declined,
        _ => return None,
    })
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRequestsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestBody {
    pub status: Option<String>,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminCommentBody {
    pub body: String,
}

#[utoipa::path(
    get,
    path = "/admin/requests",
    tag = "admin",
    params(ListRequestsQuery),
    responses(
        (status = 200, description = "Design requests, newest first", body = Vec<custom_request::Model>)
    )
)]
#[tracing::instrument(name = "GET /admin/requests", skip(state, user))]
pub async fn list_requests(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<Vec<custom_request::Model>>, ApiError> {
    user.require_admin(&state).await?;

    let mut select =
        custom_request::Entity::find().order_by_desc(custom_request::Column::CreatedAt);
    if let Some(status) = &query.status {
        let status = parse_status(status)
            .ok_or_else(|| ApiError::bad_request(format!("Unknown status: {status}")))?;
        select = select.filter(custom_request::Column::Status.eq(status));
    }

    Ok(Json(select.all(&state.db).await?))
}

#[utoipa::path(
    put,
    path = "/admin/requests/{request_id}",
    tag = "admin",
    request_body = UpdateRequestBody,
    responses(
        (status = 200, description = "Updated request", body = custom_request::Model),
        (status = 404, description = "Unknown request")
    )
)]
#[tracing::instrument(name = "PUT /admin/requests/{request_id}", skip(state, user, payload))]
pub async fn update_request(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(request_id): Path<String>,
    Json(payload): Json<UpdateRequestBody>,
) -> Result<Json<custom_request::Model>, ApiError> {
    let admin = user.require_admin(&state).await?;

    let row = custom_request::Entity::find_by_id(&request_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Request not found"))?;

    let mut active: custom_request::ActiveModel = row.into();
    if let Some(status) = &payload.status {
        let status = parse_status(status)
            .ok_or_else(|| ApiError::bad_request(format!("Unknown status: {status}")))?;
        active.status = Set(status);
    }
    if let Some(notes) = payload.admin_notes {
        active.admin_notes = Set(Some(notes));
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let updated = active.update(&state.db).await?;

    log_admin_action(
        &state,
        &admin.email,
        "request.update",
        "CustomRequest",
        &request_id,
        Some(serde_json::json!({ "status": payload.status })),
    )
    .await?;

    Ok(Json(updated))
}

#[utoipa::path(
    post,
    path = "/admin/requests/{request_id}/comments",
    tag = "admin",
    request_body = AdminCommentBody,
    responses(
        (status = 200, description = "Added comment", body = custom_request_comment::Model),
        (status = 404, description = "Unknown request")
    )
)]
#[tracing::instrument(name = "POST /admin/requests/{request_id}/comments", skip(state, user, payload))]
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(request_id): Path<String>,
    Json(payload): Json<AdminCommentBody>,
) -> Result<Json<custom_request_comment::Model>, ApiError> {
    let admin = user.require_admin(&state).await?;

    if payload.body.trim().is_empty() {
        return Err(ApiError::bad_request("Comment body is required"));
    }

    let request = custom_request::Entity::find_by_id(&request_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Request not found"))?;

    let author = admin.name.clone().unwrap_or_else(|| admin.email.clone());
    let comment = custom_request_comment::ActiveModel {
        id: Set(create_id()),
        request_id: Set(request.id),
        author_name: Set(author),
        from_admin: Set(true),
        body: Set(payload.body.trim().to_string()),
        created_at: Set(chrono::Utc::now().naive_utc()),
    }
    .insert(&state.db)
    .await?;

    Ok(Json(comment))
}
