use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use filigree_core::create_id;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    entity::{custom_request, custom_request_comment, sea_orm_active_enums::RequestStatus},
    error::ApiError,
    mail::{EmailMessage, templates},
    middleware::jwt::AppUser,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_request))
        .route("/{request_id}", get(get_request))
        .route("/{request_id}/comments", post(add_comment))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequestBody {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub description: String,
    pub category: Option<String>,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
    #[serde(default)]
    pub reference_images: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponse {
    pub request: custom_request::Model,
    pub comments: Vec<custom_request_comment::Model>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentBody {
    pub email: String,
    pub body: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RequestQuery {
    pub email: Option<String>,
}

fn parse_category(
    value: Option<&str>,
) -> Option<crate::entity::sea_orm_active_enums::ProductCategory> {
    value
        .and_then(filigree_core::catalog::ProductCategory::parse)
        .map(Into::into)
}

#[utoipa::path(
    post,
    path = "/custom",
    tag = "custom",
    request_body = SubmitRequestBody,
    responses(
        (status = 200, description = "Submitted design request", body = custom_request::Model),
        (status = 400, description = "Missing required fields")
    )
)]
#[tracing::instrument(name = "POST /custom", skip(state, payload))]
pub async fn submit_request(
    State(state): State<AppState>,
    Json(payload): Json<SubmitRequestBody>,
) -> Result<Json<custom_request::Model>, ApiError> {
    for (field, value) in [
        ("name", &payload.name),
        ("email", &payload.email),
        ("phone", &payload.phone),
        ("description", &payload.description),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::bad_request(format!("{field} is required")));
        }
    }
    if let (Some(min), Some(max)) = (payload.budget_min, payload.budget_max)
        && min > max
    {
        return Err(ApiError::bad_request("budgetMin exceeds budgetMax"));
    }

    let now = chrono::Utc::now().naive_utc();
    let created = custom_request::ActiveModel {
        id: Set(create_id()),
        name: Set(payload.name.trim().to_string()),
        email: Set(payload.email.trim().to_string()),
        phone: Set(payload.phone.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        category: Set(parse_category(payload.category.as_deref())),
        budget_min: Set(payload.budget_min),
        budget_max: Set(payload.budget_max),
        reference_images: Set(serde_json::to_value(&payload.reference_images)?),
        status: Set(RequestStatus::New),
        admin_notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    // Acknowledgement mail is best-effort.
    if let Some(mailer) = &state.mail_client {
        let (html, text) = templates::custom_request_received(&created.name, &created.id);
        let message = EmailMessage {
            to: created.email.clone(),
            subject: "We received your design request".to_string(),
            body_html: Some(html),
            body_text: Some(text),
        };
        if let Err(err) = mailer.send(message).await {
            tracing::error!(request_id = %created.id, "Failed to send acknowledgement: {}", err);
        }
    }

    Ok(Json(created))
}

#[utoipa::path(
    get,
    path = "/custom/{request_id}",
    tag = "custom",
    params(RequestQuery),
    responses(
        (status = 200, description = "Design request with its comment thread", body = RequestResponse),
        (status = 404, description = "Unknown request or email mismatch")
    )
)]
#[tracing::instrument(name = "GET /custom/{request_id}", skip(state, user))]
pub async fn get_request(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(request_id): Path<String>,
    Query(query): Query<RequestQuery>,
) -> Result<Json<RequestResponse>, ApiError> {
    let request = custom_request::Entity::find_by_id(&request_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Request not found"))?;

    let claimed = query.email.or_else(|| user.email());
    let authorized = claimed
        .map(|email| email.eq_ignore_ascii_case(&request.email))
        .unwrap_or(false);
    if !authorized {
        return Err(ApiError::not_found("Request not found"));
    }

    let comments = custom_request_comment::Entity::find()
        .filter(custom_request_comment::Column::RequestId.eq(&request_id))
        .order_by_asc(custom_request_comment::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(RequestResponse { request, comments }))
}

#[utoipa::path(
    post,
    path = "/custom/{request_id}/comments",
    tag = "custom",
    request_body = AddCommentBody,
    responses(
        (status = 200, description = "Added comment", body = custom_request_comment::Model),
        (status = 404, description = "Unknown request or email mismatch")
    )
)]
#[tracing::instrument(name = "POST /custom/{request_id}/comments", skip(state, payload))]
pub async fn add_comment(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    Json(payload): Json<AddCommentBody>,
) -> Result<Json<custom_request_comment::Model>, ApiError> {
    if payload.body.trim().is_empty() {
        return Err(ApiError::bad_request("Comment body is required"));
    }

    let request = custom_request::Entity::find_by_id(&request_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Request not found"))?;

    if !payload.email.eq_ignore_ascii_case(&request.email) {
        return Err(ApiError::not_found("Request not found"));
    }

    let comment = custom_request_comment::ActiveModel {
        id: Set(create_id()),
        request_id: Set(request.id),
        author_name: Set(request.name),
        from_admin: Set(false),
        body: Set(payload.body.trim().to_string()),
        created_at: Set(chrono::Utc::now().naive_utc()),
    }
    .insert(&state.db)
    .await?;

    Ok(Json(comment))
}
