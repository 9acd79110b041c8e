use axum::{
    Extension, Json, Router,
    extract::{Multipart, Query, State},
    routing::{delete, post},
};
use filigree_core::create_id;
use object_store::{ObjectStore, path::Path as StorePath};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{error::ApiError, middleware::jwt::AppUser, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(upload_media))
        .route("/", delete(delete_media))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Public URL to store on the product or request.
    pub url: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteMediaQuery {
    /// Public URL previously returned by the upload endpoint.
    pub url: String,
}

fn bucket_parts(state: &AppState) -> Result<(&std::sync::Arc<object_store::aws::AmazonS3>, &str), ApiError> {
    let store = state
        .media_store
        .as_ref()
        .ok_or_else(|| ApiError::internal("Media storage not configured"))?;
    let base = state
        .config
        .storage
        .as_ref()
        .map(|storage| storage.public_base_url.as_str())
        .ok_or_else(|| ApiError::internal("Media storage not configured"))?;
    Ok((store, base))
}

#[utoipa::path(
    post,
    path = "/media",
    tag = "media",
    responses(
        (status = 200, description = "Stored file and its public URL", body = UploadResponse),
        (status = 403, description = "Admin access required")
    )
)]
#[tracing::instrument(name = "POST /media", skip(state, user, multipart))]
pub async fn upload_media(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    user.require_admin(&state).await?;
    let (store, base) = bucket_parts(&state)?;

    let field = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(format!("Invalid multipart body: {err}")))?
        .ok_or_else(|| ApiError::bad_request("Missing file field"))?;

    let filename = field.file_name().unwrap_or("upload").to_string();
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !matches!(extension.as_str(), "jpg" | "jpeg" | "png" | "webp" | "mp4") {
        return Err(ApiError::bad_request("Unsupported file extension"));
    }

    let bytes = field
        .bytes()
        .await
        .map_err(|err| ApiError::bad_request(format!("Failed to read upload: {err}")))?;
    if bytes.is_empty() {
        return Err(ApiError::bad_request("Empty upload"));
    }

    let path = StorePath::from("media").child(format!("{}.{}", create_id(), extension));
    store.put(&path, bytes.into()).await?;

    Ok(Json(UploadResponse {
        url: format!("{}/{}", base, path),
    }))
}

#[utoipa::path(
    delete,
    path = "/media",
    tag = "media",
    params(DeleteMediaQuery),
    responses(
        (status = 200, description = "File removed"),
        (status = 400, description = "URL outside the media bucket"),
        (status = 403, description = "Admin access required")
    )
)]
#[tracing::instrument(name = "DELETE /media", skip(state, user))]
pub async fn delete_media(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Query(query): Query<DeleteMediaQuery>,
) -> Result<(), ApiError> {
    user.require_admin(&state).await?;
    let (store, base) = bucket_parts(&state)?;

    let relative = query
        .url
        .strip_prefix(base)
        .map(|rest| rest.trim_start_matches('/'))
        .filter(|rest| rest.starts_with("media/"))
        .ok_or_else(|| ApiError::bad_request("URL outside the media bucket"))?;

    store.delete(&StorePath::from(relative)).await?;
    Ok(())
}
