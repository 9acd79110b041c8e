use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::State,
    routing::{get, put},
};
use filigree_core::order::ShippingAddress;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    entity::user_profile,
    error::ApiError,
    middleware::jwt::AppUser,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile))
        .route("/", put(update_profile))
        .route("/addresses", put(replace_addresses))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub addresses: Vec<ShippingAddress>,
    pub is_admin: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub addresses: Option<Vec<ShippingAddress>>,
}

fn to_response(profile: &user_profile::Model) -> ProfileResponse {
    let addresses: Vec<ShippingAddress> =
        serde_json::from_value(profile.addresses.clone()).unwrap_or_default();
    ProfileResponse {
        email: profile.email.clone(),
        name: profile.name.clone(),
        phone: profile.phone.clone(),
        addresses,
        is_admin: profile.is_admin,
    }
}

/// Fetches the profile row for the signed-in subject, creating it on
/// first sight from the token claims. Creation is explicit here, no
/// other code path inserts profiles.
pub(crate) async fn get_or_create_profile(
    state: &AppState,
    user: &AppUser,
) -> Result<Arc<user_profile::Model>, ApiError> {
    let sub = user.sub()?;
    if let Some(profile) = state.get_profile(&sub) {
        return Ok(profile);
    }

    if let Some(existing) = user_profile::Entity::find_by_id(&sub).one(&state.db).await? {
        let existing = Arc::new(existing);
        state.put_profile(&sub, existing.clone());
        return Ok(existing);
    }

    let email = user
        .email()
        .ok_or_else(|| ApiError::unauthorized("Token has no email claim"))?;
    let name = match user {
        AppUser::OpenID(user) => user.name.clone(),
        AppUser::Unauthorized => None,
    }
    .unwrap_or_else(|| "New User".to_string());
    let now = chrono::Utc::now().naive_utc();
    let created = user_profile::ActiveModel {
        id: Set(sub.clone()),
        email: Set(email),
        name: Set(Some(name)),
        phone: Set(None),
        addresses: Set(serde_json::json!([])),
        is_admin: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    let created = Arc::new(created);
    state.put_profile(&sub, created.clone());
    Ok(created)
}

#[utoipa::path(
    get,
    path = "/profile",
    tag = "profile",
    responses(
        (status = 200, description = "Profile of the signed-in user", body = ProfileResponse),
        (status = 401, description = "Not signed in")
    )
)]
#[tracing::instrument(name = "GET /profile", skip(state, user))]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = get_or_create_profile(&state, &user).await?;
    Ok(Json(to_response(&profile)))
}

#[utoipa::path(
    put,
    path = "/profile",
    tag = "profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 401, description = "Not signed in")
    )
)]
#[tracing::instrument(name = "PUT /profile", skip(state, user, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let sub = user.sub()?;
    let existing = get_or_create_profile(&state, &user).await?;

    let mut active: user_profile::ActiveModel = (*existing).clone().into();
    if let Some(name) = payload.name {
        active.name = Set(Some(name));
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(addresses) = payload.addresses {
        active.addresses = Set(serde_json::to_value(&addresses)?);
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let updated = active.update(&state.db).await?;

    state.invalidate_profile(&sub);
    let updated = Arc::new(updated);
    state.put_profile(&sub, updated.clone());

    Ok(Json(to_response(&updated)))
}

#[utoipa::path(
    put,
    path = "/profile/addresses",
    tag = "profile",
    request_body = Vec<ShippingAddress>,
    responses(
        (status = 200, description = "Profile with replaced address book", body = ProfileResponse),
        (status = 401, description = "Not signed in")
    )
)]
#[tracing::instrument(name = "PUT /profile/addresses", skip(state, user, addresses))]
pub async fn replace_addresses(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Json(addresses): Json<Vec<ShippingAddress>>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let sub = user.sub()?;
    let existing = get_or_create_profile(&state, &user).await?;

    let mut active: user_profile::ActiveModel = (*existing).clone().into();
    active.addresses = Set(serde_json::to_value(&addresses)?);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let updated = active.update(&state.db).await?;

    state.invalidate_profile(&sub);
    let updated = Arc::new(updated);
    state.put_profile(&sub, updated.clone());

    Ok(Json(to_response(&updated)))
}
