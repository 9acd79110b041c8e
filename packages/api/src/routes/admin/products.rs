use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use filigree_core::catalog::{self, Product};
use filigree_core::create_id;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    entity::product,
    error::ApiError,
    middleware::jwt::AppUser,
    routes::admin::log_admin_action,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/", post(create_product))
        .route("/{product_id}", put(update_product))
        .route("/{product_id}", delete(retire_product))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    #[schema(value_type = String)]
    pub category: catalog::ProductCategory,
    #[schema(value_type = String)]
    pub metal_type: catalog::MetalType,
    #[schema(value_type = String)]
    pub metal_purity: catalog::MetalPurity,
    pub weight_grams: f64,
    pub stone_weight_carats: Option<f64>,
    pub stone_quality: Option<String>,
    pub stone_grade: Option<String>,
    pub stone_setting: Option<String>,
    pub stone_count: Option<i32>,
    pub price: i64,
    pub mrp: i64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    pub stock_quantity: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

fn validate_payload(payload: &ProductPayload) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    if payload.price <= 0 {
        return Err(ApiError::bad_request("price must be positive"));
    }
    if payload.mrp < payload.price {
        return Err(ApiError::bad_request("mrp must not be below price"));
    }
    if payload.weight_grams <= 0.0 {
        return Err(ApiError::bad_request("weightGrams must be positive"));
    }
    if payload.stock_quantity < 0 {
        return Err(ApiError::bad_request("stockQuantity must not be negative"));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/admin/products",
    tag = "admin",
    responses(
        (status = 200, description = "All products, inactive included", body = Vec<Product>)
    )
)]
#[tracing::instrument(name = "GET /admin/products", skip(state, user))]
pub async fn list_products(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
) -> Result<Json<Vec<Product>>, ApiError> {
    user.require_admin(&state).await?;

    let rows = product::Entity::find()
        .order_by_desc(product::Column::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(Json(
        rows.into_iter().map(product::Model::into_catalog).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/admin/products",
    tag = "admin",
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Created product", body = Product),
        (status = 403, description = "Admin access required")
    )
)]
#[tracing::instrument(name = "POST /admin/products", skip(state, user, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, ApiError> {
    let admin = user.require_admin(&state).await?;
    validate_payload(&payload)?;

    // Derived, never taken from the payload.
    let making_charges_saved = Product::compute_making_charges_saved(payload.mrp, payload.price);

    let now = chrono::Utc::now().naive_utc();
    let created = product::ActiveModel {
        id: Set(create_id()),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description.clone()),
        category: Set(payload.category.into()),
        metal_type: Set(payload.metal_type.into()),
        metal_purity: Set(payload.metal_purity.into()),
        weight_grams: Set(payload.weight_grams),
        stone_weight_carats: Set(payload.stone_weight_carats),
        stone_quality: Set(payload.stone_quality.clone()),
        stone_grade: Set(payload.stone_grade.clone()),
        stone_setting: Set(payload.stone_setting.clone()),
        stone_count: Set(payload.stone_count),
        price: Set(payload.price),
        mrp: Set(payload.mrp),
        making_charges_saved: Set(making_charges_saved),
        images: Set(serde_json::to_value(&payload.images)?),
        videos: Set(serde_json::to_value(&payload.videos)?),
        stock_quantity: Set(payload.stock_quantity),
        active: Set(payload.active),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    state.response_cache.invalidate_all();
    log_admin_action(
        &state,
        &admin.email,
        "product.create",
        "Product",
        &created.id,
        Some(serde_json::json!({ "name": created.name })),
    )
    .await?;

    Ok(Json(created.into_catalog()))
}

#[utoipa::path(
    put,
    path = "/admin/products/{product_id}",
    tag = "admin",
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 404, description = "Unknown product")
    )
)]
#[tracing::instrument(name = "PUT /admin/products/{product_id}", skip(state, user, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(product_id): Path<String>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, ApiError> {
    let admin = user.require_admin(&state).await?;
    validate_payload(&payload)?;

    let existing = product::Entity::find_by_id(&product_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    let making_charges_saved = Product::compute_making_charges_saved(payload.mrp, payload.price);

    let mut active: product::ActiveModel = existing.into();
    active.name = Set(payload.name.trim().to_string());
    active.description = Set(payload.description.clone());
    active.category = Set(payload.category.into());
    active.metal_type = Set(payload.metal_type.into());
    active.metal_purity = Set(payload.metal_purity.into());
    active.weight_grams = Set(payload.weight_grams);
    active.stone_weight_carats = Set(payload.stone_weight_carats);
    active.stone_quality = Set(payload.stone_quality.clone());
    active.stone_grade = Set(payload.stone_grade.clone());
    active.stone_setting = Set(payload.stone_setting.clone());
    active.stone_count = Set(payload.stone_count);
    active.price = Set(payload.price);
    active.mrp = Set(payload.mrp);
    active.making_charges_saved = Set(making_charges_saved);
    active.images = Set(serde_json::to_value(&payload.images)?);
    active.videos = Set(serde_json::to_value(&payload.videos)?);
    active.stock_quantity = Set(payload.stock_quantity);
    active.active = Set(payload.active);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let updated = active.update(&state.db).await?;

    state.response_cache.invalidate_all();
    log_admin_action(
        &state,
        &admin.email,
        "product.update",
        "Product",
        &updated.id,
        None,
    )
    .await?;

    Ok(Json(updated.into_catalog()))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RetireQuery {
    /// `true` removes the row instead of deactivating it.
    #[serde(default)]
    pub hard: bool,
}

#[utoipa::path(
    delete,
    path = "/admin/products/{product_id}",
    tag = "admin",
    params(RetireQuery),
    responses(
        (status = 200, description = "Product retired from the storefront", body = Product),
        (status = 404, description = "Unknown product")
    )
)]
#[tracing::instrument(name = "DELETE /admin/products/{product_id}", skip(state, user))]
pub async fn retire_product(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(product_id): Path<String>,
    Query(query): Query<RetireQuery>,
) -> Result<Json<Product>, ApiError> {
    let admin = user.require_admin(&state).await?;

    let existing = product::Entity::find_by_id(&product_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    // Soft delete is the default: placed orders keep referencing the
    // row through their snapshots either way.
    let result = if query.hard {
        let snapshot = existing.clone();
        product::Entity::delete_by_id(&product_id)
            .exec(&state.db)
            .await?;
        snapshot
    } else {
        let mut active: product::ActiveModel = existing.into();
        active.active = Set(false);
        active.updated_at = Set(chrono::Utc::now().naive_utc());
        active.update(&state.db).await?
    };

    state.response_cache.invalidate_all();
    log_admin_action(
        &state,
        &admin.email,
        if query.hard {
            "product.delete"
        } else {
            "product.retire"
        },
        "Product",
        &result.id,
        None,
    )
    .await?;

    Ok(Json(result.into_catalog()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(price: i64, mrp: i64) -> ProductPayload {
        ProductPayload {
            name: "Lotus Ring".to_string(),
            description: String::new(),
            category: catalog::ProductCategory::Ring,
            metal_type: catalog::MetalType::Gold,
            metal_purity: catalog::MetalPurity::K18,
            weight_grams: 3.2,
            stone_weight_carats: None,
            stone_quality: None,
            stone_grade: None,
            stone_setting: None,
            stone_count: None,
            price,
            mrp,
            images: vec![],
            videos: vec![],
            stock_quantity: 1,
            active: true,
        }
    }

    #[test]
    fn test_mrp_below_price_is_rejected() {
        assert!(validate_payload(&payload(10_000, 12_000)).is_ok());
        assert!(validate_payload(&payload(5_000, 5_000)).is_ok());
        assert!(validate_payload(&payload(5_000, 4_000)).is_err());
    }
}
