use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use filigree_core::catalog::{CatalogFilter, Product};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{entity::product, error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{product_id}", get(get_product))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListProductsQuery {
    /// Category slug, anything unrecognized means "all".
    pub category: Option<String>,
    /// Case-insensitive substring over name and description.
    pub q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "Active products matching the filter", body = Vec<Product>)
    )
)]
#[tracing::instrument(name = "GET /products", skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let cache_key = format!(
        "products:{}:{}",
        query.category.as_deref().unwrap_or(""),
        query.q.as_deref().unwrap_or("")
    );
    if let Some(cached) = state.get_cache::<Vec<Product>>(&cache_key) {
        return Ok(Json(cached));
    }

    let rows = product::Entity::find()
        .filter(product::Column::Active.eq(true))
        .order_by_desc(product::Column::CreatedAt)
        .limit(500)
        .all(&state.db)
        .await?;

    let products: Vec<Product> = rows.into_iter().map(product::Model::into_catalog).collect();

    let mut filter = match &query.category {
        Some(category) => CatalogFilter::from_category_param(category),
        None => CatalogFilter::all(),
    };
    if let Some(q) = &query.q {
        filter = filter.with_query(q.clone());
    }

    let matched: Vec<Product> = filter.filter(&products).into_iter().cloned().collect();

    state.set_cache(cache_key, &matched);
    Ok(Json(matched))
}

#[utoipa::path(
    get,
    path = "/products/{product_id}",
    tag = "products",
    responses(
        (status = 200, description = "Product detail", body = Product),
        (status = 404, description = "Unknown or inactive product")
    )
)]
#[tracing::instrument(name = "GET /products/{product_id}", skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let row = product::Entity::find_by_id(&product_id)
        .one(&state.db)
        .await?
        .filter(|row| row.active)
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    Ok(Json(row.into_catalog()))
}
