use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state, routing::get};
use middleware::error_reporting::error_reporting_middleware;
use middleware::jwt::jwt_middleware;
use state::State;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, decompression::RequestDecompressionLayer,
};

pub mod config;
pub mod entity;
pub mod error;
pub mod mail;
pub mod payment;
pub mod state;

mod middleware;
mod routes;

pub use axum;
pub use sea_orm;

pub fn construct_router(state: Arc<State>) -> Router {
    let router = Router::new()
        .nest("/health", routes::health::routes())
        .nest("/products", routes::product::routes())
        .nest("/orders", routes::order::routes())
        .nest("/profile", routes::profile::routes())
        .nest("/custom", routes::custom::routes())
        .nest("/media", routes::media::routes())
        .nest("/admin", routes::admin::routes())
        .with_state(state.clone())
        .route("/version", get(|| async { env!("CARGO_PKG_VERSION") }))
        .layer(from_fn_with_state(state.clone(), error_reporting_middleware))
        .layer(from_fn_with_state(state.clone(), jwt_middleware))
        .layer(CorsLayer::permissive())
        .layer(
            ServiceBuilder::new()
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new()),
        );

    Router::new().nest("/api/v1", router)
}
