use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use filigree_core::order::{Order, OrderStatus, PaymentStatus};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    entity::order,
    error::ApiError,
    middleware::jwt::AppUser,
    routes::admin::log_admin_action,
    routes::order::row_to_order,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/{order_number}", put(update_order))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListOrdersQuery {
    /// Order status slug, e.g. `confirmed` or `shipped`.
    pub status: Option<String>,
    /// Payment status slug; `pending` surfaces orphaned checkouts.
    #[serde(rename = "paymentStatus")]
    pub payment_status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    #[schema(value_type = Option<String>)]
    pub order_status: Option<OrderStatus>,
    pub tracking_number: Option<String>,
    pub shipping_provider: Option<String>,
    pub admin_notes: Option<String>,
    /// Only `refunded` is accepted, and only for paid orders.
    #[schema(value_type = Option<String>)]
    pub payment_status: Option<PaymentStatus>,
}

#[utoipa::path(
    get,
    path = "/admin/orders",
    tag = "admin",
    params(ListOrdersQuery),
    responses(
        (status = 200, description = "Orders, newest first", body = Vec<Order>)
    )
)]
#[tracing::instrument(name = "GET /admin/orders", skip(state, user))]
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<Order>>, ApiError> {
    user.require_admin(&state).await?;

    let mut select = order::Entity::find().order_by_desc(order::Column::CreatedAt);
    if let Some(status) = &query.status {
        let status: OrderStatus = serde_json::from_value(serde_json::json!(status))
            .map_err(|_| ApiError::bad_request(format!("Unknown order status: {status}")))?;
        let status: crate::entity::sea_orm_active_enums::OrderStatus = status.into();
        select = select.filter(order::Column::OrderStatus.eq(status));
    }
    if let Some(payment) = &query.payment_status {
        let payment: PaymentStatus = serde_json::from_value(serde_json::json!(payment))
            .map_err(|_| ApiError::bad_request(format!("Unknown payment status: {payment}")))?;
        let payment: crate::entity::sea_orm_active_enums::PaymentStatus = payment.into();
        select = select.filter(order::Column::PaymentStatus.eq(payment));
    }

    let rows = select.all(&state.db).await?;
    rows.into_iter()
        .map(row_to_order)
        .collect::<Result<Vec<_>, _>>()
        .map(Json)
}

#[utoipa::path(
    put,
    path = "/admin/orders/{order_number}",
    tag = "admin",
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Updated order", body = Order),
        (status = 404, description = "Unknown order"),
        (status = 409, description = "Transition not allowed")
    )
)]
#[tracing::instrument(name = "PUT /admin/orders/{order_number}", skip(state, user, payload))]
pub async fn update_order(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(order_number): Path<String>,
    Json(payload): Json<UpdateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
    let admin = user.require_admin(&state).await?;

    let row = order::Entity::find()
        .filter(order::Column::OrderNumber.eq(&order_number))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;

    let payment_status: PaymentStatus = row.payment_status.clone().into();

    if let Some(new_status) = payload.order_status {
        // Fulfilment statuses only apply to paid orders; cancellation is
        // always available. Payment transitions go through the payment
        // callback, not here.
        let fulfilment = matches!(
            new_status,
            OrderStatus::Confirmed
                | OrderStatus::Processing
                | OrderStatus::Shipped
                | OrderStatus::Delivered
        );
        if fulfilment && payment_status != PaymentStatus::Paid {
            return Err(ApiError::conflict("Order is not paid"));
        }
        if matches!(new_status, OrderStatus::Placed | OrderStatus::PaymentFailed) {
            return Err(ApiError::conflict("Transition not allowed"));
        }
    }

    if let Some(new_payment) = payload.payment_status {
        if new_payment != PaymentStatus::Refunded {
            return Err(ApiError::conflict("Only refunds can be applied here"));
        }
        if payment_status != PaymentStatus::Paid {
            return Err(ApiError::conflict("Only paid orders can be refunded"));
        }
    }

    let detail = serde_json::json!({
        "orderStatus": payload.order_status,
        "paymentStatus": payload.payment_status,
        "trackingNumber": payload.tracking_number,
    });

    let mut active: order::ActiveModel = row.into();
    if let Some(new_status) = payload.order_status {
        active.order_status = Set(new_status.into());
    }
    if let Some(new_payment) = payload.payment_status {
        active.payment_status = Set(new_payment.into());
    }
    if let Some(tracking) = payload.tracking_number {
        active.tracking_number = Set(Some(tracking));
    }
    if let Some(provider) = payload.shipping_provider {
        active.shipping_provider = Set(Some(provider));
    }
    if let Some(notes) = payload.admin_notes {
        active.admin_notes = Set(Some(notes));
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let updated = active.update(&state.db).await?;

    log_admin_action(
        &state,
        &admin.email,
        "order.update",
        "Order",
        &order_number,
        Some(detail),
    )
    .await?;

    Ok(Json(row_to_order(updated)?))
}
