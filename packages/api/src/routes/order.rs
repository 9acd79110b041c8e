use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::TimeZone;
use filigree_core::cart::CartStore;
use filigree_core::checkout::{
    CheckoutForm, MINOR_UNITS_PER_UNIT, PaymentOutcome, compute_totals, resolve_payment,
};
use filigree_core::order::{CustomerDetails, Order, OrderItem, ShippingAddress};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    entity::{order, product},
    error::ApiError,
    mail::{EmailMessage, templates},
    middleware::jwt::AppUser,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order).get(list_my_orders))
        .route("/{order_number}", get(track_order))
        .route("/{order_number}/payment", post(confirm_payment))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: ShippingAddress,
    pub items: Vec<CheckoutItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order: Order,
    /// Gateway-side order the hosted widget collects against.
    pub gateway_order_id: String,
    pub gateway_key_id: String,
    /// Amount the widget will charge, in minor units.
    pub amount_minor: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCallbackRequest {
    /// `success`, `cancelled` or `failed`.
    pub status: String,
    pub payment_id: Option<String>,
    pub signature: Option<String>,
    pub method: Option<String>,
    pub reason: Option<String>,
    /// Customer email, required on non-success outcomes for guests.
    pub email: Option<String>,
}

/// Success callbacks are authenticated by the gateway signature; the
/// other outcomes carry no signature, so only the customer themselves
/// may report one. Mismatches look identical to unknown orders.
fn require_customer_match(
    claimed: Option<String>,
    customer_email: &str,
) -> Result<(), ApiError> {
    match claimed {
        Some(email) if email.eq_ignore_ascii_case(customer_email) => Ok(()),
        _ => Err(ApiError::not_found("Order not found")),
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TrackOrderQuery {
    /// Customer email for guest lookups.
    pub email: Option<String>,
}

/// Rehydrates the JSON columns of a row into the shared order shape.
pub(crate) fn row_to_order(row: order::Model) -> Result<Order, ApiError> {
    let address: ShippingAddress = serde_json::from_value(row.address)?;
    let items: Vec<OrderItem> = serde_json::from_value(row.items)?;
    Ok(Order {
        id: row.id,
        order_number: row.order_number,
        customer: CustomerDetails {
            name: row.customer_name,
            email: row.customer_email,
            phone: row.customer_phone,
        },
        address,
        items,
        subtotal: row.subtotal,
        total_savings: row.total_savings,
        shipping_cost: row.shipping_cost,
        total_amount: row.total_amount,
        payment_status: row.payment_status.into(),
        order_status: row.order_status.into(),
        payment_id: row.payment_id,
        payment_method: row.payment_method,
        gateway_order_id: row.gateway_order_id,
        tracking_number: row.tracking_number,
        shipping_provider: row.shipping_provider,
        admin_notes: row.admin_notes,
        created_at: chrono::Utc.from_utc_datetime(&row.created_at),
    })
}

#[utoipa::path(
    post,
    path = "/orders",
    tag = "orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Pending order and gateway session", body = CreateOrderResponse),
        (status = 422, description = "Invalid checkout form"),
        (status = 502, description = "Payment gateway unavailable")
    )
)]
#[tracing::instrument(name = "POST /orders", skip(state, payload))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let form = CheckoutForm {
        name: payload.name.clone(),
        email: payload.email.clone(),
        phone: payload.phone.clone(),
        address: payload.address.clone(),
    };
    form.validate()?;

    if payload.items.iter().all(|item| item.quantity == 0) {
        return Err(ApiError::bad_request("Cart is empty"));
    }

    // Prices come from the catalog rows, never from the client.
    let ids: Vec<String> = payload
        .items
        .iter()
        .map(|item| item.product_id.clone())
        .collect();
    let rows = product::Entity::find()
        .filter(product::Column::Id.is_in(ids))
        .filter(product::Column::Active.eq(true))
        .all(&state.db)
        .await?;

    let mut cart = CartStore::new();
    for item in &payload.items {
        let row = rows
            .iter()
            .find(|row| row.id == item.product_id)
            .ok_or_else(|| {
                ApiError::bad_request(format!("Product unavailable: {}", item.product_id))
            })?;
        cart.add_item(row.clone().into_catalog(), item.quantity);
    }
    if cart.is_empty() {
        return Err(ApiError::bad_request("Cart is empty"));
    }

    let totals = compute_totals(&cart);
    let items: Vec<OrderItem> = cart.items().iter().map(OrderItem::from).collect();
    let mut draft = Order::draft(
        CustomerDetails {
            name: form.name,
            email: form.email,
            phone: form.phone,
        },
        form.address,
        items,
        totals.subtotal,
        totals.total_savings,
        totals.shipping_cost,
    );

    let gateway = state
        .gateway_client
        .as_ref()
        .ok_or_else(|| ApiError::checkout("Payments unavailable", "gateway not configured"))?;
    let amount_minor = draft.total_amount * MINOR_UNITS_PER_UNIT;
    let gateway_order = gateway
        .create_order(amount_minor, &draft.order_number)
        .await
        .map_err(|err| ApiError::checkout("Could not start payment", err.to_string()))?;
    draft.gateway_order_id = Some(gateway_order.id.clone());

    let now = draft.created_at.naive_utc();
    order::ActiveModel {
        id: Set(draft.id.clone()),
        order_number: Set(draft.order_number.clone()),
        customer_name: Set(draft.customer.name.clone()),
        customer_email: Set(draft.customer.email.clone()),
        customer_phone: Set(draft.customer.phone.clone()),
        address: Set(serde_json::to_value(&draft.address)?),
        items: Set(serde_json::to_value(&draft.items)?),
        subtotal: Set(draft.subtotal),
        total_savings: Set(draft.total_savings),
        shipping_cost: Set(draft.shipping_cost),
        total_amount: Set(draft.total_amount),
        payment_status: Set(draft.payment_status.into()),
        order_status: Set(draft.order_status.into()),
        payment_id: Set(None),
        payment_method: Set(None),
        gateway_order_id: Set(draft.gateway_order_id.clone()),
        tracking_number: Set(None),
        shipping_provider: Set(None),
        admin_notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    Ok(Json(CreateOrderResponse {
        gateway_order_id: gateway_order.id,
        gateway_key_id: gateway.key_id().to_string(),
        amount_minor,
        order: draft,
    }))
}

#[utoipa::path(
    post,
    path = "/orders/{order_number}/payment",
    tag = "orders",
    request_body = PaymentCallbackRequest,
    responses(
        (status = 200, description = "Order after applying the payment outcome", body = Order),
        (status = 400, description = "Invalid signature or callback payload"),
        (status = 404, description = "Unknown order or email mismatch"),
        (status = 409, description = "Payment already resolved")
    )
)]
#[tracing::instrument(name = "POST /orders/{order_number}/payment", skip(state, user, payload))]
pub async fn confirm_payment(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(order_number): Path<String>,
    Json(payload): Json<PaymentCallbackRequest>,
) -> Result<Json<Order>, ApiError> {
    let row = order::Entity::find()
        .filter(order::Column::OrderNumber.eq(&order_number))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;

    let outcome = match payload.status.as_str() {
        "success" => {
            let payment_id = payload
                .payment_id
                .clone()
                .ok_or_else(|| ApiError::bad_request("paymentId is required on success"))?;
            let signature = payload
                .signature
                .as_deref()
                .ok_or_else(|| ApiError::bad_request("signature is required on success"))?;
            let gateway = state.gateway_client.as_ref().ok_or_else(|| {
                ApiError::checkout("Payments unavailable", "gateway not configured")
            })?;
            let gateway_order_id = row
                .gateway_order_id
                .as_deref()
                .ok_or_else(|| ApiError::bad_request("Order has no gateway session"))?;
            if !gateway.verify_signature(gateway_order_id, &payment_id, signature) {
                return Err(ApiError::bad_request("Invalid payment signature"));
            }
            PaymentOutcome::Success {
                payment_id,
                method: payload.method.clone(),
            }
        }
        "cancelled" => {
            let claimed = payload.email.clone().or_else(|| user.email());
            require_customer_match(claimed, &row.customer_email)?;
            PaymentOutcome::Cancelled
        }
        "failed" => {
            let claimed = payload.email.clone().or_else(|| user.email());
            require_customer_match(claimed, &row.customer_email)?;
            PaymentOutcome::Failed {
                reason: payload.reason.clone(),
            }
        }
        other => {
            return Err(ApiError::bad_request(format!(
                "Unknown payment status: {other}"
            )));
        }
    };

    let Some((payment_status, order_status)) =
        resolve_payment(row.payment_status.clone().into(), &outcome)
    else {
        return Err(ApiError::conflict("Payment already resolved"));
    };

    let mut active: order::ActiveModel = row.into();
    active.payment_status = Set(payment_status.into());
    active.order_status = Set(order_status.into());
    if let PaymentOutcome::Success { payment_id, method } = &outcome {
        active.payment_id = Set(Some(payment_id.clone()));
        active.payment_method = Set(method.clone());
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let updated = active.update(&state.db).await?;

    let result = row_to_order(updated)?;

    // Confirmation mail must never fail a paid order.
    if result.payment_status == filigree_core::order::PaymentStatus::Paid
        && let Some(mailer) = &state.mail_client
    {
        let tracking_url = format!(
            "{}/orders/{}",
            state.config.frontend_url, result.order_number
        );
        let (html, text) = templates::order_confirmation(&result, &tracking_url);
        let message = EmailMessage {
            to: result.customer.email.clone(),
            subject: format!("Order confirmed: {}", result.order_number),
            body_html: Some(html),
            body_text: Some(text),
        };
        if let Err(err) = mailer.send(message).await {
            tracing::error!(
                order_number = %result.order_number,
                "Failed to send order confirmation: {}",
                err
            );
        }
    }

    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/orders/{order_number}",
    tag = "orders",
    params(TrackOrderQuery),
    responses(
        (status = 200, description = "Order status for tracking", body = Order),
        (status = 404, description = "Unknown order or email mismatch")
    )
)]
#[tracing::instrument(name = "GET /orders/{order_number}", skip(state, user))]
pub async fn track_order(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(order_number): Path<String>,
    Query(query): Query<TrackOrderQuery>,
) -> Result<Json<Order>, ApiError> {
    let row = order::Entity::find()
        .filter(order::Column::OrderNumber.eq(&order_number))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;

    let claimed = query.email.or_else(|| user.email());
    let authorized = match claimed {
        Some(email) => email.eq_ignore_ascii_case(&row.customer_email),
        None => false,
    };
    // Mismatches look identical to unknown orders on purpose.
    if !authorized {
        return Err(ApiError::not_found("Order not found"));
    }

    Ok(Json(row_to_order(row)?))
}

#[utoipa::path(
    get,
    path = "/orders",
    tag = "orders",
    responses(
        (status = 200, description = "Orders placed with the signed-in email", body = Vec<Order>),
        (status = 401, description = "Not signed in")
    )
)]
#[tracing::instrument(name = "GET /orders", skip(state, user))]
pub async fn list_my_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
) -> Result<Json<Vec<Order>>, ApiError> {
    user.sub()?;
    let email = user
        .email()
        .ok_or_else(|| ApiError::unauthorized("Token has no email claim"))?;

    let rows = order::Entity::find()
        .filter(order::Column::CustomerEmail.eq(&email))
        .order_by_desc(order::Column::CreatedAt)
        .limit(100)
        .all(&state.db)
        .await?;

    rows.into_iter()
        .map(row_to_order)
        .collect::<Result<Vec<_>, _>>()
        .map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_success_callbacks_require_the_customer_email() {
        let customer = "asha@example.com";

        assert!(require_customer_match(Some("asha@example.com".to_string()), customer).is_ok());
        assert!(require_customer_match(Some("ASHA@Example.COM".to_string()), customer).is_ok());

        // Anyone who merely knows the order number stays locked out,
        // so a pending order cannot be flipped to failed from outside
        // and block the real signed success callback.
        assert!(require_customer_match(None, customer).is_err());
        assert!(require_customer_match(Some("mallory@example.com".to_string()), customer).is_err());
    }
}
