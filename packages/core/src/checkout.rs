//! Checkout orchestration.
//!
//! Converts a populated cart plus a validated shipping form into a
//! confirmed, paid order. The sequence is strictly ordered and
//! deliberately non-transactional across the payment boundary: the
//! order row exists before payment is attempted so a gateway-side
//! success can always be correlated back to a local record. The cost is
//! a window where an order sits in `pending` with no payment outcome if
//! the process dies mid-flight; that state is surfaced to admins, not
//! auto-corrected.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cart::CartStore;
use crate::order::{
    CustomerDetails, Order, OrderItem, OrderStatus, PaymentStatus, ShippingAddress,
};

/// Flat shipping fee, charged only on a non-empty cart.
pub const SHIPPING_FLAT: i64 = 200;

/// Catalog prices are whole currency units; the gateway wants minor
/// units.
pub const MINOR_UNITS_PER_UNIT: i64 = 100;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: ShippingAddress,
}

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Default, thiserror::Error)]
#[error("checkout form invalid: {}", self.summary())]
pub struct ValidationErrors {
    pub fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn summary(&self) -> String {
        self.fields
            .keys()
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl CheckoutForm {
    /// Schema validation, run before any network call.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.name.trim().is_empty() {
            errors.push("name", "Name is required");
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            errors.push("email", "Valid email is required");
        }
        if self.phone.trim().is_empty() {
            errors.push("phone", "Phone number is required");
        }
        if self.address.line1.trim().is_empty() {
            errors.push("address_line1", "Address is required");
        }
        if self.address.city.trim().is_empty() {
            errors.push("city", "City is required");
        }
        if self.address.state.trim().is_empty() {
            errors.push("state", "State is required");
        }
        if self.address.pincode.trim().is_empty() {
            errors.push("pincode", "Pincode is required");
        }
        if self.address.country.trim().is_empty() {
            errors.push("country", "Country is required");
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Resolution reported by the external payment collector. Closing the
/// hosted widget counts as a cancellation and is handled like a
/// failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success {
        payment_id: String,
        method: Option<String>,
    },
    Cancelled,
    Failed {
        reason: Option<String>,
    },
}

/// Explicit payment-side state machine. `None` means the order is not
/// pending, so the outcome must not be applied again (idempotency
/// guard for double deliveries).
pub fn resolve_payment(
    current: PaymentStatus,
    outcome: &PaymentOutcome,
) -> Option<(PaymentStatus, OrderStatus)> {
    if current != PaymentStatus::Pending {
        return None;
    }
    Some(match outcome {
        PaymentOutcome::Success { .. } => (PaymentStatus::Paid, OrderStatus::Confirmed),
        PaymentOutcome::Cancelled | PaymentOutcome::Failed { .. } => {
            (PaymentStatus::Failed, OrderStatus::PaymentFailed)
        }
    })
}

#[async_trait::async_trait]
pub trait OrderGateway: Send + Sync {
    async fn create_order(&self, order: &Order) -> anyhow::Result<()>;
    async fn mark_paid(
        &self,
        order_number: &str,
        payment_id: &str,
        method: Option<&str>,
    ) -> anyhow::Result<()>;
    async fn mark_payment_failed(&self, order_number: &str) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
pub trait PaymentCollector: Send + Sync {
    /// Amount is in the gateway's minor unit; the order number doubles
    /// as the idempotency/reference key.
    async fn collect(&self, amount_minor: i64, reference: &str)
    -> anyhow::Result<PaymentOutcome>;
}

#[async_trait::async_trait]
pub trait ConfirmationSender: Send + Sync {
    async fn send_confirmation(&self, order: &Order) -> anyhow::Result<()>;
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("cart is empty")]
    EmptyCart,
    /// Order creation or collector invocation failed outright; nothing
    /// to retry against, the cart is untouched.
    #[error("checkout failed: {0}")]
    Gateway(#[source] anyhow::Error),
    /// Payment was declined or cancelled. The order exists in
    /// `payment_failed` and the cart is kept so the shopper can retry.
    #[error("payment failed for order {order_number}")]
    PaymentFailed {
        order_number: String,
        reason: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckoutTotals {
    pub subtotal: i64,
    pub total_savings: i64,
    pub shipping_cost: i64,
    pub total_amount: i64,
}

pub fn compute_totals(cart: &CartStore) -> CheckoutTotals {
    let subtotal = cart.subtotal();
    let shipping_cost = if cart.is_empty() { 0 } else { SHIPPING_FLAT };
    CheckoutTotals {
        subtotal,
        total_savings: cart.total_savings(),
        shipping_cost,
        total_amount: subtotal + shipping_cost,
    }
}

pub struct CheckoutOrchestrator {
    orders: Arc<dyn OrderGateway>,
    payments: Arc<dyn PaymentCollector>,
    mailer: Arc<dyn ConfirmationSender>,
}

impl CheckoutOrchestrator {
    pub fn new(
        orders: Arc<dyn OrderGateway>,
        payments: Arc<dyn PaymentCollector>,
        mailer: Arc<dyn ConfirmationSender>,
    ) -> Self {
        Self {
            orders,
            payments,
            mailer,
        }
    }

    /// Runs the full checkout sequence. On success the cart is cleared
    /// and the confirmed order returned; on payment failure the cart is
    /// left untouched for retry.
    pub async fn place_order(
        &self,
        cart: &mut CartStore,
        form: &CheckoutForm,
    ) -> Result<Order, CheckoutError> {
        form.validate()?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let totals = compute_totals(cart);
        let items: Vec<OrderItem> = cart.items().iter().map(OrderItem::from).collect();
        let mut order = Order::draft(
            CustomerDetails {
                name: form.name.clone(),
                email: form.email.clone(),
                phone: form.phone.clone(),
            },
            form.address.clone(),
            items,
            totals.subtotal,
            totals.total_savings,
            totals.shipping_cost,
        );

        self.orders
            .create_order(&order)
            .await
            .map_err(CheckoutError::Gateway)?;

        tracing::info!(
            order_number = %order.order_number,
            total = order.total_amount,
            "Order created, collecting payment"
        );

        let outcome = self
            .payments
            .collect(
                order.total_amount * MINOR_UNITS_PER_UNIT,
                &order.order_number,
            )
            .await
            .map_err(CheckoutError::Gateway)?;

        let Some((payment_status, order_status)) =
            resolve_payment(order.payment_status, &outcome)
        else {
            // Not reachable from a fresh draft; kept as a guard for the
            // state machine contract.
            return Err(CheckoutError::Gateway(anyhow::anyhow!(
                "order {} is not awaiting payment",
                order.order_number
            )));
        };

        match outcome {
            PaymentOutcome::Success { payment_id, method } => {
                self.orders
                    .mark_paid(&order.order_number, &payment_id, method.as_deref())
                    .await
                    .map_err(CheckoutError::Gateway)?;

                order.payment_status = payment_status;
                order.order_status = order_status;
                order.payment_id = Some(payment_id);
                order.payment_method = method;

                // Best-effort: a failed confirmation email never rolls
                // back a paid order.
                if let Err(err) = self.mailer.send_confirmation(&order).await {
                    tracing::error!(
                        order_number = %order.order_number,
                        error = %err,
                        "Confirmation email failed"
                    );
                }

                cart.clear();

                tracing::info!(order_number = %order.order_number, "Checkout complete");
                Ok(order)
            }
            PaymentOutcome::Cancelled | PaymentOutcome::Failed { .. } => {
                if let Err(err) = self.orders.mark_payment_failed(&order.order_number).await {
                    tracing::error!(
                        order_number = %order.order_number,
                        error = %err,
                        "Failed to record payment failure"
                    );
                }
                let reason = match outcome {
                    PaymentOutcome::Failed { reason } => reason,
                    _ => None,
                };
                Err(CheckoutError::PaymentFailed {
                    order_number: order.order_number,
                    reason,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MetalPurity, MetalType, Product, ProductCategory};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn product(id: &str, price: i64, mrp: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Piece {id}"),
            description: String::new(),
            category: ProductCategory::Necklace,
            metal_type: MetalType::Gold,
            metal_purity: MetalPurity::K22,
            weight_grams: 8.0,
            stone_weight_carats: None,
            stone_quality: None,
            stone_grade: None,
            stone_setting: None,
            stone_count: None,
            price,
            mrp,
            making_charges_saved: Product::compute_making_charges_saved(mrp, price),
            images: vec![],
            videos: vec![],
            stock_quantity: 4,
            active: true,
        }
    }

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            address: ShippingAddress {
                line1: "12 Temple Street".to_string(),
                line2: None,
                city: "Bengaluru".to_string(),
                state: "Karnataka".to_string(),
                pincode: "560001".to_string(),
                country: "India".to_string(),
            },
        }
    }

    fn loaded_cart() -> CartStore {
        let mut cart = CartStore::new();
        cart.add_item(product("a", 10_000, 12_000), 2);
        cart.add_item(product("b", 5_000, 5_000), 1);
        cart
    }

    #[derive(Default)]
    struct FakeOrders {
        created: Mutex<Vec<Order>>,
        paid: Mutex<Vec<(String, String)>>,
        failed: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl OrderGateway for FakeOrders {
        async fn create_order(&self, order: &Order) -> anyhow::Result<()> {
            self.created.lock().unwrap().push(order.clone());
            Ok(())
        }

        async fn mark_paid(
            &self,
            order_number: &str,
            payment_id: &str,
            _method: Option<&str>,
        ) -> anyhow::Result<()> {
            self.paid
                .lock()
                .unwrap()
                .push((order_number.to_string(), payment_id.to_string()));
            Ok(())
        }

        async fn mark_payment_failed(&self, order_number: &str) -> anyhow::Result<()> {
            self.failed.lock().unwrap().push(order_number.to_string());
            Ok(())
        }
    }

    struct FakeCollector {
        outcome: PaymentOutcome,
        seen_amounts: Mutex<Vec<(i64, String)>>,
    }

    impl FakeCollector {
        fn new(outcome: PaymentOutcome) -> Self {
            Self {
                outcome,
                seen_amounts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl PaymentCollector for FakeCollector {
        async fn collect(
            &self,
            amount_minor: i64,
            reference: &str,
        ) -> anyhow::Result<PaymentOutcome> {
            self.seen_amounts
                .lock()
                .unwrap()
                .push((amount_minor, reference.to_string()));
            Ok(self.outcome.clone())
        }
    }

    #[derive(Default)]
    struct FakeMailer {
        sent: AtomicUsize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl ConfirmationSender for FakeMailer {
        async fn send_confirmation(&self, _order: &Order) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("smtp relay rejected message");
            }
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn orchestrator(
        orders: Arc<FakeOrders>,
        collector: Arc<FakeCollector>,
        mailer: Arc<FakeMailer>,
    ) -> CheckoutOrchestrator {
        CheckoutOrchestrator::new(orders, collector, mailer)
    }

    #[test]
    fn test_form_validation_reports_per_field() {
        let form = CheckoutForm {
            email: "not-an-email".to_string(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        for field in ["name", "email", "phone", "address_line1", "city", "state", "pincode", "country"]
        {
            assert!(errors.fields.contains_key(field), "missing error for {field}");
        }

        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn test_totals_flat_shipping_only_when_non_empty() {
        let cart = loaded_cart();
        let totals = compute_totals(&cart);
        assert_eq!(totals.subtotal, 25_000);
        assert_eq!(totals.total_savings, 4_000);
        assert_eq!(totals.shipping_cost, 200);
        assert_eq!(totals.total_amount, 25_200);

        let empty = CartStore::new();
        assert_eq!(compute_totals(&empty).total_amount, 0);
    }

    #[test]
    fn test_resolve_payment_transitions() {
        let success = PaymentOutcome::Success {
            payment_id: "pay_1".to_string(),
            method: None,
        };
        assert_eq!(
            resolve_payment(PaymentStatus::Pending, &success),
            Some((PaymentStatus::Paid, OrderStatus::Confirmed))
        );
        assert_eq!(
            resolve_payment(PaymentStatus::Pending, &PaymentOutcome::Cancelled),
            Some((PaymentStatus::Failed, OrderStatus::PaymentFailed))
        );
        // Already-resolved orders never transition again, in either
        // direction: a cancel followed by a late success stays failed.
        assert_eq!(resolve_payment(PaymentStatus::Paid, &success), None);
        assert_eq!(
            resolve_payment(PaymentStatus::Failed, &PaymentOutcome::Cancelled),
            None
        );
        let (after_cancel, _) =
            resolve_payment(PaymentStatus::Pending, &PaymentOutcome::Cancelled).unwrap();
        assert_eq!(resolve_payment(after_cancel, &success), None);
    }

    #[tokio::test]
    async fn test_happy_path_confirms_order_and_clears_cart() {
        let orders = Arc::new(FakeOrders::default());
        let collector = Arc::new(FakeCollector::new(PaymentOutcome::Success {
            payment_id: "pay_123".to_string(),
            method: Some("upi".to_string()),
        }));
        let mailer = Arc::new(FakeMailer::default());
        let flow = orchestrator(orders.clone(), collector.clone(), mailer.clone());

        let mut cart = loaded_cart();
        let order = flow.place_order(&mut cart, &valid_form()).await.unwrap();

        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.order_status, OrderStatus::Confirmed);
        assert_eq!(order.payment_id.as_deref(), Some("pay_123"));
        assert!(cart.is_empty(), "cart cleared after confirmed checkout");

        // Order row was created pending before payment was collected.
        let created = orders.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].payment_status, PaymentStatus::Pending);
        assert_eq!(created[0].order_status, OrderStatus::Placed);

        // Gateway saw minor units keyed by the order number.
        let seen = collector.seen_amounts.lock().unwrap();
        assert_eq!(seen[0].0, 25_200 * MINOR_UNITS_PER_UNIT);
        assert_eq!(seen[0].1, order.order_number);

        assert_eq!(mailer.sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_payment_keeps_cart_and_marks_failed() {
        let orders = Arc::new(FakeOrders::default());
        let collector = Arc::new(FakeCollector::new(PaymentOutcome::Cancelled));
        let mailer = Arc::new(FakeMailer::default());
        let flow = orchestrator(orders.clone(), collector, mailer.clone());

        let mut cart = loaded_cart();
        let err = flow.place_order(&mut cart, &valid_form()).await.unwrap_err();

        let CheckoutError::PaymentFailed { order_number, .. } = err else {
            panic!("expected payment failure");
        };
        assert_eq!(orders.failed.lock().unwrap().as_slice(), &[order_number]);
        assert_eq!(cart.items().len(), 2, "cart untouched for retry");
        assert_eq!(mailer.sent.load(Ordering::SeqCst), 0, "no email attempted");
    }

    #[tokio::test]
    async fn test_declined_payment_surfaces_gateway_reason() {
        let orders = Arc::new(FakeOrders::default());
        let collector = Arc::new(FakeCollector::new(PaymentOutcome::Failed {
            reason: Some("card declined".to_string()),
        }));
        let flow = orchestrator(orders, collector, Arc::new(FakeMailer::default()));

        let mut cart = loaded_cart();
        let err = flow.place_order(&mut cart, &valid_form()).await.unwrap_err();
        let CheckoutError::PaymentFailed { reason, .. } = err else {
            panic!("expected payment failure");
        };
        assert_eq!(reason.as_deref(), Some("card declined"));
    }

    #[tokio::test]
    async fn test_email_failure_does_not_fail_checkout() {
        let orders = Arc::new(FakeOrders::default());
        let collector = Arc::new(FakeCollector::new(PaymentOutcome::Success {
            payment_id: "pay_9".to_string(),
            method: None,
        }));
        let mailer = Arc::new(FakeMailer {
            fail: true,
            ..Default::default()
        });
        let flow = orchestrator(orders.clone(), collector, mailer);

        let mut cart = loaded_cart();
        let order = flow.place_order(&mut cart, &valid_form()).await.unwrap();

        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.order_status, OrderStatus::Confirmed);
        assert!(cart.is_empty(), "cart still cleared");
        assert_eq!(orders.paid.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_form_aborts_before_any_collaborator_call() {
        let orders = Arc::new(FakeOrders::default());
        let collector = Arc::new(FakeCollector::new(PaymentOutcome::Cancelled));
        let flow = orchestrator(orders.clone(), collector.clone(), Arc::new(FakeMailer::default()));

        let mut cart = loaded_cart();
        let err = flow
            .place_order(&mut cart, &CheckoutForm::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Validation(_)));
        assert!(orders.created.lock().unwrap().is_empty());
        assert!(collector.seen_amounts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let flow = orchestrator(
            Arc::new(FakeOrders::default()),
            Arc::new(FakeCollector::new(PaymentOutcome::Cancelled)),
            Arc::new(FakeMailer::default()),
        );
        let mut cart = CartStore::new();
        let err = flow.place_order(&mut cart, &valid_form()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }
}
