//! Thin client for the hosted payment gateway's order API and the
//! HMAC signature check the gateway performs on callback payloads.

use anyhow::{Result, anyhow, bail};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::GatewayConfig;

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    config: GatewayConfig,
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    /// Amount in minor units (paise).
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
}

impl RazorpayClient {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn key_id(&self) -> &str {
        &self.config.key_id
    }

    /// Creates a gateway-side order the hosted widget can collect against.
    /// `amount_minor` is in paise, `receipt` is our order number.
    #[tracing::instrument(name = "gateway_create_order", skip(self))]
    pub async fn create_order(&self, amount_minor: i64, receipt: &str) -> Result<GatewayOrder> {
        let url = format!("{}/orders", self.config.api_base);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&CreateOrderRequest {
                amount: amount_minor,
                currency: "INR",
                receipt,
            })
            .send()
            .await
            .map_err(|err| anyhow!("Gateway order request failed: {}", err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Gateway returned {}: {}", status, body);
        }

        Ok(response.json::<GatewayOrder>().await?)
    }

    /// Verifies the payment signature the widget hands back on success:
    /// HMAC-SHA256 over `{gateway_order_id}|{payment_id}` keyed with the
    /// API secret, hex-encoded.
    pub fn verify_signature(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> bool {
        verify_signature_with_secret(
            &self.config.key_secret,
            gateway_order_id,
            payment_id,
            signature,
        )
    }
}

fn verify_signature_with_secret(
    secret: &str,
    gateway_order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    // Decode first so the comparison runs over raw digest bytes in
    // constant time; mixed-case hex still decodes to the same bytes.
    let Ok(claimed) = hex::decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(format!("{}|{}", gateway_order_id, payment_id).as_bytes());
    mac.verify_slice(&claimed).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn accepts_valid_signature() {
        let signature = sign("test_secret", "order_abc", "pay_123");
        assert!(verify_signature_with_secret(
            "test_secret",
            "order_abc",
            "pay_123",
            &signature
        ));
    }

    #[test]
    fn accepts_uppercase_hex() {
        let signature = sign("test_secret", "order_abc", "pay_123").to_uppercase();
        assert!(verify_signature_with_secret(
            "test_secret",
            "order_abc",
            "pay_123",
            &signature
        ));
    }

    #[test]
    fn rejects_wrong_secret() {
        let signature = sign("other_secret", "order_abc", "pay_123");
        assert!(!verify_signature_with_secret(
            "test_secret",
            "order_abc",
            "pay_123",
            &signature
        ));
    }

    #[test]
    fn rejects_swapped_ids() {
        let signature = sign("test_secret", "order_abc", "pay_123");
        assert!(!verify_signature_with_secret(
            "test_secret",
            "pay_123",
            "order_abc",
            &signature
        ));
    }

    #[test]
    fn rejects_truncated_digest_prefix() {
        let signature = sign("test_secret", "order_abc", "pay_123");
        assert!(!verify_signature_with_secret(
            "test_secret",
            "order_abc",
            "pay_123",
            &signature[..32]
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(!verify_signature_with_secret(
            "test_secret",
            "order_abc",
            "pay_123",
            "not-hex-at-all"
        ));
    }
}
