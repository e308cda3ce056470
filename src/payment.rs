use crate::models::PixCharge;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

// 1. PaymentService Contract
/// PaymentService
///
/// Defines the abstract contract for the payment gateway integration. This trait
/// allows us to swap the concrete implementation—from the real HTTP client
/// (PixGatewayClient) in production to the in-memory Mock (MockPaymentService)
/// during testing—without affecting the calling handlers.
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Creates a PIX charge at the gateway for the given reservation.
    ///
    /// The returned [`PixCharge`] carries the gateway's charge id (later used
    /// to correlate the webhook callback) and the QR payload shown to the
    /// resident.
    ///
    /// # Arguments
    /// * `reference`: The reservation id, forwarded as the gateway's external reference.
    /// * `amount_cents`: The fee in cents (BRL).
    /// * `description`: Free-text shown on the payer's statement.
    async fn create_charge(
        &self,
        reference: Uuid,
        amount_cents: i64,
        description: &str,
    ) -> Result<PixCharge, String>;
}

/// PaymentState
///
/// The concrete type used to share the payment service access across the application state.
pub type PaymentState = Arc<dyn PaymentService>;

// 2. The Real Implementation (PIX gateway over HTTP)

/// GatewayChargeResponse
///
/// Minimal struct to deserialize the gateway's charge-creation response.
/// Field names follow the gateway's REST contract.
#[derive(Deserialize)]
struct GatewayChargeResponse {
    id: String,
    qr_code: String,
    qr_code_base64: Option<String>,
}

/// PixGatewayClient
///
/// The concrete implementation talking to the PIX payment gateway's REST API
/// with a bearer token. The same client serves the sandbox (local) and the
/// production endpoint; only the base URL and token differ.
#[derive(Clone)]
pub struct PixGatewayClient {
    http: reqwest::Client,
    api_url: String,
    api_token: String,
}

impl PixGatewayClient {
    /// new
    ///
    /// Constructs the gateway client using the base URL and token from AppConfig.
    /// The request timeout is deliberately short: charge creation sits on the
    /// reservation request path and must not hang the handler.
    pub fn new(api_url: &str, api_token: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        }
    }
}

#[async_trait]
impl PaymentService for PixGatewayClient {
    /// create_charge
    ///
    /// POSTs the charge to the gateway and maps its response onto [`PixCharge`].
    /// All failures collapse into a String error; the handler logs it and
    /// answers 502 without leaking gateway details to the client.
    async fn create_charge(
        &self,
        reference: Uuid,
        amount_cents: i64,
        description: &str,
    ) -> Result<PixCharge, String> {
        let url = format!("{}/v1/charges", self.api_url);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_token)
            .json(&serde_json::json!({
                "external_reference": reference,
                "amount": amount_cents,
                "description": description,
                "payment_method": "pix",
            }))
            .send()
            .await
            .map_err(|e| format!("gateway request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("gateway rejected charge: {}", response.status()));
        }

        let charge = response
            .json::<GatewayChargeResponse>()
            .await
            .map_err(|e| format!("gateway response malformed: {e}"))?;

        Ok(PixCharge {
            charge_id: charge.id,
            qr_code: charge.qr_code,
            qr_code_image: charge.qr_code_base64,
            amount_cents,
        })
    }
}

// 3. The Mock Implementation (For Unit Tests)
/// MockPaymentService
///
/// A mock implementation of `PaymentService` used exclusively for unit and
/// integration testing. This lets us exercise the reservation saga without a
/// network connection to the gateway, isolating the test boundary.
#[derive(Clone)]
pub struct MockPaymentService {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
}

impl MockPaymentService {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

impl Default for MockPaymentService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentService for MockPaymentService {
    async fn create_charge(
        &self,
        reference: Uuid,
        amount_cents: i64,
        _description: &str,
    ) -> Result<PixCharge, String> {
        if self.should_fail {
            return Err("Mock Gateway Error: Simulation requested".to_string());
        }

        // Deterministic payload for mock assertions: the charge id embeds the
        // reservation reference so tests can correlate webhook callbacks.
        Ok(PixCharge {
            charge_id: format!("mock-charge-{reference}"),
            qr_code: format!("00020126580014br.gov.bcb.pix-mock-{reference}"),
            qr_code_image: None,
            amount_cents,
        })
    }
}
