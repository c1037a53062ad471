//! # Stripe Charges
//!
//! Implementation of the Stripe Charges API (`POST /v1/charges`).
//! The gateway submits the charge and relays Stripe's answer; it never
//! interprets decline reasons.

use crate::config::StripeConfig;
use async_trait::async_trait;
use rental_core::{Charge, ChargeRequest, GatewayError, GatewayResult, PaymentGateway};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe Charges gateway
pub struct StripeChargeGateway {
    config: StripeConfig,
    client: Client,
}

impl StripeChargeGateway {
    /// Create a new gateway
    pub fn new(config: StripeConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("altoev-rental/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    fn form_params(request: &ChargeRequest) -> [(&'static str, String); 3] {
        [
            ("amount", request.amount.to_string()),
            ("currency", request.currency.clone()),
            ("source", request.source.clone()),
        ]
    }
}

#[async_trait]
impl PaymentGateway for StripeChargeGateway {
    #[instrument(skip(self, request), fields(amount = request.amount, currency = %request.currency))]
    async fn create_charge(&self, request: &ChargeRequest) -> GatewayResult<Charge> {
        let url = format!("{}/v1/charges", self.config.api_base_url);

        debug!("Creating Stripe charge");

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&Self::form_params(request))
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            // Parse Stripe error
            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(GatewayError::Provider {
                    provider: PROVIDER.to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(GatewayError::Provider {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let charge: Charge = serde_json::from_str(&body).map_err(|e| {
            GatewayError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        info!(
            "Created Stripe charge: id={}, status={:?}",
            charge.id, charge.status
        );

        Ok(charge)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer) -> StripeChargeGateway {
        let config = StripeConfig::new("sk_test_abc123").with_api_base_url(server.uri());
        StripeChargeGateway::new(config).unwrap()
    }

    #[test]
    fn test_form_params() {
        let params = StripeChargeGateway::form_params(&ChargeRequest::new(500, "usd", "tok_visa"));
        assert_eq!(params[0], ("amount", "500".to_string()));
        assert_eq!(params[1], ("currency", "usd".to_string()));
        assert_eq!(params[2], ("source", "tok_visa".to_string()));
    }

    #[tokio::test]
    async fn test_successful_charge() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/charges"))
            .and(header("authorization", "Bearer sk_test_abc123"))
            .and(body_string_contains("amount=500"))
            .and(body_string_contains("currency=usd"))
            .and(body_string_contains("source=tok_visa"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "ch_3Mtw",
                "object": "charge",
                "amount": 500,
                "currency": "usd",
                "status": "succeeded",
                "paid": true,
                "livemode": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let charge = gateway_for(&server)
            .create_charge(&ChargeRequest::new(500, "usd", "tok_visa"))
            .await
            .unwrap();

        assert_eq!(charge.id, "ch_3Mtw");
        assert_eq!(charge.amount, 500);
        assert_eq!(charge.currency, "usd");
        assert!(charge.paid);
        assert_eq!(charge.extra["livemode"], json!(false));
    }

    #[tokio::test]
    async fn test_declined_card_relays_stripe_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/charges"))
            .respond_with(ResponseTemplate::new(402).set_body_json(json!({
                "error": {
                    "code": "card_declined",
                    "decline_code": "generic_decline",
                    "message": "Your card was declined.",
                    "type": "card_error"
                }
            })))
            .mount(&server)
            .await;

        let err = gateway_for(&server)
            .create_charge(&ChargeRequest::new(500, "usd", "tok_chargeDeclined"))
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Provider { .. }));
        assert_eq!(err.message(), "Your card was declined.");
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/charges"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let err = gateway_for(&server)
            .create_charge(&ChargeRequest::new(500, "usd", "tok_visa"))
            .await
            .unwrap_err();

        assert!(err.message().contains("upstream unavailable"));
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_network_error() {
        let config = StripeConfig::new("sk_test_abc123").with_api_base_url("http://127.0.0.1:1");
        let gateway = StripeChargeGateway::new(config).unwrap();

        let err = gateway
            .create_charge(&ChargeRequest::new(500, "usd", "tok_visa"))
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Network(_)));
        assert!(!err.message().is_empty());
    }
}
