//! # Payment Gateway Trait
//!
//! A payment provider exposes exactly one operation: create a charge.
//! The backend does not interpret failures; it relays the provider's message.

use crate::error::GatewayResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parameters for a single charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeRequest {
    /// Amount in the currency's minor unit (cents for USD)
    pub amount: i64,
    /// Lowercase ISO currency code
    pub currency: String,
    /// Opaque payment-source token supplied by the caller
    pub source: String,
}

impl ChargeRequest {
    pub fn new(amount: i64, currency: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            source: source.into(),
        }
    }
}

/// Charge record as returned by the gateway.
///
/// The commonly used fields are typed; everything else the gateway sends is
/// kept in `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub paid: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Core trait for payment provider implementations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Submit a charge and return the gateway's charge record.
    async fn create_charge(&self, request: &ChargeRequest) -> GatewayResult<Charge>;

    /// Provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;
