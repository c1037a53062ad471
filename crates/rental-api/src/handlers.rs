//! # Request Handlers
//!
//! Axum request handlers for the rental API.
//! Each handler reads its input, makes one store or gateway call, and maps the
//! outcome to a JSON response.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rental_core::{Charge, ChargeRequest, Collection, Document, GatewayError, GatewayResult, StoreError};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Error body for vehicle and reservation routes
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: error.into(),
        }
    }
}

/// Body returned after an insert
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: String,
}

/// Charge amount as sent by the client: a JSON integer or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Integer(i64),
    Text(String),
}

impl Amount {
    /// Amount in minor currency units
    pub fn to_minor_units(&self) -> GatewayResult<i64> {
        match self {
            Amount::Integer(amount) => Ok(*amount),
            Amount::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| GatewayError::InvalidRequest(format!("Invalid integer: {}", text))),
        }
    }
}

/// Payment request body. Fields are optional so that a missing one is
/// reported in the payment error shape rather than as a bare rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentRequest {
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl PaymentRequest {
    pub fn into_charge_request(self) -> GatewayResult<ChargeRequest> {
        let missing = |field: &str| GatewayError::InvalidRequest(format!("Missing required param: {}", field));

        Ok(ChargeRequest {
            amount: self.amount.ok_or_else(|| missing("amount"))?.to_minor_units()?,
            currency: self.currency.ok_or_else(|| missing("currency"))?,
            source: self.source.ok_or_else(|| missing("source"))?,
        })
    }
}

/// Successful payment body
#[derive(Debug, Serialize)]
pub struct PaymentSuccess {
    pub success: bool,
    pub charge: Charge,
}

/// Failed payment body
#[derive(Debug, Serialize)]
pub struct PaymentFailure {
    pub success: bool,
    pub error: String,
}

impl PaymentFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

type DocumentRejection = (StatusCode, Json<ErrorResponse>);
type PaymentRejection = (StatusCode, Json<PaymentFailure>);

/// Fixed response messages per collection
struct Messages {
    list_error: &'static str,
    created: &'static str,
    create_error: &'static str,
}

fn messages(collection: Collection) -> Messages {
    match collection {
        Collection::Vehicles => Messages {
            list_error: "Error fetching vehicles",
            created: "Vehicle added successfully",
            create_error: "Error adding vehicle",
        },
        Collection::Reservations => Messages {
            list_error: "Error fetching reservations",
            created: "Reservation created successfully",
            create_error: "Error creating reservation",
        },
    }
}

fn store_error_to_response(message: &str, err: StoreError) -> DocumentRejection {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(message, err.to_string())),
    )
}

fn payment_error_to_response(err: GatewayError) -> PaymentRejection {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(PaymentFailure::new(err.message())),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (store, store_backend) = match state.store.get() {
        Ok(store) => ("connected", Some(store.backend_name())),
        Err(_) => ("disconnected", None),
    };
    let (payments, payment_provider) = match state.gateway() {
        Ok(gateway) => ("configured", Some(gateway.provider_name())),
        Err(_) => ("unconfigured", None),
    };
    let cache = state
        .cache
        .as_ref()
        .map_or("disabled", |cache| cache.state().as_str());

    Json(serde_json::json!({
        "status": "healthy",
        "service": "altoev-rental",
        "version": env!("CARGO_PKG_VERSION"),
        "store": store,
        "store_backend": store_backend,
        "payments": payments,
        "payment_provider": payment_provider,
        "cache": cache
    }))
}

/// List all vehicles
pub async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, DocumentRejection> {
    list_documents(&state, Collection::Vehicles).await
}

/// Add a vehicle
pub async fn create_vehicle(
    State(state): State<AppState>,
    body: Result<Json<Document>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), DocumentRejection> {
    create_document(&state, Collection::Vehicles, body).await
}

/// List all reservations
pub async fn list_reservations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, DocumentRejection> {
    list_documents(&state, Collection::Reservations).await
}

/// Create a reservation
pub async fn create_reservation(
    State(state): State<AppState>,
    body: Result<Json<Document>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), DocumentRejection> {
    create_document(&state, Collection::Reservations, body).await
}

/// Internal list (shared by both collections)
#[instrument(skip(state), fields(collection = %collection))]
async fn list_documents(
    state: &AppState,
    collection: Collection,
) -> Result<Json<Vec<Document>>, DocumentRejection> {
    let messages = messages(collection);

    let store = state
        .store
        .get()
        .map_err(|e| store_error_to_response(messages.list_error, e))?;

    let documents = store.list_all(collection).await.map_err(|e| {
        error!("Failed to list {}: {}", collection, e);
        store_error_to_response(messages.list_error, e)
    })?;

    Ok(Json(documents))
}

/// Internal insert (shared by both collections)
#[instrument(skip(state, body), fields(collection = %collection))]
async fn create_document(
    state: &AppState,
    collection: Collection,
    body: Result<Json<Document>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), DocumentRejection> {
    let messages = messages(collection);

    let Json(document) = body.map_err(|rejection| {
        error!("Rejected {} body: {}", collection, rejection.body_text());
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(messages.create_error, rejection.body_text())),
        )
    })?;

    let store = state
        .store
        .get()
        .map_err(|e| store_error_to_response(messages.create_error, e))?;

    let id = store.insert_one(collection, document).await.map_err(|e| {
        error!("Failed to insert into {}: {}", collection, e);
        store_error_to_response(messages.create_error, e)
    })?;

    info!("Inserted into {}: id={}", collection, id);

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: messages.created.to_string(),
            id,
        }),
    ))
}

/// Create a charge through the payment gateway
#[instrument(skip(state, body))]
pub async fn create_payment(
    State(state): State<AppState>,
    body: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<Json<PaymentSuccess>, PaymentRejection> {
    let Json(request) = body.map_err(|rejection| {
        error!("Rejected payment body: {}", rejection.body_text());
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(PaymentFailure::new(rejection.body_text())),
        )
    })?;

    let charge_request = request
        .into_charge_request()
        .map_err(payment_error_to_response)?;

    let gateway = state.gateway().map_err(|e| {
        error!("Payment rejected: {}", e);
        payment_error_to_response(e)
    })?;

    info!(
        "Creating charge: amount={}, currency={}",
        charge_request.amount, charge_request.currency
    );

    let charge = gateway.create_charge(&charge_request).await.map_err(|e| {
        error!("Charge failed: {}", e);
        payment_error_to_response(e)
    })?;

    info!("Charge created: id={}", charge.id);

    Ok(Json(PaymentSuccess {
        success: true,
        charge,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Error fetching vehicles", "Query failed: timeout");
        assert_eq!(err.message, "Error fetching vehicles");
        assert_eq!(err.error, "Query failed: timeout");
    }

    #[test]
    fn test_store_error_conversion() {
        let (status, Json(body)) =
            store_error_to_response("Error adding vehicle", StoreError::NotConnected);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Document store is not connected");
    }

    #[test]
    fn test_payment_error_conversion() {
        let err = GatewayError::Provider {
            provider: "stripe".to_string(),
            message: "Your card has insufficient funds.".to_string(),
        };
        let (status, Json(body)) = payment_error_to_response(err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.success);
        assert_eq!(body.error, "Your card has insufficient funds.");
    }

    #[test]
    fn test_payment_request_requires_every_field() {
        let request = PaymentRequest {
            amount: Some(Amount::Integer(500)),
            currency: Some("usd".to_string()),
            source: Some("tok_visa".to_string()),
        };
        assert_eq!(
            request.into_charge_request().unwrap(),
            ChargeRequest::new(500, "usd", "tok_visa")
        );

        let request = PaymentRequest {
            amount: Some(Amount::Integer(500)),
            currency: Some("usd".to_string()),
            source: None,
        };
        let err = request.into_charge_request().unwrap_err();
        assert!(err.message().contains("source"));

        assert!(PaymentRequest::default().into_charge_request().is_err());
    }

    #[test]
    fn test_amount_accepts_numeric_strings() {
        let request: PaymentRequest =
            serde_json::from_str(r#"{"amount":"500","currency":"usd","source":"tok_visa"}"#)
                .unwrap();
        assert_eq!(request.amount, Some(Amount::Text("500".to_string())));
        assert_eq!(request.into_charge_request().unwrap().amount, 500);

        let err = Amount::Text("five".to_string()).to_minor_units().unwrap_err();
        assert_eq!(err.message(), "Invalid request: Invalid integer: five");
    }

    #[test]
    fn test_messages_per_collection() {
        assert_eq!(messages(Collection::Vehicles).created, "Vehicle added successfully");
        assert_eq!(
            messages(Collection::Reservations).create_error,
            "Error creating reservation"
        );
    }
}
