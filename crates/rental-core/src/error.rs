//! # Error Types
//!
//! Typed errors for the rental backend.
//! Store operations return `StoreResult<T>`, gateway operations return
//! `GatewayResult<T>`. `ConnectionError` covers startup connection failures,
//! which are logged and never fatal.

use std::time::Duration;
use thiserror::Error;

/// Document store failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// No connection to the document store was ever established
    #[error("Document store is not connected")]
    NotConnected,

    /// Transport or query failure while reading
    #[error("Query failed: {0}")]
    Query(String),

    /// Transport or write failure while inserting
    #[error("Write failed: {0}")]
    Write(String),

    /// Document could not be converted to the store's native format
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A document with the same `_id` already exists
    #[error("Duplicate key: _id {0} already exists")]
    DuplicateId(String),
}

/// Payment gateway failures
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No gateway credentials were supplied at startup
    #[error("Payment gateway is not configured")]
    NotConfigured,

    /// Request is missing fields or has the wrong shape
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Gateway rejected the request (declined card, invalid source, ...)
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Network/HTTP error communicating with the gateway
    #[error("Network error: {0}")]
    Network(String),

    /// Gateway response could not be parsed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GatewayError {
    /// Message relayed to API callers.
    ///
    /// Provider rejections relay the gateway's own text untouched.
    pub fn message(&self) -> String {
        match self {
            GatewayError::Provider { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Startup connection failures
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Document store unreachable or connection string invalid
    #[error("Document store connection failed: {0}")]
    Store(String),

    /// Cache unreachable or URL invalid
    #[error("Cache connection failed: {0}")]
    Cache(String),

    /// Connection attempt exceeded its timeout
    #[error("{service} connection timed out after {after:?}")]
    Timeout {
        service: &'static str,
        after: Duration,
    },
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
