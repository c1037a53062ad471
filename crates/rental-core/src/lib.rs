//! # rental-core
//!
//! Core types and traits for the altoev rental backend.
//!
//! This crate provides:
//! - `DocumentStore` trait for document databases
//! - `PaymentGateway` trait for payment providers
//! - `Document` and `Collection` for the schema-less data model
//! - `InMemoryStore` for tests and local runs
//! - `StoreError`, `GatewayError` and `ConnectionError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use rental_core::{Collection, DocumentStore, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! let id = store.insert_one(Collection::Vehicles, vehicle).await?;
//! let vehicles = store.list_all(Collection::Vehicles).await?;
//! ```

pub mod document;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod store;

// Re-exports for convenience
pub use document::{Collection, Document, ID_FIELD};
pub use error::{ConnectionError, GatewayError, GatewayResult, StoreError, StoreResult};
pub use gateway::{BoxedPaymentGateway, Charge, ChargeRequest, PaymentGateway};
pub use memory::InMemoryStore;
pub use store::{BoxedDocumentStore, DocumentStore};
