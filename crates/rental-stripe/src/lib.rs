//! # rental-stripe
//!
//! Stripe payment gateway for the altoev rental backend.
//!
//! Provides **StripeChargeGateway**, an implementation of
//! `rental_core::PaymentGateway` on top of the Charges API. A charge is
//! created from a tokenized payment source (`tok_...`, `src_...`, `card_...`).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rental_core::{ChargeRequest, PaymentGateway};
//! use rental_stripe::{StripeChargeGateway, StripeConfig};
//!
//! let gateway = StripeChargeGateway::new(StripeConfig::from_secret_key("sk_test_...")?)?;
//!
//! let charge = gateway
//!     .create_charge(&ChargeRequest::new(500, "usd", "tok_visa"))
//!     .await?;
//! ```

pub mod charges;
pub mod config;

// Re-exports
pub use charges::StripeChargeGateway;
pub use config::StripeConfig;
