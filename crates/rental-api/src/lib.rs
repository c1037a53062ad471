//! # rental-api
//!
//! HTTP API layer for the altoev rental backend.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for vehicles and reservations
//! - A passthrough payment endpoint
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/vehicles` | List vehicles |
//! | POST | `/api/vehicles` | Add vehicle |
//! | GET | `/api/reservations` | List reservations |
//! | POST | `/api/reservations` | Create reservation |
//! | POST | `/api/payment` | Create charge |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, StoreBackend, StoreSlot};
