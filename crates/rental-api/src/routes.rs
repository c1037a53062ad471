//! # Routes
//!
//! Axum router configuration for the rental API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Vehicles:
///   - GET  /api/vehicles - List all vehicles
///   - POST /api/vehicles - Add a vehicle
///
/// - Reservations:
///   - GET  /api/reservations - List all reservations
///   - POST /api/reservations - Create a reservation
///
/// - Payments:
///   - POST /api/payment - Charge a tokenized payment source
///
/// - Health:
///   - GET /health, GET / - Service and collaborator status
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/vehicles",
            get(handlers::list_vehicles).post(handlers::create_vehicle),
        )
        .route(
            "/reservations",
            get(handlers::list_reservations).post(handlers::create_reservation),
        )
        .route("/payment", post(handlers::create_payment));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api", api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
