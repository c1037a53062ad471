//! # Altoev Rental API
//!
//! Vehicle rental backend: vehicles, reservations and payments.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables (or put them in .env)
//! export AZURE_COSMOS_CONNECTIONSTRING=mongodb://...
//! export AZURE_REDIS_CONNECTIONSTRING=rediss://:<key>@<host>:6380
//! export STRIPE_SECRET_KEY=sk_test_...
//!
//! # Run the server
//! altoev-rental
//! ```

use rental_api::{routes, state::AppConfig, AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    // Initialize logging
    init_tracing(config.json_logs);

    // Print banner
    print_banner();

    let addr = config.socket_addr()?;
    let is_prod = config.is_production();

    info!("Environment: {}", config.environment);

    // Connect collaborators (store and cache finish in the background)
    let state = AppState::start(config);

    // Create router
    let app = routes::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server is running on port {}", addr.port());

    if !is_prod {
        info!("🚗 Vehicles: GET|POST http://{}/api/vehicles", addr);
        info!("📅 Reservations: GET|POST http://{}/api/reservations", addr);
        info!("💳 Payment: POST http://{}/api/payment", addr);
    }

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

fn print_banner() {
    println!(
        r#"
  🚗 Altoev Rental API
  ━━━━━━━━━━━━━━━━━━━━━━━
  Vehicles · Reservations · Payments
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
