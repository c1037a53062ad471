//! # Application State
//!
//! Shared state for the Axum application: configuration plus the document
//! store, payment gateway and cache handles. Every collaborator is optional at
//! runtime; a missing one degrades its routes instead of stopping the process.

use rental_cache::{CacheClient, CacheConfig};
use rental_core::{
    BoxedDocumentStore, BoxedPaymentGateway, GatewayError, GatewayResult, InMemoryStore,
    PaymentGateway, StoreError, StoreResult,
};
use rental_mongo::{MongoStore, DATABASE_NAME};
use rental_stripe::{StripeChargeGateway, StripeConfig};
use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Which document store backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// MongoDB / Cosmos DB from `AZURE_COSMOS_CONNECTIONSTRING`
    #[default]
    Mongo,
    /// Process-local store, lost on restart
    Memory,
}

impl StoreBackend {
    /// Parse `DOCUMENT_STORE`; anything other than `memory` selects MongoDB.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("memory") {
            StoreBackend::Memory
        } else {
            StoreBackend::Mongo
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Document store selection
    pub store_backend: StoreBackend,
    /// Document store connection string
    pub mongo_uri: Option<String>,
    /// Database holding the rental collections
    pub database_name: String,
    /// Payment gateway secret key
    pub stripe_secret_key: Option<String>,
    /// Payment gateway endpoint override (stripe-mock, proxies)
    pub stripe_api_base_url: Option<String>,
    /// Cache connection string
    pub redis_url: Option<String>,
    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl AppConfig {
    /// Load from environment variables (and `.env` if present)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Self {
            host: env_var("HOST").unwrap_or(defaults.host),
            port: env_var("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            environment: env_var("ENVIRONMENT").unwrap_or(defaults.environment),
            store_backend: env_var("DOCUMENT_STORE")
                .map(|name| StoreBackend::from_name(&name))
                .unwrap_or_default(),
            mongo_uri: env_var("AZURE_COSMOS_CONNECTIONSTRING"),
            database_name: defaults.database_name,
            stripe_secret_key: env_var("STRIPE_SECRET_KEY"),
            stripe_api_base_url: env_var("STRIPE_API_BASE_URL"),
            redis_url: env_var("AZURE_REDIS_CONNECTIONSTRING"),
            json_logs: env_var("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: "development".to_string(),
            store_backend: StoreBackend::Mongo,
            mongo_uri: None,
            database_name: DATABASE_NAME.to_string(),
            stripe_secret_key: None,
            stripe_api_base_url: None,
            redis_url: None,
            json_logs: false,
        }
    }
}

/// Unset and blank variables are treated the same.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Write-once slot for the document store handle.
///
/// Starts empty and is filled by the background connection task. Requests
/// that arrive while it is empty fail with `StoreError::NotConnected`.
#[derive(Clone, Default)]
pub struct StoreSlot(Arc<OnceLock<BoxedDocumentStore>>);

impl StoreSlot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Install the store. Returns false if one was already installed.
    pub fn install(&self, store: BoxedDocumentStore) -> bool {
        self.0.set(store).is_ok()
    }

    pub fn get(&self) -> StoreResult<&BoxedDocumentStore> {
        self.0.get().ok_or(StoreError::NotConnected)
    }

    pub fn is_connected(&self) -> bool {
        self.0.get().is_some()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Document store handle (filled once connected)
    pub store: StoreSlot,
    /// Payment gateway, absent when no valid secret key was supplied
    pub gateway: Option<BoxedPaymentGateway>,
    /// Cache connection, absent when no connection string was supplied
    pub cache: Option<Arc<CacheClient>>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a state with no collaborators attached
    pub fn new(config: AppConfig) -> Self {
        Self {
            store: StoreSlot::empty(),
            gateway: None,
            cache: None,
            config,
        }
    }

    /// Build every collaborator the config names.
    ///
    /// The gateway is created synchronously; the cache supervisor and the
    /// document store connection run in the background so the server can
    /// start listening immediately. Must be called inside a tokio runtime.
    pub fn start(config: AppConfig) -> Self {
        let mut state = Self::new(config);
        state.gateway = build_gateway(&state.config);
        state.cache = start_cache(&state.config).map(Arc::new);
        match state.config.store_backend {
            StoreBackend::Memory => {
                warn!("Using the in-memory document store, data is lost on restart");
                state.store.install(Arc::new(InMemoryStore::new()));
            }
            StoreBackend::Mongo => {
                spawn_store_connection(&state.config, state.store.clone());
            }
        }
        state
    }

    /// Builder: attach an already connected store
    pub fn with_store(self, store: BoxedDocumentStore) -> Self {
        self.store.install(store);
        self
    }

    /// Builder: attach a payment gateway
    pub fn with_gateway(mut self, gateway: BoxedPaymentGateway) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Builder: attach a cache client
    pub fn with_cache(mut self, cache: CacheClient) -> Self {
        self.cache = Some(Arc::new(cache));
        self
    }

    /// Get the payment gateway
    pub fn gateway(&self) -> GatewayResult<&BoxedPaymentGateway> {
        self.gateway.as_ref().ok_or(GatewayError::NotConfigured)
    }
}

fn build_gateway(config: &AppConfig) -> Option<BoxedPaymentGateway> {
    let Some(secret_key) = config.stripe_secret_key.as_deref() else {
        warn!("STRIPE_SECRET_KEY not set, payments are disabled");
        return None;
    };

    let mut stripe = match StripeConfig::from_secret_key(secret_key) {
        Ok(stripe) => stripe,
        Err(e) => {
            error!("Invalid Stripe configuration, payments are disabled: {}", e);
            return None;
        }
    };

    if let Some(base_url) = &config.stripe_api_base_url {
        stripe = stripe.with_api_base_url(base_url);
    }

    match StripeChargeGateway::new(stripe) {
        Ok(gateway) => {
            info!(
                "Payment gateway ready: provider={}, test_mode={}",
                gateway.provider_name(),
                gateway.config().is_test_mode()
            );
            Some(Arc::new(gateway) as BoxedPaymentGateway)
        }
        Err(e) => {
            error!("Failed to initialize Stripe: {}", e);
            None
        }
    }
}

fn start_cache(config: &AppConfig) -> Option<CacheClient> {
    let Some(url) = config.redis_url.as_deref() else {
        warn!("AZURE_REDIS_CONNECTIONSTRING not set, cache is disabled");
        return None;
    };

    match CacheClient::connect_redis(CacheConfig::new(url)) {
        Ok(cache) => Some(cache),
        Err(e) => {
            error!("Redis connection error: {}", e);
            None
        }
    }
}

/// Connect to the document store in the background and fill `slot` on
/// success. Failures are logged and leave the slot empty.
pub fn spawn_store_connection(config: &AppConfig, slot: StoreSlot) -> Option<JoinHandle<()>> {
    let Some(uri) = config.mongo_uri.clone() else {
        warn!("AZURE_COSMOS_CONNECTIONSTRING not set, document store is disabled");
        return None;
    };
    let database = config.database_name.clone();

    Some(tokio::spawn(async move {
        match MongoStore::connect(&uri, &database).await {
            Ok(store) => {
                slot.install(Arc::new(store));
                info!("Connected to document store, database={}", database);
            }
            Err(e) => error!("Error connecting to document store: {}", e),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rental_core::InMemoryStore;

    #[test]
    fn test_app_config_defaults() {
        // Clear env vars for test
        for name in [
            "HOST",
            "PORT",
            "ENVIRONMENT",
            "AZURE_COSMOS_CONNECTIONSTRING",
            "DOCUMENT_STORE",
            "STRIPE_SECRET_KEY",
            "AZURE_REDIS_CONNECTIONSTRING",
            "LOG_FORMAT",
        ] {
            std::env::remove_var(name);
        }

        let config = AppConfig::from_env();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_name, "altoevRentalDB");
        assert_eq!(config.store_backend, StoreBackend::Mongo);
        assert!(!config.is_production());
        assert!(!config.json_logs);
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..AppConfig::default()
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:3000");

        let config = AppConfig {
            host: "::".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "[::]:8080");

        let config = AppConfig {
            host: "localhost:8080".to_string(),
            ..AppConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_store_slot_is_write_once() {
        let slot = StoreSlot::empty();
        assert!(matches!(slot.get(), Err(StoreError::NotConnected)));

        assert!(slot.install(Arc::new(InMemoryStore::new())));
        assert!(!slot.install(Arc::new(InMemoryStore::new())));
        assert!(slot.is_connected());
        assert_eq!(slot.get().unwrap().backend_name(), "memory");
    }

    #[test]
    fn test_clones_share_the_slot() {
        let state = AppState::new(AppConfig::default());
        let clone = state.clone();

        state.store.install(Arc::new(InMemoryStore::new()));
        assert!(clone.store.is_connected());
    }

    #[tokio::test]
    async fn test_start_without_settings_degrades() {
        let state = AppState::start(AppConfig::default());
        assert!(state.gateway.is_none());
        assert!(state.cache.is_none());
        assert!(!state.store.is_connected());
        assert!(matches!(state.gateway(), Err(GatewayError::NotConfigured)));
    }

    #[test]
    fn test_store_backend_names() {
        assert_eq!(StoreBackend::from_name("memory"), StoreBackend::Memory);
        assert_eq!(StoreBackend::from_name(" Memory "), StoreBackend::Memory);
        assert_eq!(StoreBackend::from_name("mongo"), StoreBackend::Mongo);
        assert_eq!(StoreBackend::from_name("cosmos"), StoreBackend::Mongo);
    }

    #[tokio::test]
    async fn test_start_with_memory_store_is_connected() {
        let config = AppConfig {
            store_backend: StoreBackend::Memory,
            ..AppConfig::default()
        };
        let state = AppState::start(config);
        assert!(state.store.is_connected());
        assert_eq!(state.store.get().unwrap().backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_start_rejects_malformed_stripe_key() {
        let config = AppConfig {
            stripe_secret_key: Some("pk_test_publishable".to_string()),
            ..AppConfig::default()
        };
        assert!(AppState::start(config).gateway.is_none());

        let config = AppConfig {
            stripe_secret_key: Some("sk_test_abc".to_string()),
            ..AppConfig::default()
        };
        assert!(AppState::start(config).gateway.is_some());
    }

    #[tokio::test]
    async fn test_failed_store_connection_leaves_slot_empty() {
        let config = AppConfig {
            mongo_uri: Some("not-a-connection-string".to_string()),
            ..AppConfig::default()
        };
        let slot = StoreSlot::empty();

        spawn_store_connection(&config, slot.clone())
            .unwrap()
            .await
            .unwrap();
        assert!(!slot.is_connected());
    }
}
