//! # Stripe Configuration
//!
//! Configuration for the Stripe integration. Only the secret key is required;
//! the API base URL can be pointed at stripe-mock or a test double.

use rental_core::GatewayError;

/// Default Stripe API endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Pinned Stripe API version
pub const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Stripe API configuration
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_..., sk_live_..., or a restricted rk_ key)
    pub secret_key: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,
}

impl StripeConfig {
    /// Create config with the default endpoint and API version
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Create config from a secret key, rejecting keys Stripe would never accept.
    pub fn from_secret_key(secret_key: impl Into<String>) -> Result<Self, GatewayError> {
        let config = Self::new(secret_key);
        config.validate()?;
        Ok(config)
    }

    /// Check the key format
    pub fn validate(&self) -> Result<(), GatewayError> {
        const PREFIXES: [&str; 4] = ["sk_test_", "sk_live_", "rk_test_", "rk_live_"];

        if self.secret_key.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "STRIPE_SECRET_KEY is empty".to_string(),
            ));
        }

        if !PREFIXES.iter().any(|p| self.secret_key.starts_with(p)) {
            return Err(GatewayError::InvalidRequest(
                "STRIPE_SECRET_KEY must start with sk_test_, sk_live_, rk_test_ or rk_live_"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_") || self.secret_key.starts_with("rk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

// Keep the secret out of logs.
impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .finish()
    }
}
