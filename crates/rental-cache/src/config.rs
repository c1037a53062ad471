//! # Cache Configuration
//!
//! Connection settings for the managed cache. The transport is always TLS:
//! plain `redis://` URLs are upgraded to `rediss://`.

use std::time::Duration;

/// Per-attempt connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// Interval between keep-alive probes on an established connection
pub const DEFAULT_KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(5);

/// Linear reconnect backoff with a ceiling.
///
/// The delay before retry `n` is `min(n * step, max_delay)`, with `n` counted
/// from 0 since the last successful connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub step: Duration,
    pub max_delay: Duration,
}

impl ReconnectPolicy {
    pub fn delay(&self, retries: u32) -> Duration {
        self.step.saturating_mul(retries).min(self.max_delay)
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            step: Duration::from_millis(50),
            max_delay: Duration::from_millis(5000),
        }
    }
}

/// Cache connection settings
#[derive(Clone)]
pub struct CacheConfig {
    /// Connection URL, always `rediss://`
    pub url: String,
    pub connect_timeout: Duration,
    pub keep_alive_interval: Duration,
    pub reconnect: ReconnectPolicy,
}

impl CacheConfig {
    pub fn new(url: &str) -> Self {
        Self {
            url: secure_url(url),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            keep_alive_interval: DEFAULT_KEEP_ALIVE_INTERVAL,
            reconnect: ReconnectPolicy::default(),
        }
    }

    /// URL with credentials masked, for logs
    pub fn redacted_url(&self) -> String {
        redact_credentials(&self.url)
    }
}

impl std::fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheConfig")
            .field("url", &self.redacted_url())
            .field("connect_timeout", &self.connect_timeout)
            .field("keep_alive_interval", &self.keep_alive_interval)
            .field("reconnect", &self.reconnect)
            .finish()
    }
}

/// Force the TLS scheme.
pub fn secure_url(url: &str) -> String {
    let url = url.trim();
    if let Some(rest) = url.strip_prefix("redis://") {
        format!("rediss://{}", rest)
    } else if url.contains("://") {
        url.to_string()
    } else {
        format!("rediss://{}", url)
    }
}

fn redact_credentials(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let authority_start = scheme_end + 3;
    match url[authority_start..].find('@') {
        Some(at) => format!(
            "{}***{}",
            &url[..authority_start],
            &url[authority_start + at..]
        ),
        None => url.to_string(),
    }
}
