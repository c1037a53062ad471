//! # rental-cache
//!
//! Persistent connection to the managed cache.
//!
//! Nothing reads from or writes to the cache yet; the client only keeps a
//! TLS connection open, probes it every 5 seconds, reconnects with a capped
//! linear backoff, and reports lifecycle transitions.
//!
//! ```rust,ignore
//! use rental_cache::{CacheClient, CacheConfig};
//!
//! let cache = CacheClient::connect_redis(CacheConfig::new(&url))?;
//! let mut events = cache.events();
//! while let Ok(state) = events.recv().await {
//!     println!("cache is {}", state);
//! }
//! ```

pub mod client;
pub mod config;
pub mod connector;

pub use client::{CacheClient, CacheConnector, CacheState};
pub use config::{CacheConfig, ReconnectPolicy};
pub use connector::RedisConnector;
