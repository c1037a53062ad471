//! Redis connector used by the cache supervisor in production.

use crate::client::CacheConnector;
use crate::config::CacheConfig;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use rental_core::ConnectionError;
use std::time::Duration;

/// Opens TLS connections to a Redis server
pub struct RedisConnector {
    client: redis::Client,
    connect_timeout: Duration,
}

impl RedisConnector {
    /// Parse the URL; no network I/O happens here.
    pub fn new(config: &CacheConfig) -> Result<Self, ConnectionError> {
        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| ConnectionError::Cache(e.to_string()))?;

        Ok(Self {
            client,
            connect_timeout: config.connect_timeout,
        })
    }
}

#[async_trait]
impl CacheConnector for RedisConnector {
    type Connection = MultiplexedConnection;

    async fn connect(&self) -> Result<MultiplexedConnection, ConnectionError> {
        let attempt = self.client.get_multiplexed_async_connection();

        match tokio::time::timeout(self.connect_timeout, attempt).await {
            Ok(Ok(connection)) => Ok(connection),
            Ok(Err(e)) => Err(ConnectionError::Cache(e.to_string())),
            Err(_) => Err(ConnectionError::Timeout {
                service: "cache",
                after: self.connect_timeout,
            }),
        }
    }

    async fn ping(&self, connection: &mut MultiplexedConnection) -> Result<(), ConnectionError> {
        let _: String = redis::cmd("PING")
            .query_async(connection)
            .await
            .map_err(|e| ConnectionError::Cache(e.to_string()))?;
        Ok(())
    }
}
