//! # Cache Client
//!
//! Keeps one connection to the cache alive for the process lifetime.
//!
//! ```text
//!            ┌──────────── probe fails ◄──────────┐
//!            ▼                                    │
//!  Closed ─► Connecting ──connect ok──► Ready ────┘
//!            ▲     │
//!            └─────┘ connect fails: sleep min(n * 50ms, 5s)
//! ```
//!
//! The supervisor is generic over [`CacheConnector`] so the reconnect logic
//! does not depend on a live server.

use crate::config::CacheConfig;
use crate::connector::RedisConnector;
use async_trait::async_trait;
use rental_core::ConnectionError;
use std::fmt;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Connection lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Connecting,
    Ready,
    Closed,
}

impl CacheState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheState::Connecting => "connecting",
            CacheState::Ready => "ready",
            CacheState::Closed => "closed",
        }
    }
}

impl fmt::Display for CacheState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opens and probes connections to a cache server.
#[async_trait]
pub trait CacheConnector: Send + Sync + 'static {
    type Connection: Send;

    /// Open one connection, honoring the connector's own timeout.
    async fn connect(&self) -> Result<Self::Connection, ConnectionError>;

    /// Keep-alive probe on an open connection.
    async fn ping(&self, connection: &mut Self::Connection) -> Result<(), ConnectionError>;
}

/// Handle to the background connection supervisor.
///
/// Dropping the handle stops the supervisor and closes the connection.
pub struct CacheClient {
    state: watch::Receiver<CacheState>,
    events: broadcast::Sender<CacheState>,
    task: JoinHandle<()>,
}

impl CacheClient {
    /// Start supervising connections made by `connector`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<C: CacheConnector>(connector: C, config: CacheConfig) -> Self {
        let (state_tx, state_rx) = watch::channel(CacheState::Closed);
        let (events, _) = broadcast::channel(16);

        let notifier = Notifier {
            state: state_tx,
            events: events.clone(),
        };
        let task = tokio::spawn(supervise(connector, config, notifier));

        Self {
            state: state_rx,
            events,
            task,
        }
    }

    /// Start a supervisor for a Redis server.
    pub fn connect_redis(config: CacheConfig) -> Result<Self, ConnectionError> {
        let connector = RedisConnector::new(&config)?;
        info!("Connecting to cache at {}", config.redacted_url());
        Ok(Self::spawn(connector, config))
    }

    /// Current lifecycle state
    pub fn state(&self) -> CacheState {
        *self.state.borrow()
    }

    /// Watch the current state
    pub fn watch(&self) -> watch::Receiver<CacheState> {
        self.state.clone()
    }

    /// Receive every transition from now on
    pub fn events(&self) -> broadcast::Receiver<CacheState> {
        self.events.subscribe()
    }
}

impl Drop for CacheClient {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct Notifier {
    state: watch::Sender<CacheState>,
    events: broadcast::Sender<CacheState>,
}

impl Notifier {
    /// Publish `next` if it differs from the current state.
    fn transition(&self, next: CacheState) {
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });

        if !changed {
            return;
        }

        match next {
            CacheState::Connecting => info!("Cache client is attempting to connect..."),
            CacheState::Ready => info!("Cache connection established successfully."),
            CacheState::Closed => warn!("Cache connection has been closed."),
        }

        // No subscribers is fine.
        let _ = self.events.send(next);
    }
}

async fn supervise<C: CacheConnector>(connector: C, config: CacheConfig, notifier: Notifier) {
    // Retries since the last successful connection; the first one is immediate.
    let mut retries: u32 = 0;

    loop {
        notifier.transition(CacheState::Connecting);

        match connector.connect().await {
            Ok(mut connection) => {
                retries = 0;
                notifier.transition(CacheState::Ready);
                keep_alive(&connector, &mut connection, config.keep_alive_interval).await;
                drop(connection);
                notifier.transition(CacheState::Closed);
            }
            Err(e) => error!("Cache connection error: {}", e),
        }

        let delay = config.reconnect.delay(retries);
        debug!(retries, ?delay, "Scheduling cache reconnect");
        retries = retries.saturating_add(1);
        tokio::time::sleep(delay).await;
    }
}

/// Probe until the connection stops answering.
async fn keep_alive<C: CacheConnector>(
    connector: &C,
    connection: &mut C::Connection,
    every: Duration,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if let Err(e) = connector.ping(connection).await {
            warn!("Cache keep-alive probe failed: {}", e);
            return;
        }
    }
}
