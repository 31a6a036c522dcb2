//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use payments_api::domain::{AmountPolicy, ConflictRetryPolicy};
use payments_api::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) amount_policy: AmountPolicy,
    pub(crate) conflict_retry: ConflictRetryPolicy,
    pub(crate) shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Construct a server configuration around a connected pool.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            db_pool,
            amount_policy: AmountPolicy::default(),
            conflict_retry: ConflictRetryPolicy::default(),
            shutdown_timeout: Duration::from_secs(5),
        }
    }

    #[must_use]
    pub fn with_amount_policy(mut self, amount_policy: AmountPolicy) -> Self {
        self.amount_policy = amount_policy;
        self
    }

    #[must_use]
    pub fn with_conflict_retry(mut self, conflict_retry: ConflictRetryPolicy) -> Self {
        self.conflict_retry = conflict_retry;
        self
    }

    /// Grace period Actix workers get to finish in-flight requests.
    #[must_use]
    pub fn with_shutdown_timeout(mut self, shutdown_timeout: Duration) -> Self {
        self.shutdown_timeout = shutdown_timeout;
        self
    }
}
