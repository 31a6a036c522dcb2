//! Bounded startup connection retry.
//!
//! The database may still be starting when the service boots, so the first
//! pool build is retried a fixed number of times with a fixed delay. Once the
//! attempts run out the caller gets [`ConnectError::Exhausted`] and is
//! expected to abort startup.

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use super::pool::{DbPool, PoolConfig, PoolError};

/// Fixed-delay schedule for establishing the initial store connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectRetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl ConnectRetryPolicy {
    pub const DEFAULT_ATTEMPTS: u32 = 20;
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

    /// Build a policy; at least one attempt is always made.
    #[must_use]
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for ConnectRetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ATTEMPTS, Self::DEFAULT_DELAY)
    }
}

/// Startup connection failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    #[error("database unreachable after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: PoolError },
}

/// Run `connect` until it succeeds or the policy's attempts are used up,
/// sleeping for the policy's delay between failures.
///
/// # Errors
///
/// Returns [`ConnectError::Exhausted`] carrying the last failure when no
/// attempt succeeds.
pub async fn retry_connect<T, F, Fut>(
    policy: ConnectRetryPolicy,
    mut connect: F,
) -> Result<T, ConnectError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PoolError>>,
{
    let attempts = policy.attempts();
    let mut attempt = 1;
    loop {
        match connect().await {
            Ok(value) => {
                info!(attempt, "database connection established");
                return Ok(value);
            }
            Err(err) if attempt >= attempts => {
                return Err(ConnectError::Exhausted {
                    attempts,
                    last_error: err,
                });
            }
            Err(err) => {
                warn!(
                    attempt,
                    attempts,
                    delay_ms = u64::try_from(policy.delay().as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "database not ready; retrying"
                );
                tokio::time::sleep(policy.delay()).await;
                attempt += 1;
            }
        }
    }
}

/// Build a pool and verify it answers `SELECT 1`, retrying per `policy`.
///
/// # Errors
///
/// Returns [`ConnectError::Exhausted`] when the database never becomes
/// reachable.
pub async fn connect_with_retry(
    config: PoolConfig,
    policy: ConnectRetryPolicy,
) -> Result<DbPool, ConnectError> {
    retry_connect(policy, || {
        let config = config.clone();
        async move {
            let pool = DbPool::new(config).await?;
            pool.ping().await?;
            Ok(pool)
        }
    })
    .await
}
