//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `PAYMENTS_*` environment variables and an
//! optional configuration file. Every field is optional; accessors apply the
//! documented fallbacks.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{AmountPolicy, ConflictRetryPolicy};
use crate::outbound::persistence::{ConnectRetryPolicy, PoolConfig};

const DEFAULT_DATABASE_URL: &str = "postgres://appuser:apppass@db:5432/appdb";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;
const DEFAULT_DB_CONNECT_DELAY_MS: u64 = 2_000;
const DEFAULT_CONFLICT_REREAD_DELAY_MS: u64 = 25;

/// Runtime settings for the payments service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PAYMENTS")]
pub struct AppSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// Startup connection attempts before giving up.
    pub db_connect_attempts: Option<u32>,
    /// Pause between startup connection attempts, in milliseconds.
    pub db_connect_delay_ms: Option<u64>,
    /// Maximum pooled connections.
    pub pool_max_size: Option<u32>,
    /// Pool checkout timeout, in seconds.
    pub pool_connection_timeout_secs: Option<u64>,
    /// Grace period for in-flight requests on shutdown, in seconds.
    pub shutdown_timeout_secs: Option<u64>,
    /// Re-reads performed after a payment uniqueness conflict.
    pub conflict_reread_attempts: Option<usize>,
    /// Pause between conflict re-reads, in milliseconds.
    pub conflict_reread_delay_ms: Option<u64>,
    /// Smallest accepted payment amount (inclusive).
    pub min_amount: Option<i64>,
    /// Largest accepted payment amount (inclusive).
    pub max_amount: Option<i64>,
}

impl AppSettings {
    pub fn database_url(&self) -> &str {
        self.database_url.as_deref().unwrap_or(DEFAULT_DATABASE_URL)
    }

    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Pool settings derived from the database fields.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.database_url())
            .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE))
            .with_connection_timeout(Duration::from_secs(
                self.pool_connection_timeout_secs
                    .unwrap_or(DEFAULT_POOL_CONNECTION_TIMEOUT_SECS),
            ))
    }

    pub fn connect_retry(&self) -> ConnectRetryPolicy {
        ConnectRetryPolicy::new(
            self.db_connect_attempts
                .unwrap_or(ConnectRetryPolicy::DEFAULT_ATTEMPTS),
            Duration::from_millis(
                self.db_connect_delay_ms
                    .unwrap_or(DEFAULT_DB_CONNECT_DELAY_MS),
            ),
        )
    }

    pub fn conflict_retry(&self) -> ConflictRetryPolicy {
        ConflictRetryPolicy::new(
            self.conflict_reread_attempts
                .unwrap_or(ConflictRetryPolicy::DEFAULT_ATTEMPTS),
            Duration::from_millis(
                self.conflict_reread_delay_ms
                    .unwrap_or(DEFAULT_CONFLICT_REREAD_DELAY_MS),
            ),
        )
    }

    pub fn amount_policy(&self) -> AmountPolicy {
        AmountPolicy::new(self.min_amount, self.max_amount)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(
            self.shutdown_timeout_secs
                .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration parsing and fallbacks.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 11] = [
        "PAYMENTS_DATABASE_URL",
        "PAYMENTS_BIND_ADDR",
        "PAYMENTS_DB_CONNECT_ATTEMPTS",
        "PAYMENTS_DB_CONNECT_DELAY_MS",
        "PAYMENTS_POOL_MAX_SIZE",
        "PAYMENTS_POOL_CONNECTION_TIMEOUT_SECS",
        "PAYMENTS_SHUTDOWN_TIMEOUT_SECS",
        "PAYMENTS_CONFLICT_REREAD_ATTEMPTS",
        "PAYMENTS_CONFLICT_REREAD_DELAY_MS",
        "PAYMENTS_MIN_AMOUNT",
        "PAYMENTS_MAX_AMOUNT",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("payments-api")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(settings.database_url(), DEFAULT_DATABASE_URL);
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080");
        assert_eq!(settings.connect_retry(), ConnectRetryPolicy::default());
        assert_eq!(settings.conflict_retry(), ConflictRetryPolicy::default());
        assert_eq!(settings.amount_policy(), AmountPolicy::default());
        assert_eq!(settings.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(settings.pool_config().max_size(), 10);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut vars = VARS.map(|name| (name, None::<String>));
        for (name, value) in [
            ("PAYMENTS_DATABASE_URL", "postgres://u:p@localhost:5432/pay"),
            ("PAYMENTS_BIND_ADDR", "127.0.0.1:9090"),
            ("PAYMENTS_DB_CONNECT_ATTEMPTS", "3"),
            ("PAYMENTS_DB_CONNECT_DELAY_MS", "10"),
            ("PAYMENTS_CONFLICT_REREAD_ATTEMPTS", "7"),
            ("PAYMENTS_MIN_AMOUNT", "1"),
            ("PAYMENTS_SHUTDOWN_TIMEOUT_SECS", "30"),
        ] {
            if let Some(slot) = vars.iter_mut().find(|(var, _)| *var == name) {
                slot.1 = Some(value.to_owned());
            }
        }
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();

        assert_eq!(settings.database_url(), "postgres://u:p@localhost:5432/pay");
        assert_eq!(settings.bind_addr(), "127.0.0.1:9090");
        assert_eq!(
            settings.connect_retry(),
            ConnectRetryPolicy::new(3, Duration::from_millis(10))
        );
        assert_eq!(settings.conflict_retry().attempts(), 7);
        assert_eq!(settings.amount_policy(), AmountPolicy::new(Some(1), None));
        assert_eq!(settings.shutdown_timeout(), Duration::from_secs(30));
    }
}
