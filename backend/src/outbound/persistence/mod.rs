//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: database failures map to the port error enums.
//!
//! # Example
//!
//! ```no_run
//! use payments_api::outbound::persistence::{
//!     ConnectRetryPolicy, DieselPaymentRepository, PoolConfig, connect_with_retry,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PoolConfig::new("postgres://appuser:apppass@db:5432/appdb");
//! let pool = connect_with_retry(config, ConnectRetryPolicy::default()).await?;
//! let payments = DieselPaymentRepository::new(pool);
//! # let _ = payments;
//! # Ok(())
//! # }
//! ```

mod connect;
mod diesel_basic_error_mapping;
mod diesel_payment_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use connect::{ConnectError, ConnectRetryPolicy, connect_with_retry, retry_connect};
pub use diesel_payment_repository::DieselPaymentRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
