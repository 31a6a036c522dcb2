//! Port abstraction for payment persistence.
//!
//! The store owns the uniqueness of `external_id`. Adapters must report a
//! violation of that constraint as [`PaymentPersistenceError::DuplicateExternalId`]
//! and every other failure as `Connection` or `Query`, so the payment service
//! can tell a lost race apart from an outage.

use async_trait::async_trait;

use crate::domain::{ExternalId, NewPayment, Payment};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment repository adapters.
    pub enum PaymentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "payment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "payment repository query failed: {message}",
        /// A payment with the same external identifier already exists.
        DuplicateExternalId { external_id: String } => "payment already exists for external_id {external_id}",
    }
}

/// Port for payment storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert a new payment and return the stored row.
    ///
    /// Must fail with [`PaymentPersistenceError::DuplicateExternalId`] when a
    /// row with the same external identifier exists, including rows committed
    /// by concurrent callers.
    async fn insert(&self, payment: &NewPayment) -> Result<Payment, PaymentPersistenceError>;

    /// Fetch the payment recorded for an external identifier.
    async fn find_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<Option<Payment>, PaymentPersistenceError>;
}
