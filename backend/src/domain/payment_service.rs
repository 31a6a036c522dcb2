//! Idempotent payment creation.
//!
//! The service never checks for an existing row before inserting. It inserts
//! first and lets the store's unique constraint on `external_id` pick the
//! winner; losers re-read the winning row. A loser can observe the violation
//! before the winner's row is visible to its own read, so the re-read is
//! retried a bounded number of times before giving up.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error, warn};

use crate::domain::ports::{PaymentCommand, PaymentPersistenceError, PaymentRepository};
use crate::domain::{
    AmountPolicy, Error, ExternalId, NewPayment, Payment, PaymentReceipt, PaymentRequest,
    PaymentValidationError,
};

/// Bounded re-read schedule used after a uniqueness conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictRetryPolicy {
    attempts: usize,
    delay: Duration,
}

impl ConflictRetryPolicy {
    /// Default number of re-reads after a conflict.
    pub const DEFAULT_ATTEMPTS: usize = 20;
    /// Default pause between re-reads.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(25);

    /// Build a policy; at least one re-read is always performed.
    #[must_use]
    pub fn new(attempts: usize, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for ConflictRetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ATTEMPTS, Self::DEFAULT_DELAY)
    }
}

fn map_persistence_error(error: PaymentPersistenceError) -> Error {
    match error {
        PaymentPersistenceError::Connection { message } => {
            Error::store_unavailable(format!("payment store unavailable: {message}"))
        }
        PaymentPersistenceError::Query { message } => {
            Error::store_unavailable(format!("payment store error: {message}"))
        }
        PaymentPersistenceError::DuplicateExternalId { external_id } => {
            // Only inserts report duplicates; the insert path handles them.
            Error::internal(format!("unexpected duplicate for external_id {external_id}"))
        }
    }
}

fn map_validation_error(error: PaymentValidationError) -> Error {
    let (field, code) = match &error {
        PaymentValidationError::EmptyExternalId => ("external_id", "empty_external_id"),
        PaymentValidationError::ExternalIdTooLong { .. } => {
            ("external_id", "external_id_too_long")
        }
        PaymentValidationError::AmountBelowMinimum { .. } => ("amount", "amount_below_minimum"),
        PaymentValidationError::AmountAboveMaximum { .. } => ("amount", "amount_above_maximum"),
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Payment service implementing the [`PaymentCommand`] driving port.
pub struct PaymentService<R: ?Sized> {
    payment_repo: Arc<R>,
    amount_policy: AmountPolicy,
    conflict_retry: ConflictRetryPolicy,
}

impl<R: ?Sized> Clone for PaymentService<R> {
    fn clone(&self) -> Self {
        Self {
            payment_repo: Arc::clone(&self.payment_repo),
            amount_policy: self.amount_policy,
            conflict_retry: self.conflict_retry,
        }
    }
}

impl<R: ?Sized> PaymentService<R> {
    /// Create a service accepting any amount and using the default re-read
    /// schedule.
    pub fn new(payment_repo: Arc<R>) -> Self {
        Self {
            payment_repo,
            amount_policy: AmountPolicy::default(),
            conflict_retry: ConflictRetryPolicy::default(),
        }
    }

    /// Replace the amount bounds.
    #[must_use]
    pub fn with_amount_policy(mut self, amount_policy: AmountPolicy) -> Self {
        self.amount_policy = amount_policy;
        self
    }

    /// Replace the post-conflict re-read schedule.
    #[must_use]
    pub fn with_conflict_retry(mut self, conflict_retry: ConflictRetryPolicy) -> Self {
        self.conflict_retry = conflict_retry;
        self
    }
}

impl<R> PaymentService<R>
where
    R: PaymentRepository + ?Sized,
{
    async fn resolve_conflict(&self, external_id: &ExternalId) -> Result<Payment, Error> {
        let attempts = self.conflict_retry.attempts();
        for attempt in 1..=attempts {
            let existing = self
                .payment_repo
                .find_by_external_id(external_id)
                .await
                .map_err(map_persistence_error)?;

            if let Some(payment) = existing {
                return Ok(payment);
            }

            warn!(
                %external_id,
                attempt,
                attempts,
                "conflicting payment not visible yet"
            );
            if attempt < attempts {
                tokio::time::sleep(self.conflict_retry.delay()).await;
            }
        }

        error!(
            %external_id,
            attempts,
            "uniqueness conflict reported but no payment row found"
        );
        Err(Error::conflict_resolution_failed(format!(
            "payment for external_id {external_id} could not be resolved after conflict"
        )))
    }
}

#[async_trait]
impl<R> PaymentCommand for PaymentService<R>
where
    R: PaymentRepository + ?Sized,
{
    async fn create_payment(&self, request: PaymentRequest) -> Result<PaymentReceipt, Error> {
        let external_id = ExternalId::new(request.external_id).map_err(map_validation_error)?;
        let amount = self
            .amount_policy
            .check(request.amount)
            .map_err(map_validation_error)?;
        let new_payment = NewPayment::new(external_id, amount);

        match self.payment_repo.insert(&new_payment).await {
            Ok(payment) => {
                debug!(
                    payment_id = %payment.id(),
                    external_id = %payment.external_id(),
                    "payment created"
                );
                Ok(PaymentReceipt::created(payment))
            }
            Err(PaymentPersistenceError::DuplicateExternalId { .. }) => {
                let payment = self.resolve_conflict(new_payment.external_id()).await?;
                debug!(
                    payment_id = %payment.id(),
                    external_id = %payment.external_id(),
                    "payment already exists; returning stored row"
                );
                Ok(PaymentReceipt::already_exists(payment))
            }
            Err(err) => Err(map_persistence_error(err)),
        }
    }
}

#[cfg(test)]
#[path = "payment_service_tests.rs"]
mod tests;
