//! In-memory adapters for tests.
//!
//! These repositories honour the same contract as the Diesel adapters: the
//! payment store rejects a second row for an external id with
//! [`PaymentPersistenceError::DuplicateExternalId`], and identifiers are
//! assigned sequentially from 1. Enable the `test-support` feature to use
//! them from integration tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    PaymentPersistenceError, PaymentRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{ExternalId, NewPayment, NewUser, Payment, PaymentId, User, UserId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|err| err.into_inner())
}

/// Payment repository backed by a vector guarded by a mutex.
#[derive(Debug, Default)]
pub struct InMemoryPaymentRepository {
    rows: Mutex<Vec<Payment>>,
}

impl InMemoryPaymentRepository {
    /// Insert a row directly, bypassing the uniqueness check.
    pub fn seed(&self, payment: NewPayment) -> Payment {
        let mut rows = lock(&self.rows);
        let stored = payment.into_payment(next_payment_id(&rows));
        rows.push(stored.clone());
        stored
    }

    /// Number of rows stored for an external identifier.
    pub fn count_for(&self, external_id: &str) -> usize {
        lock(&self.rows)
            .iter()
            .filter(|row| row.external_id().as_str() == external_id)
            .count()
    }

    pub fn len(&self) -> usize {
        lock(&self.rows).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.rows).is_empty()
    }
}

fn next_payment_id(rows: &[Payment]) -> PaymentId {
    let next = rows.iter().map(|row| row.id().get()).max().unwrap_or(0) + 1;
    PaymentId::new(next)
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn insert(&self, payment: &NewPayment) -> Result<Payment, PaymentPersistenceError> {
        // Give concurrent callers a chance to interleave before the commit.
        tokio::task::yield_now().await;

        let mut rows = lock(&self.rows);
        if rows
            .iter()
            .any(|row| row.external_id() == payment.external_id())
        {
            return Err(PaymentPersistenceError::duplicate_external_id(
                payment.external_id().to_string(),
            ));
        }
        let stored = payment.clone().into_payment(next_payment_id(&rows));
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<Option<Payment>, PaymentPersistenceError> {
        Ok(lock(&self.rows)
            .iter()
            .find(|row| row.external_id() == external_id)
            .cloned())
    }
}

/// User repository backed by a vector guarded by a mutex.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut rows = lock(&self.rows);
        let next = i64::try_from(rows.len())
            .map_err(|err| UserPersistenceError::query(err.to_string()))?
            + 1;
        let stored = user.clone().into_user(UserId::new(next));
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(lock(&self.rows).clone())
    }
}

/// Repository whose every call fails as if the database were down.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

#[async_trait]
impl PaymentRepository for UnavailableStore {
    async fn insert(&self, _payment: &NewPayment) -> Result<Payment, PaymentPersistenceError> {
        Err(PaymentPersistenceError::connection("database unavailable"))
    }

    async fn find_by_external_id(
        &self,
        _external_id: &ExternalId,
    ) -> Result<Option<Payment>, PaymentPersistenceError> {
        Err(PaymentPersistenceError::connection("database unavailable"))
    }
}

#[async_trait]
impl UserRepository for UnavailableStore {
    async fn insert(&self, _user: &NewUser) -> Result<User, UserPersistenceError> {
        Err(UserPersistenceError::connection("database unavailable"))
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Err(UserPersistenceError::connection("database unavailable"))
    }
}
