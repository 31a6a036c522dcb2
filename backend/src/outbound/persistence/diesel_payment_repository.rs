//! PostgreSQL-backed `PaymentRepository` implementation using Diesel ORM.
//!
//! Inserts rely on the `payments_external_id_key` unique constraint: a
//! violation of that constraint is reported as
//! [`PaymentPersistenceError::DuplicateExternalId`] so the domain can resolve
//! the conflict by re-reading the winning row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PaymentPersistenceError, PaymentRepository};
use crate::domain::{ExternalId, NewPayment, Payment, PaymentId, PaymentStatus};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewPaymentRow, PaymentRow};
use super::pool::{DbPool, PoolError};
use super::schema::payments;

/// Name of the unique constraint guarding `payments.external_id`.
pub(crate) const EXTERNAL_ID_CONSTRAINT: &str = "payments_external_id_key";

/// Diesel-backed implementation of the `PaymentRepository` port.
#[derive(Clone)]
pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PaymentPersistenceError {
    map_basic_pool_error(error, PaymentPersistenceError::connection)
}

fn map_diesel_error(error: DieselError) -> PaymentPersistenceError {
    map_basic_diesel_error(
        error,
        PaymentPersistenceError::query,
        PaymentPersistenceError::connection,
    )
}

/// Map insert failures, singling out violations of the external id
/// constraint. Unique violations without a constraint name are treated as
/// external id conflicts since it is the table's only unique key besides the
/// sequence-backed primary key.
fn map_insert_error(error: DieselError, external_id: &ExternalId) -> PaymentPersistenceError {
    match &error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if info
                .constraint_name()
                .is_none_or(|name| name == EXTERNAL_ID_CONSTRAINT) =>
        {
            PaymentPersistenceError::duplicate_external_id(external_id.as_str())
        }
        _ => map_diesel_error(error),
    }
}

fn row_to_payment(row: PaymentRow) -> Result<Payment, PaymentPersistenceError> {
    let external_id = ExternalId::new(row.external_id).map_err(|err| {
        PaymentPersistenceError::query(format!("invalid external_id in database: {err}"))
    })?;
    let status = row.status.parse::<PaymentStatus>().map_err(|err| {
        PaymentPersistenceError::query(format!("invalid status in database: {err}"))
    })?;
    Ok(Payment::new(
        PaymentId::new(row.id),
        external_id,
        row.amount,
        status,
    ))
}

#[async_trait]
impl PaymentRepository for DieselPaymentRepository {
    async fn insert(&self, payment: &NewPayment) -> Result<Payment, PaymentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewPaymentRow {
            external_id: payment.external_id().as_str(),
            amount: payment.amount(),
            status: payment.status().as_str(),
        };

        let row = diesel::insert_into(payments::table)
            .values(&new_row)
            .returning(PaymentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, payment.external_id()))?;

        row_to_payment(row)
    }

    async fn find_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<Option<Payment>, PaymentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<PaymentRow> = payments::table
            .filter(payments::external_id.eq(external_id.as_str()))
            .select(PaymentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_payment).transpose()
    }
}
