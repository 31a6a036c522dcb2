//! Driving port for idempotent payment creation.
//!
//! Inbound adapters hand raw request fields to this port; validation,
//! persistence and conflict resolution all happen behind it.

use async_trait::async_trait;

use crate::domain::{Error, PaymentReceipt, PaymentRequest};

/// Domain use-case port for creating payments.
#[async_trait]
pub trait PaymentCommand: Send + Sync {
    /// Create the payment for `request.external_id`, or return the one that
    /// already exists for it.
    async fn create_payment(&self, request: PaymentRequest) -> Result<PaymentReceipt, Error>;
}
