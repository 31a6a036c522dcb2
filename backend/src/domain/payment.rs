//! Payment data model and the idempotency key it is deduplicated on.
//!
//! A payment is identified twice: by the store-assigned [`PaymentId`] and by
//! the caller-supplied [`ExternalId`]. The store guarantees at most one row
//! per external id; [`PaymentOutcome`] tells callers whether their request
//! created that row or found it already present.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum length of an external identifier, matching the column width.
pub const EXTERNAL_ID_MAX: usize = 255;

/// Validation errors raised while building payment inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentValidationError {
    EmptyExternalId,
    ExternalIdTooLong { max: usize },
    AmountBelowMinimum { min: i64 },
    AmountAboveMaximum { max: i64 },
}

impl fmt::Display for PaymentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyExternalId => write!(f, "external_id must not be empty"),
            Self::ExternalIdTooLong { max } => {
                write!(f, "external_id must be at most {max} characters")
            }
            Self::AmountBelowMinimum { min } => write!(f, "amount must be at least {min}"),
            Self::AmountAboveMaximum { max } => write!(f, "amount must be at most {max}"),
        }
    }
}

impl std::error::Error for PaymentValidationError {}

/// Caller-supplied idempotency key for a payment.
///
/// Keys must contain at least one non-whitespace character; whitespace-only
/// keys are rejected like empty ones. Otherwise the key is stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExternalId(String);

impl ExternalId {
    /// Validate and construct an external identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, PaymentValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(PaymentValidationError::EmptyExternalId);
        }
        if id.chars().count() > EXTERNAL_ID_MAX {
            return Err(PaymentValidationError::ExternalIdTooLong {
                max: EXTERNAL_ID_MAX,
            });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for ExternalId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ExternalId> for String {
    fn from(value: ExternalId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ExternalId {
    type Error = PaymentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Store-assigned payment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(i64);

impl PaymentId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settlement status of a payment. Only successful payments are modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Success,
}

impl PaymentStatus {
    /// Column representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment status: {0}")]
pub struct UnknownPaymentStatus(pub String);

impl FromStr for PaymentStatus {
    type Err = UnknownPaymentStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(Self::Success),
            other => Err(UnknownPaymentStatus(other.to_owned())),
        }
    }
}

/// Persisted payment.
///
/// Serialises as `{"id": 1, "external_id": "abc", "amount": 1000, "status": "SUCCESS"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    id: PaymentId,
    external_id: ExternalId,
    amount: i64,
    status: PaymentStatus,
}

impl Payment {
    pub fn new(id: PaymentId, external_id: ExternalId, amount: i64, status: PaymentStatus) -> Self {
        Self {
            id,
            external_id,
            amount,
            status,
        }
    }

    pub fn id(&self) -> PaymentId {
        self.id
    }

    pub fn external_id(&self) -> &ExternalId {
        &self.external_id
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }
}

/// A payment about to be inserted. The status is always
/// [`PaymentStatus::Success`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    external_id: ExternalId,
    amount: i64,
}

impl NewPayment {
    pub fn new(external_id: ExternalId, amount: i64) -> Self {
        Self {
            external_id,
            amount,
        }
    }

    pub fn external_id(&self) -> &ExternalId {
        &self.external_id
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn status(&self) -> PaymentStatus {
        PaymentStatus::Success
    }

    /// Attach the identifier assigned by the store.
    #[must_use]
    pub fn into_payment(self, id: PaymentId) -> Payment {
        Payment::new(id, self.external_id, self.amount, PaymentStatus::Success)
    }
}

/// Raw payment request as received from a driving adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub external_id: String,
    pub amount: i64,
}

/// Whether a create call persisted a new row or found the existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentOutcome {
    Created,
    AlreadyExists,
}

/// Result of an idempotent payment creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub outcome: PaymentOutcome,
}

impl PaymentReceipt {
    pub fn created(payment: Payment) -> Self {
        Self {
            payment,
            outcome: PaymentOutcome::Created,
        }
    }

    pub fn already_exists(payment: Payment) -> Self {
        Self {
            payment,
            outcome: PaymentOutcome::AlreadyExists,
        }
    }

    /// True when the receipt replays a row written by an earlier request.
    pub fn is_replay(&self) -> bool {
        self.outcome == PaymentOutcome::AlreadyExists
    }
}

/// Inclusive bounds applied to payment amounts.
///
/// The default policy accepts any amount, including zero and negatives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmountPolicy {
    min: Option<i64>,
    max: Option<i64>,
}

impl AmountPolicy {
    #[must_use]
    pub const fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    /// Check an amount against the configured bounds.
    pub fn check(&self, amount: i64) -> Result<i64, PaymentValidationError> {
        if let Some(min) = self.min.filter(|min| amount < *min) {
            return Err(PaymentValidationError::AmountBelowMinimum { min });
        }
        if let Some(max) = self.max.filter(|max| amount > *max) {
            return Err(PaymentValidationError::AmountAboveMaximum { max });
        }
        Ok(amount)
    }
}
