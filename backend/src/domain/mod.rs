//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed entities used by the HTTP and
//! persistence adapters, plus the services that implement the driving ports.
//! Nothing in this module knows about Actix or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable error identifier.
//! - User / NewUser: application users.
//! - Payment / NewPayment / PaymentReceipt: idempotent payments.
//! - PaymentService / UserService: driving port implementations.
//! - TraceId: request-scoped correlation identifier.

pub mod error;
pub mod payment;
pub mod payment_service;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::error::{Error, ErrorCode};
pub use self::payment::{
    AmountPolicy, EXTERNAL_ID_MAX, ExternalId, NewPayment, Payment, PaymentId, PaymentOutcome,
    PaymentReceipt, PaymentRequest, PaymentStatus, PaymentValidationError, UnknownPaymentStatus,
};
pub use self::payment_service::{ConflictRetryPolicy, PaymentService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{NewUser, User, UserId, UserValidationError};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use payments_api::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::invalid_request("amount is required"))
/// }
///
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
