//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their structure and are registered under the domain
//! type's name.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The store could not be reached or rejected the operation.
    #[schema(rename = "store_unavailable")]
    StoreUnavailable,
    /// A uniqueness conflict was reported but the stored payment never
    /// became visible.
    #[schema(rename = "conflict_resolution_failed")]
    ConflictResolutionFailed,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "external_id must not be empty")]
    message: String,
    /// Correlation identifier, also sent in the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Store-assigned identifier.
    #[schema(example = 1)]
    id: i64,
    #[schema(example = "Ana")]
    name: String,
    #[schema(example = "a@x.com")]
    email: String,
}

/// OpenAPI schema for [`crate::domain::Payment`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Payment)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PaymentSchema {
    /// Store-assigned identifier.
    #[schema(example = 1)]
    id: i64,
    /// Caller-supplied idempotency key.
    #[schema(example = "ext-1")]
    external_id: String,
    /// Amount in minor units.
    #[schema(example = 1000)]
    amount: i64,
    /// Settlement status; always `SUCCESS`.
    #[schema(example = "SUCCESS")]
    status: String,
}
