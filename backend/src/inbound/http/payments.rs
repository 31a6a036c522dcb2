//! Payments API handler.
//!
//! ```text
//! POST /payments {"external_id":"ext-1","amount":1000}
//! ```
//!
//! Both outcomes answer 200 with the stored payment. A replay of an earlier
//! request is flagged with the `Idempotent-Replayed: true` header.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::PaymentRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, PaymentSchema};
use crate::inbound::http::state::HttpState;

/// Response header set when the payment already existed.
pub const IDEMPOTENT_REPLAYED_HEADER: &str = "Idempotent-Replayed";

/// Request body for `POST /payments`.
///
/// Example JSON: `{"external_id":"ext-1","amount":1000}`
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreatePaymentRequest {
    /// Caller-supplied idempotency key.
    #[schema(example = "ext-1")]
    pub external_id: String,
    /// Amount in minor units.
    #[schema(example = 1000)]
    pub amount: i64,
}

impl From<CreatePaymentRequest> for PaymentRequest {
    fn from(value: CreatePaymentRequest) -> Self {
        Self {
            external_id: value.external_id,
            amount: value.amount,
        }
    }
}

/// Create a payment, or return the one already stored for `external_id`.
#[utoipa::path(
    post,
    path = "/payments",
    request_body = CreatePaymentRequest,
    responses(
        (
            status = 200,
            description = "Payment created or already present",
            body = PaymentSchema,
            headers(
                ("Idempotent-Replayed" = String, description = "Present with value `true` when the payment already existed")
            )
        ),
        (status = 400, description = "Malformed body or validation failure", body = ErrorSchema),
        (status = 500, description = "Store unavailable or conflict unresolved", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "createPayment"
)]
#[post("/payments")]
pub async fn create_payment(
    state: web::Data<HttpState>,
    payload: web::Json<CreatePaymentRequest>,
) -> ApiResult<HttpResponse> {
    let receipt = state
        .payments
        .create_payment(payload.into_inner().into())
        .await?;

    let mut response = HttpResponse::Ok();
    if receipt.is_replay() {
        response.insert_header((IDEMPOTENT_REPLAYED_HEADER, "true"));
    }
    Ok(response.json(receipt.payment))
}
