//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer and the
//! schema wrappers for domain types. The document backs Swagger UI in debug
//! builds and is exported by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::inbound::http::payments::CreatePaymentRequest;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, PaymentSchema, UserSchema};
use crate::inbound::http::users::CreateUserRequest;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payments API",
        description = "Users and idempotent payment creation keyed by external identifier."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::payments::create_payment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        PaymentSchema,
        ErrorSchema,
        ErrorCodeSchema,
        CreateUserRequest,
        CreatePaymentRequest
    )),
    tags(
        (name = "users", description = "Operations related to users"),
        (name = "payments", description = "Idempotent payment creation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
