//! JSON extractor configuration.
//!
//! Actix answers malformed bodies with a plain-text 400 by default. The
//! handler installed here turns every payload failure into the API's
//! `invalid_request` error so clients see one error shape everywhere.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, web};
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// Upper bound on accepted request bodies.
pub const JSON_LIMIT_BYTES: usize = 16 * 1024;

fn payload_error(err: &JsonPayloadError, req: &HttpRequest) -> Error {
    debug!(path = req.path(), error = %err, "rejected request body");
    Error::invalid_request("request body is not valid JSON for this endpoint")
        .with_details(json!({ "reason": err.to_string() }))
}

/// Extractor configuration registered as app data.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, req| payload_error(&err, req).into())
}
