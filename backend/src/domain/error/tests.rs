//! Tests for domain error construction and serialisation.

use super::*;
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest, "invalid_request")]
#[case(Error::store_unavailable("down"), ErrorCode::StoreUnavailable, "store_unavailable")]
#[case(
    Error::conflict_resolution_failed("lost"),
    ErrorCode::ConflictResolutionFailed,
    "conflict_resolution_failed"
)]
#[case(Error::internal("boom"), ErrorCode::InternalError, "internal_error")]
fn constructors_set_code_and_serialise_snake_case(
    #[case] error: Error,
    #[case] expected: ErrorCode,
    #[case] wire: &str,
) {
    assert_eq!(error.code(), expected);
    let value = serde_json::to_value(&error).expect("error serialises");
    assert_eq!(value.get("code").and_then(Value::as_str), Some(wire));
}

#[test]
fn optional_fields_are_omitted_when_absent() {
    let value = serde_json::to_value(Error::invalid_request("bad")).expect("error serialises");
    assert!(value.get("traceId").is_none());
    assert!(value.get("details").is_none());
}

#[test]
fn details_and_trace_id_are_serialised_in_camel_case() {
    let error = Error::invalid_request("bad")
        .with_trace_id("abc")
        .with_details(json!({ "field": "amount" }));
    let value = serde_json::to_value(&error).expect("error serialises");

    assert_eq!(value.get("traceId").and_then(Value::as_str), Some("abc"));
    assert_eq!(
        value.pointer("/details/field").and_then(Value::as_str),
        Some("amount")
    );
}

#[test]
fn display_uses_message() {
    assert_eq!(Error::store_unavailable("store down").to_string(), "store down");
}

#[tokio::test]
async fn new_captures_scoped_trace_id() {
    let trace_id = TraceId::from_uuid(Uuid::nil());
    let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(Uuid::nil().to_string().as_str()));
}

#[test]
fn new_without_scope_has_no_trace_id() {
    assert!(Error::internal("boom").trace_id().is_none());
}
