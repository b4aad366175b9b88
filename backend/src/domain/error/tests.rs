//! Tests for the domain error payload and its trace correlation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::access_denied("owner"), ErrorCode::AccessDenied)]
#[case(Error::state_conflict("approved"), ErrorCode::StateConflict)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] code: ErrorCode) {
    assert_eq!(error.code(), code);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_substitutes_a_message_when_blank() {
    let error = Error::new(ErrorCode::NotFound, "");
    assert_eq!(error.message(), "not found");
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn with_trace_id_ignores_blank_values(base_error: Error) {
    let error = base_error.with_trace_id(" ");
    assert!(error.trace_id().is_none());
}

#[rstest]
fn unknown_state_echoes_the_literal() {
    let error = Error::unknown_state("SOMETIME");
    assert_eq!(error.code(), ErrorCode::UnknownState);
    assert_eq!(error.message(), "Unknown state: SOMETIME");
    assert_eq!(error.details(), Some(&json!({ "state": "SOMETIME" })));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::not_found("missing") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[tokio::test]
async fn try_from_error_dto_clears_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let dto = ErrorDto {
        code: ErrorCode::InvalidRequest,
        message: "bad".to_owned(),
        trace_id: None,
        details: None,
    };

    let error = TraceId::scope(trace_id, async move {
        Error::try_from(dto).expect("conversion succeeds for valid payload without trace")
    })
    .await;

    assert!(error.trace_id().is_none());
}

#[rstest]
fn serialises_camel_case_and_omits_absent_fields() {
    let error = Error::state_conflict("booking 3 is APPROVED").with_trace_id(TRACE_ID);
    let value = serde_json::to_value(&error).expect("error serialises");

    assert_eq!(
        value,
        json!({
            "code": "state_conflict",
            "message": "booking 3 is APPROVED",
            "traceId": TRACE_ID,
        })
    );
}

#[rstest]
fn deserialisation_rejects_blank_messages() {
    let result = serde_json::from_value::<Error>(json!({
        "code": "not_found",
        "message": "  ",
    }));
    assert!(result.is_err());
}
