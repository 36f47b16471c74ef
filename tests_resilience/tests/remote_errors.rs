//! Remote Error Tests
//!
//! Validates that engine-reported errors and decoding failures end the
//! current call with a typed error and never contaminate the backlog.

use serde_json::json;
use std::time::Duration;
use td_client::ClientError;
use td_schema::{Function, Request, TdObject};
use td_transport::{Step, TransportError};
use tests_resilience::{error_packet, numbered_update, scripted_client, sequence_of};

/// Test: An error answer ends the query; earlier traffic stays buffered
#[test]
fn test_error_answer_ends_query() {
    let mut client = scripted_client([
        Step::Deliver(numbered_update(0)),
        Step::ReplyToLast(error_packet(404, "Not Found")),
    ]);

    let err = client
        .query(Request::new(Function::get_option("missing")))
        .unwrap_err();

    assert_eq!(
        err,
        ClientError::Remote {
            code: 404,
            message: "Not Found".to_string()
        }
    );
    assert_eq!(client.backlog().len(), 1);
}

/// Test: An unrelated error aborts the query too
///
/// Errors are not matched against the awaited request; the caller decides
/// whether to retry.
#[test]
fn test_unrelated_error_aborts_query() {
    let mut client = scripted_client([
        Step::Deliver(numbered_update(0)),
        Step::Deliver(json!({"@type": "error", "code": 500, "message": "boom", "@extra": "other"})),
        Step::ReplyToLast(json!({"@type": "ok"})),
    ]);

    let err = client
        .query(Request::new(Function::TestCallEmpty))
        .unwrap_err();
    assert_eq!(err.remote_code(), Some(500));

    // Buffered traffic first, then the late answer.
    let buffered = client.receive(Duration::ZERO).unwrap().unwrap();
    assert_eq!(sequence_of(&buffered), Some(0));
    let late = client.receive(Duration::ZERO).unwrap().unwrap();
    assert_eq!(late.object, TdObject::Ok);
}

/// Test: A decoding failure mid-query leaves the backlog intact
#[test]
fn test_decoding_failure_mid_query() {
    let mut client = scripted_client([
        Step::Deliver(numbered_update(0)),
        Step::Deliver(json!({"@type": "updateNewMessage", "message": {}})),
    ]);

    let err = client
        .query(Request::new(Function::TestCallEmpty))
        .unwrap_err();
    assert!(matches!(err, ClientError::Decoding(_)));
    assert_eq!(client.backlog().len(), 1);
}

/// Test: A transport failure mid-query surfaces as a transport error
#[test]
fn test_transport_failure_mid_query() {
    let mut client = scripted_client([
        Step::Deliver(numbered_update(0)),
        Step::Fail(TransportError::Rejected("engine closed".to_string())),
    ]);

    let err = client
        .query(Request::new(Function::TestCallEmpty))
        .unwrap_err();
    assert_eq!(err, ClientError::Transport("engine closed".to_string()));
    assert_eq!(client.backlog().len(), 1);
}

/// Test: The client keeps working after a failed query
#[test]
fn test_recovery_after_error() {
    let mut client = scripted_client([
        Step::ReplyToLast(error_packet(400, "Bad Request")),
        Step::Deliver(numbered_update(7)),
        Step::ReplyToLast(json!({"@type": "ok"})),
    ]);

    assert!(client.query(Request::new(Function::TestCallEmpty)).is_err());
    let response = client.query(Request::new(Function::TestCallEmpty)).unwrap();
    assert_eq!(response.object, TdObject::Ok);

    let parked = client.receive(Duration::ZERO).unwrap().unwrap();
    assert_eq!(sequence_of(&parked), Some(7));
}
