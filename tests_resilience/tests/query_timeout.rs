//! Query Timeout Tests
//!
//! Validates that a query gives up at its deadline even under continuous
//! unrelated traffic, and that everything seen before giving up is still
//! delivered afterwards.

use std::thread;
use std::time::{Duration, Instant};
use td_client::{ClientError, Correlator};
use td_schema::{Function, Request};
use td_transport::ScriptedTransport;
use tests_resilience::{channel_pair, fast_config, numbered_update, sequence_of};

/// Test: Continuous unrelated traffic cannot extend the deadline
///
/// A fake engine streams numbered updates and never answers. The query must
/// time out close to its deadline, and every update it saw must come back
/// out of the backlog in order, followed by the live stream.
#[test]
fn test_timeout_under_continuous_traffic() {
    let (transport, engine) = channel_pair();
    let streamer = thread::spawn(move || {
        for seq in 0..2_000 {
            if !engine.emit(numbered_update(seq)) {
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
    });

    let mut client = Correlator::new(transport).with_config(fast_config());
    let overall = Duration::from_millis(50);
    let started = Instant::now();

    let err = client
        .query_with(
            Request::new(Function::get_option("never-answered")),
            overall,
            Duration::from_millis(5),
        )
        .unwrap_err();

    assert!(matches!(err, ClientError::QueryTimeout { .. }));
    assert!(started.elapsed() < Duration::from_secs(2));

    let buffered = client.backlog().len();
    assert!(buffered > 0, "stream should have produced packets");

    let mut expected = 0;
    for _ in 0..buffered + 5 {
        let response = client
            .receive(Duration::from_secs(1))
            .expect("receive should succeed")
            .expect("engine is still streaming");
        assert_eq!(sequence_of(&response), Some(expected));
        expected += 1;
    }

    drop(client);
    streamer.join().expect("streamer thread panicked");
}

/// Test: An idle engine times out without buffering anything
#[test]
fn test_timeout_on_idle_engine() {
    let (transport, _engine) = channel_pair();
    let mut client = Correlator::new(transport).with_config(fast_config());

    let err = client
        .query_with(
            Request::new(Function::TestCallEmpty),
            Duration::from_millis(20),
            Duration::from_millis(5),
        )
        .unwrap_err();

    let request = err.timed_out_request().expect("timeout carries the request");
    assert_eq!(request.function, Function::TestCallEmpty);
    assert!(client.backlog().is_empty());
}

/// Test: A zero deadline still sends the request exactly once
#[test]
fn test_zero_deadline_sends_once() {
    let mut client = Correlator::new(ScriptedTransport::new());

    let err = client
        .query_with(
            Request::new(Function::get_option("foo")),
            Duration::ZERO,
            Duration::from_millis(100),
        )
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Query for \"getOption\" packet received timeout"
    );
    assert_eq!(client.transport().sent().len(), 1);
    assert!(client.transport().receive_calls() >= 1);
}
