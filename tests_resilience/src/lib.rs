//! Resilience Test Utilities
//!
//! This crate provides shared utilities for cross-crate scenario tests.
//!
//! ## Test Philosophy
//!
//! - **Nothing lost under load**: Unrelated traffic survives every query,
//!   including queries that fail
//! - **Deterministic where possible**: Scripted transports for exact
//!   interleavings, a threaded fake engine where real timing matters
//! - **Failures stay typed**: Every failure path ends in a specific `ClientError`

use serde_json::{json, Value};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;
use td_client::{ClientConfig, Correlator};
use td_schema::Request;
use td_transport::{
    decode_payload, encode_request, ScriptedTransport, Step, Transport, TransportError,
};

/// Config with short timeouts suitable for tests
pub fn fast_config() -> ClientConfig {
    ClientConfig::default()
        .with_query_timeout(Duration::from_millis(500))
        .with_poll_timeout(Duration::from_millis(5))
        .with_poll_interval(Duration::from_millis(1))
        .with_handshake_timeout(Duration::from_millis(500))
}

/// Creates a client over a scripted transport
pub fn scripted_client(steps: impl IntoIterator<Item = Step>) -> Correlator<ScriptedTransport> {
    Correlator::new(ScriptedTransport::with_steps(steps)).with_config(fast_config())
}

/// The engine's version announcement
pub fn announcement(version: &str) -> Value {
    json!({
        "@type": "updateOption",
        "name": "version",
        "value": {"@type": "optionValueString", "value": version}
    })
}

/// An unrelated update carrying a sequence number
pub fn numbered_update(seq: i64) -> Value {
    json!({
        "@type": "updateOption",
        "name": "seq",
        "value": {"@type": "optionValueInteger", "value": seq.to_string()}
    })
}

/// An engine-reported error
pub fn error_packet(code: i32, message: &str) -> Value {
    json!({"@type": "error", "code": code, "message": message})
}

/// Extracts the sequence number from a `numbered_update`
pub fn sequence_of(response: &td_schema::Response) -> Option<i64> {
    match &response.object {
        td_schema::TdObject::UpdateOption {
            name,
            value: td_schema::OptionValue::Integer { value },
        } if name == "seq" => Some(*value),
        _ => None,
    }
}

/// Transport backed by in-process channels, with real blocking timeouts
///
/// Requests and packets cross the channel as JSON text, as they would
/// across a native library boundary.
pub struct ChannelTransport {
    outbound: Sender<String>,
    inbound: Receiver<String>,
}

/// The engine's end of a [`ChannelTransport`]
pub struct FakeEngine {
    requests: Receiver<String>,
    packets: Sender<String>,
}

/// Creates a connected transport/engine pair
pub fn channel_pair() -> (ChannelTransport, FakeEngine) {
    let (request_tx, request_rx) = mpsc::channel();
    let (packet_tx, packet_rx) = mpsc::channel();
    (
        ChannelTransport {
            outbound: request_tx,
            inbound: packet_rx,
        },
        FakeEngine {
            requests: request_rx,
            packets: packet_tx,
        },
    )
}

impl Transport for ChannelTransport {
    fn send(&mut self, request: &Request) -> Result<(), TransportError> {
        let text = encode_request(request)?;
        self.outbound
            .send(text)
            .map_err(|_| TransportError::Rejected("engine hung up".to_string()))
    }

    fn receive(&mut self, timeout: Duration) -> Result<Option<Value>, TransportError> {
        match self.inbound.recv_timeout(timeout) {
            Ok(text) => decode_payload(&text).map(Some),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                Err(TransportError::Rejected("engine hung up".to_string()))
            }
        }
    }

    fn execute(&mut self, request: &Request) -> Result<Option<Value>, TransportError> {
        Err(TransportError::Rejected(format!(
            "\"{}\" cannot be executed synchronously over a channel",
            request.type_name()
        )))
    }
}

impl FakeEngine {
    /// Emits a packet; returns false once the client is gone
    pub fn emit(&self, packet: Value) -> bool {
        self.packets.send(packet.to_string()).is_ok()
    }

    /// Emits raw text, which need not be valid JSON
    pub fn emit_raw(&self, text: &str) -> bool {
        self.packets.send(text.to_string()).is_ok()
    }

    /// Waits for the next request the client sent
    pub fn next_request(&self, timeout: Duration) -> Option<Value> {
        let text = self.requests.recv_timeout(timeout).ok()?;
        serde_json::from_str(&text).ok()
    }

    /// Emits `packet` as the answer to `request`, echoing its `@extra`
    pub fn reply(&self, request: &Value, mut packet: Value) -> bool {
        if let (Some(extra), Some(fields)) = (request.get("@extra"), packet.as_object_mut()) {
            fields.insert("@extra".to_string(), extra.clone());
        }
        self.emit(packet)
    }
}
