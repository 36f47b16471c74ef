//! Transport contract between the client and a TdLib JSON engine.
//!
//! A transport moves encoded requests out and decoded payloads in. Inbound
//! payloads arrive in whatever order the engine produces them; matching them
//! to requests is the client's job, not the transport's.

pub mod scripted;

use serde_json::Value;
use std::time::Duration;
use td_schema::{Request, SchemaError, SchemaRegistry};
use thiserror::Error;

pub use scripted::{ScriptedTransport, Step};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Transport rejected request: {0}")]
    Rejected(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Decoding error: {0}")]
    Decoding(String),
}

impl From<SchemaError> for TransportError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Encode { .. } => TransportError::Encoding(err.to_string()),
            SchemaError::Decode { .. } => TransportError::Decoding(err.to_string()),
        }
    }
}

pub trait Transport {
    /// Queues a request for the engine.
    fn send(&mut self, request: &Request) -> Result<(), TransportError>;

    /// Waits up to `timeout` for the next inbound payload.
    ///
    /// Returns `Ok(None)` when nothing arrived in time.
    fn receive(&mut self, timeout: Duration) -> Result<Option<Value>, TransportError>;

    /// Executes a request synchronously.
    ///
    /// Only a small subset of functions supports this, and it may be used
    /// before the engine is otherwise initialised.
    fn execute(&mut self, request: &Request) -> Result<Option<Value>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, request: &Request) -> Result<(), TransportError> {
        (**self).send(request)
    }

    fn receive(&mut self, timeout: Duration) -> Result<Option<Value>, TransportError> {
        (**self).receive(timeout)
    }

    fn execute(&mut self, request: &Request) -> Result<Option<Value>, TransportError> {
        (**self).execute(request)
    }
}

/// Encodes a request into the JSON text handed to the engine.
pub fn encode_request(request: &Request) -> Result<String, TransportError> {
    let value = SchemaRegistry::encode(request)?;
    serde_json::to_string(&value).map_err(|err| TransportError::Encoding(err.to_string()))
}

/// Decodes JSON text produced by the engine.
///
/// The engine only ever emits JSON objects; anything else is a decoding error.
pub fn decode_payload(text: &str) -> Result<Value, TransportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|err| TransportError::Decoding(err.to_string()))?;
    if !value.is_object() {
        return Err(TransportError::Decoding(format!(
            "expected a JSON object, got: {}",
            text
        )));
    }
    Ok(value)
}
