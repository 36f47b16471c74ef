//! Decoding raw payloads into typed objects

use crate::{Request, Response};
use serde_json::Value;
use thiserror::Error;

/// Schema version this crate was generated against
///
/// The engine announces its own version as the first `updateOption` it
/// emits; the two must be identical.
pub const SCHEMA_VERSION: &str = "1.6.0";

/// Errors converting between JSON payloads and typed objects
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Failed to decode \"{type_name}\" payload: {reason}")]
    Decode { type_name: String, reason: String },

    #[error("Failed to encode \"{type_name}\" request: {reason}")]
    Encode {
        type_name: &'static str,
        reason: String,
    },
}

/// Converts a raw payload into a typed response
pub trait Decoder {
    fn decode(&self, payload: Value) -> Result<Response, SchemaError>;
}

/// Serde-backed decoder covering every known object type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaRegistry;

impl SchemaRegistry {
    /// Encodes a request into its JSON payload
    pub fn encode(request: &Request) -> Result<Value, SchemaError> {
        serde_json::to_value(request).map_err(|err| SchemaError::Encode {
            type_name: request.type_name(),
            reason: err.to_string(),
        })
    }

    /// Decodes a JSON payload into a response
    pub fn from_value(payload: Value) -> Result<Response, SchemaError> {
        let type_name = payload
            .get("@type")
            .and_then(Value::as_str)
            .unwrap_or("<untyped>")
            .to_string();
        serde_json::from_value(payload).map_err(|err| SchemaError::Decode {
            type_name,
            reason: err.to_string(),
        })
    }
}

impl Decoder for SchemaRegistry {
    fn decode(&self, payload: Value) -> Result<Response, SchemaError> {
        Self::from_value(payload)
    }
}
