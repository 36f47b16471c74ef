//! # Wire Contract Tests
//!
//! This crate provides "golden" tests for the JSON objects exchanged with
//! the engine, so the wire format doesn't drift accidentally over time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: Every object's wire form is written out as JSON
//! - **Testability first**: Contract tests fail when a tag or field name changes
//! - **Both directions**: Requests must encode to the golden form, and golden
//!   engine output must decode into the expected object
//!
//! ## Structure
//!
//! - `functions`: requests this client emits
//! - `objects`: packets the engine delivers

pub mod functions;
pub mod objects;

/// Common test helpers for contract validation
pub mod test_helpers {
    use serde::de::DeserializeOwned;
    use serde::Serialize;
    use serde_json::Value;
    use std::fmt::Debug;

    /// Verifies `object` encodes to exactly `golden`
    pub fn verify_encodes_to<T: Serialize>(object: &T, golden: Value) {
        let encoded = serde_json::to_value(object).expect("Failed to encode object");
        assert_eq!(
            encoded, golden,
            "Wire form changed: expected {}, got {}",
            golden, encoded
        );
    }

    /// Verifies `golden` decodes to exactly `expected`
    pub fn verify_decodes_to<T: DeserializeOwned + PartialEq + Debug>(golden: Value, expected: &T) {
        let decoded: T = serde_json::from_value(golden.clone())
            .unwrap_or_else(|err| panic!("Failed to decode {}: {}", golden, err));
        assert_eq!(&decoded, expected, "Decoded object changed for {}", golden);
    }

    /// Verifies the `@type` tag of an encoded object
    pub fn verify_type_tag<T: Serialize>(object: &T, expected_tag: &str) {
        let encoded = serde_json::to_value(object).expect("Failed to encode object");
        assert_eq!(
            encoded["@type"], expected_tag,
            "Type tag changed: expected '{}', got '{}'",
            expected_tag, encoded["@type"]
        );
    }
}
