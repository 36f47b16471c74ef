//! Client error taxonomy

use td_schema::{Request, SchemaError};
use td_transport::TransportError;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Decoding error: {0}")]
    Decoding(String),

    /// The engine answered with an `error` object.
    #[error("Received Error Packet {code}: \"{message}\"")]
    Remote { code: i32, message: String },

    /// No matching response arrived before the deadline.
    #[error("Query for \"{}\" packet received timeout", .request.type_name())]
    QueryTimeout { request: Box<Request> },

    /// The function is outside the engine's synchronous subset.
    #[error("\"{0}\" can't be executed synchronously")]
    NotSynchronous(&'static str),

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Engine version \"{remote}\" doesn't match schema version \"{expected}\"")]
    VersionMismatch { remote: String, expected: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns the engine-reported code for `Remote` errors
    pub fn remote_code(&self) -> Option<i32> {
        match self {
            ClientError::Remote { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns the request that timed out
    pub fn timed_out_request(&self) -> Option<&Request> {
        match self {
            ClientError::QueryTimeout { request } => Some(request),
            _ => None,
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Rejected(reason) => ClientError::Transport(reason),
            TransportError::Encoding(reason) => ClientError::Encoding(reason),
            TransportError::Decoding(reason) => ClientError::Decoding(reason),
        }
    }
}

impl From<SchemaError> for ClientError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Decode { .. } => ClientError::Decoding(err.to_string()),
            SchemaError::Encode { .. } => ClientError::Encoding(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use td_schema::Function;

    #[test]
    fn test_remote_error_message() {
        let err = ClientError::Remote {
            code: 1,
            message: "2".to_string(),
        };
        assert_eq!(err.to_string(), "Received Error Packet 1: \"2\"");
        assert_eq!(err.remote_code(), Some(1));
    }

    #[test]
    fn test_query_timeout_names_request_type() {
        let request = Request::new(Function::get_option("foo"));
        let err = ClientError::QueryTimeout {
            request: Box::new(request.clone()),
        };
        assert_eq!(
            err.to_string(),
            "Query for \"getOption\" packet received timeout"
        );
        assert_eq!(err.timed_out_request(), Some(&request));
        assert_eq!(err.remote_code(), None);
    }

    #[test]
    fn test_version_mismatch_message() {
        let err = ClientError::VersionMismatch {
            remote: "1.5.0".to_string(),
            expected: "1.6.0".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("1.5.0"));
        assert!(msg.contains("1.6.0"));
    }

    #[test]
    fn test_transport_error_mapping() {
        assert_eq!(
            ClientError::from(TransportError::Rejected("down".to_string())),
            ClientError::Transport("down".to_string())
        );
        assert_eq!(
            ClientError::from(TransportError::Encoding("bad".to_string())),
            ClientError::Encoding("bad".to_string())
        );
        assert_eq!(
            ClientError::from(TransportError::Decoding("bad".to_string())),
            ClientError::Decoding("bad".to_string())
        );
    }

    #[test]
    fn test_schema_error_mapping() {
        let err = ClientError::from(SchemaError::Decode {
            type_name: "updateFoo".to_string(),
            reason: "unknown variant".to_string(),
        });
        match err {
            ClientError::Decoding(reason) => assert!(reason.contains("updateFoo")),
            other => panic!("Expected Decoding, got {:?}", other),
        }
    }
}
