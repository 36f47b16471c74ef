//! Outbound requests
//!
//! A request is a [`Function`] plus an optional `@extra` correlation ID.
//! The ID starts unset and is filled in by whoever sends the request.

use crate::{CorrelationId, OptionValue};
use serde::{Deserialize, Serialize};

/// Request sent to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Correlation ID echoed back on the response
    #[serde(rename = "@extra", default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<CorrelationId>,
    /// The function to invoke
    #[serde(flatten)]
    pub function: Function,
}

impl Request {
    /// Creates a request without a correlation ID
    pub fn new(function: Function) -> Self {
        Self {
            extra: None,
            function,
        }
    }

    /// Sets the correlation ID
    pub fn with_extra(mut self, extra: CorrelationId) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Returns the `@type` tag of the wrapped function
    pub fn type_name(&self) -> &'static str {
        self.function.type_name()
    }
}

impl From<Function> for Request {
    fn from(function: Function) -> Self {
        Self::new(function)
    }
}

/// Functions understood by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type", rename_all = "camelCase")]
pub enum Function {
    /// Returns the value of an option by its name
    GetOption { name: String },
    /// Sets the value of an option; `None` resets it to the default
    SetOption {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<OptionValue>,
    },
    /// Returns the current verbosity level of the internal log
    GetLogVerbosityLevel,
    /// Sets the verbosity level of the internal log
    SetLogVerbosityLevel { new_verbosity_level: i32 },
    /// Sets the destination of the internal log
    SetLogStream { log_stream: LogStream },
    /// Closes the engine instance
    Close,
    /// Does nothing; used to test the round trip
    TestCallEmpty,
}

impl Function {
    /// Creates a `getOption` function
    pub fn get_option(name: impl Into<String>) -> Self {
        Function::GetOption { name: name.into() }
    }

    /// Returns the `@type` tag
    pub fn type_name(&self) -> &'static str {
        match self {
            Function::GetOption { .. } => "getOption",
            Function::SetOption { .. } => "setOption",
            Function::GetLogVerbosityLevel => "getLogVerbosityLevel",
            Function::SetLogVerbosityLevel { .. } => "setLogVerbosityLevel",
            Function::SetLogStream { .. } => "setLogStream",
            Function::Close => "close",
            Function::TestCallEmpty => "testCallEmpty",
        }
    }

    /// Checks if the engine accepts this function through synchronous execution
    pub fn is_synchronous(&self) -> bool {
        matches!(
            self,
            Function::GetLogVerbosityLevel
                | Function::SetLogVerbosityLevel { .. }
                | Function::SetLogStream { .. }
        )
    }
}

/// Destination of the engine's internal log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@type", rename_all = "camelCase")]
pub enum LogStream {
    /// Log to stderr
    LogStreamDefault,
    /// Log to a file, rotated once it exceeds `max_file_size` bytes
    LogStreamFile { path: String, max_file_size: i64 },
    /// Discard the log
    LogStreamEmpty,
}

impl LogStream {
    /// Creates a file log stream
    pub fn file(path: impl Into<String>, max_file_size: i64) -> Self {
        LogStream::LogStreamFile {
            path: path.into(),
            max_file_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_without_extra_omits_field() {
        let request = Request::new(Function::get_option("foo"));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"@type": "getOption", "name": "foo"}));
    }

    #[test]
    fn test_request_with_extra() {
        let request = Request::new(Function::get_option("foo")).with_extra("q-1".into());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"@type": "getOption", "name": "foo", "@extra": "q-1"})
        );
    }

    #[test]
    fn test_type_name_matches_wire_tag() {
        let functions = vec![
            Function::get_option("a"),
            Function::SetOption {
                name: "a".to_string(),
                value: None,
            },
            Function::GetLogVerbosityLevel,
            Function::SetLogVerbosityLevel {
                new_verbosity_level: 2,
            },
            Function::SetLogStream {
                log_stream: LogStream::LogStreamEmpty,
            },
            Function::Close,
            Function::TestCallEmpty,
        ];

        for function in functions {
            let value = serde_json::to_value(&function).unwrap();
            assert_eq!(value["@type"], function.type_name());
        }
    }

    #[test]
    fn test_synchronous_subset() {
        assert!(Function::GetLogVerbosityLevel.is_synchronous());
        assert!(Function::SetLogStream {
            log_stream: LogStream::LogStreamDefault
        }
        .is_synchronous());
        assert!(!Function::get_option("version").is_synchronous());
        assert!(!Function::Close.is_synchronous());
    }
}
