//! Inbound objects
//!
//! Everything the engine delivers (request results, unsolicited updates and
//! error reports) decodes into a [`Response`].

use crate::CorrelationId;
use serde::{Deserialize, Serialize};

/// Object received from the engine
///
/// Immutable once decoded; `extra` is only present when the engine echoes
/// the correlation ID of the request that produced this object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Correlation ID echoed from the originating request
    #[serde(rename = "@extra", default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<CorrelationId>,
    /// The decoded object
    #[serde(flatten)]
    pub object: TdObject,
}

impl Response {
    /// Creates an uncorrelated response
    pub fn new(object: TdObject) -> Self {
        Self {
            extra: None,
            object,
        }
    }

    /// Sets the echoed correlation ID
    pub fn with_extra(mut self, extra: CorrelationId) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Returns the `@type` tag of the wrapped object
    pub fn type_name(&self) -> &'static str {
        self.object.type_name()
    }

    /// Checks if this response answers the request tagged with `extra`
    pub fn answers(&self, extra: &CorrelationId) -> bool {
        self.extra.as_ref() == Some(extra)
    }

    /// Returns the code and message if this is an error object
    pub fn as_error(&self) -> Option<(i32, &str)> {
        match &self.object {
            TdObject::Error { code, message } => Some((*code, message.as_str())),
            _ => None,
        }
    }
}

impl From<TdObject> for Response {
    fn from(object: TdObject) -> Self {
        Self::new(object)
    }
}

/// Objects the engine can deliver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type", rename_all = "camelCase")]
pub enum TdObject {
    /// Request succeeded without a result value
    Ok,
    /// Request failed, or the engine reported a failure
    Error { code: i32, message: String },
    /// An option changed its value
    UpdateOption { name: String, value: OptionValue },
    /// Result of `getOption` for a boolean option
    OptionValueBoolean { value: bool },
    /// Result of `getOption` for an unset option
    OptionValueEmpty,
    /// Result of `getOption` for an integer option
    OptionValueInteger {
        #[serde(with = "int64")]
        value: i64,
    },
    /// Result of `getOption` for a string option
    OptionValueString { value: String },
    /// Result of `getLogVerbosityLevel`
    LogVerbosityLevel { verbosity_level: i32 },
}

impl TdObject {
    /// Creates an error object
    pub fn error(code: i32, message: impl Into<String>) -> Self {
        TdObject::Error {
            code,
            message: message.into(),
        }
    }

    /// Creates an option update
    pub fn update_option(name: impl Into<String>, value: OptionValue) -> Self {
        TdObject::UpdateOption {
            name: name.into(),
            value,
        }
    }

    /// Returns the `@type` tag
    pub fn type_name(&self) -> &'static str {
        match self {
            TdObject::Ok => "ok",
            TdObject::Error { .. } => "error",
            TdObject::UpdateOption { .. } => "updateOption",
            TdObject::OptionValueBoolean { .. } => "optionValueBoolean",
            TdObject::OptionValueEmpty => "optionValueEmpty",
            TdObject::OptionValueInteger { .. } => "optionValueInteger",
            TdObject::OptionValueString { .. } => "optionValueString",
            TdObject::LogVerbosityLevel { .. } => "logVerbosityLevel",
        }
    }

    /// Checks if this is the error object
    pub fn is_error(&self) -> bool {
        matches!(self, TdObject::Error { .. })
    }

    /// Converts a `getOption` result into the option value it carries
    pub fn into_option_value(self) -> Option<OptionValue> {
        match self {
            TdObject::OptionValueBoolean { value } => Some(OptionValue::Boolean { value }),
            TdObject::OptionValueEmpty => Some(OptionValue::Empty),
            TdObject::OptionValueInteger { value } => Some(OptionValue::Integer { value }),
            TdObject::OptionValueString { value } => Some(OptionValue::String { value }),
            _ => None,
        }
    }
}

/// Value of an option, as nested inside `updateOption` and `setOption`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum OptionValue {
    #[serde(rename = "optionValueBoolean")]
    Boolean { value: bool },
    #[serde(rename = "optionValueEmpty")]
    Empty,
    #[serde(rename = "optionValueInteger")]
    Integer {
        #[serde(with = "int64")]
        value: i64,
    },
    #[serde(rename = "optionValueString")]
    String { value: String },
}

impl OptionValue {
    /// Creates a string option value
    pub fn string(value: impl Into<String>) -> Self {
        OptionValue::String {
            value: value.into(),
        }
    }

    /// Returns the `@type` tag
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Boolean { .. } => "optionValueBoolean",
            OptionValue::Empty => "optionValueEmpty",
            OptionValue::Integer { .. } => "optionValueInteger",
            OptionValue::String { .. } => "optionValueString",
        }
    }

    /// Returns the string value, if this is a string option
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String { value } => Some(value.as_str()),
            _ => None,
        }
    }
}

/// 64-bit integers travel as JSON strings; numbers are accepted on input.
mod int64 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(i64),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(text) => text.parse().map_err(de::Error::custom),
            Repr::Number(number) => Ok(number),
        }
    }
}
