//! Client configuration
//!
//! Timeouts are expressed in milliseconds on disk and as `Duration` in code.
//! Every field is optional in the JSON form; missing fields take defaults.

use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use td_schema::SCHEMA_VERSION;

/// Default deadline for a whole query
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);
/// Default blocking time of a single transport poll inside a query
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(100);
/// Default pause after a non-matching packet
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);
/// Default wait for the engine's version announcement
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    #[serde(rename = "query_timeout_ms", with = "millis")]
    pub query_timeout: Duration,
    #[serde(rename = "poll_timeout_ms", with = "millis")]
    pub poll_timeout: Duration,
    #[serde(rename = "poll_interval_ms", with = "millis")]
    pub poll_interval: Duration,
    #[serde(rename = "handshake_timeout_ms", with = "millis")]
    pub handshake_timeout: Duration,
    pub expected_version: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            expected_version: SCHEMA_VERSION.to_string(),
        }
    }
}

impl ClientConfig {
    /// Parses and validates a JSON configuration
    pub fn from_json_str(json: &str) -> ClientResult<Self> {
        let config: ClientConfig =
            serde_json::from_str(json).map_err(|err| ClientError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), err))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> ClientResult<()> {
        if self.expected_version.is_empty() {
            return Err(ClientError::Config(
                "expected_version must not be empty".to_string(),
            ));
        }
        if self.poll_timeout.is_zero() {
            return Err(ClientError::Config(
                "poll_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    pub fn with_expected_version(mut self, version: impl Into<String>) -> Self {
        self.expected_version = version.into();
        self
    }
}

mod millis {
    use serde::{ser, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).map_err(ser::Error::custom)?;
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
