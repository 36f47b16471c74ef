//! Startup handshake against the engine's version announcement
//!
//! Right after initialisation the engine emits an unsolicited `updateOption`
//! carrying its version string. That must be the very first packet, and the
//! version must equal the schema version byte for byte; anything else leaves
//! the client in an unknown protocol state.

use crate::config::DEFAULT_HANDSHAKE_TIMEOUT;
use crate::correlator::Correlator;
use crate::error::{ClientError, ClientResult};
use std::time::Duration;
use td_schema::{Decoder, TdObject};
use td_transport::Transport;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionGate {
    expected: String,
    timeout: Duration,
}

impl VersionGate {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }

    /// Sets how long to wait for the announcement
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Consumes the first packet and checks it announces the expected version
    pub fn verify<T: Transport, D: Decoder>(
        &self,
        correlator: &mut Correlator<T, D>,
    ) -> ClientResult<()> {
        let result = self.check(correlator);
        match &result {
            Ok(()) => correlator.log(|| debug!(version = %self.expected, "Engine version verified")),
            Err(err) => correlator.log(|| warn!(error = %err, "Version handshake failed")),
        }
        result
    }

    fn check<T: Transport, D: Decoder>(
        &self,
        correlator: &mut Correlator<T, D>,
    ) -> ClientResult<()> {
        let response = correlator.receive(self.timeout)?.ok_or_else(|| {
            ClientError::ProtocolViolation(
                "expected version announcement, got nothing".to_string(),
            )
        })?;

        let value = match &response.object {
            TdObject::UpdateOption { value, .. } => value,
            other => {
                return Err(ClientError::ProtocolViolation(format!(
                    "expected version announcement \"updateOption\", got \"{}\"",
                    other.type_name()
                )))
            }
        };

        let remote = value.as_str().ok_or_else(|| {
            ClientError::ProtocolViolation(format!(
                "version announcement carries \"{}\" instead of a version string",
                value.type_name()
            ))
        })?;

        if remote != self.expected {
            return Err(ClientError::VersionMismatch {
                remote: remote.to_string(),
                expected: self.expected.clone(),
            });
        }

        Ok(())
    }
}

impl<T: Transport, D: Decoder> Correlator<T, D> {
    /// Runs the version handshake with the configured version and timeout
    pub fn verify_version(&mut self) -> ClientResult<()> {
        let gate = VersionGate::new(self.config().expected_version.clone())
            .with_timeout(self.config().handshake_timeout);
        gate.verify(self)
    }
}
