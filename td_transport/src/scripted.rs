//! Deterministic in-memory transport
//!
//! `ScriptedTransport` plays back a fixed sequence of inbound payloads and
//! records everything sent to it. Nothing here ever blocks: an idle step
//! returns "nothing arrived" immediately, whatever timeout was requested.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use td_transport::{ScriptedTransport, Step};
//!
//! let transport = ScriptedTransport::new()
//!     .then(Step::Deliver(json!({"@type": "updateOption", "name": "a",
//!         "value": {"@type": "optionValueEmpty"}})))
//!     .then(Step::Idle)
//!     .then(Step::ReplyToLast(json!({"@type": "ok"})));
//! assert_eq!(transport.remaining_steps(), 3);
//! ```

use crate::{encode_request, Transport, TransportError};
use serde_json::Value;
use std::collections::VecDeque;
use std::time::Duration;
use td_schema::Request;

/// One scripted outcome of a `receive` call
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Deliver this payload as-is
    Deliver(Value),
    /// Deliver this payload stamped with the `@extra` of the last sent request
    ReplyToLast(Value),
    /// Nothing arrives within the timeout
    Idle,
    /// The receive call fails
    Fail(TransportError),
}

/// Transport that replays a script instead of talking to an engine
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: VecDeque<Step>,
    fallback: Option<Value>,
    execute_replies: VecDeque<Option<Value>>,
    send_failure: Option<TransportError>,
    sent: Vec<Request>,
    executed: Vec<Request>,
    receive_timeouts: Vec<Duration>,
}

impl ScriptedTransport {
    /// Creates a transport with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport from a list of steps
    pub fn with_steps(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: steps.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Appends a step to the script
    pub fn then(mut self, step: Step) -> Self {
        self.script.push_back(step);
        self
    }

    /// Delivers `payload` on every receive once the script is exhausted
    pub fn with_fallback(mut self, payload: Value) -> Self {
        self.fallback = Some(payload);
        self
    }

    /// Queues the reply for the next `execute` call
    pub fn with_execute_reply(mut self, reply: Option<Value>) -> Self {
        self.execute_replies.push_back(reply);
        self
    }

    /// Makes every subsequent `send` fail with `err`
    pub fn fail_sends(mut self, err: TransportError) -> Self {
        self.send_failure = Some(err);
        self
    }

    /// Appends a step to a transport already in use
    pub fn push_step(&mut self, step: Step) {
        self.script.push_back(step);
    }

    /// Requests accepted by `send`, in order
    pub fn sent(&self) -> &[Request] {
        &self.sent
    }

    /// Requests passed to `execute`, in order
    pub fn executed(&self) -> &[Request] {
        &self.executed
    }

    /// Timeout passed to each `receive` call, in order
    pub fn receive_timeouts(&self) -> &[Duration] {
        &self.receive_timeouts
    }

    /// Number of `receive` calls made so far
    pub fn receive_calls(&self) -> usize {
        self.receive_timeouts.len()
    }

    /// Number of steps not yet played
    pub fn remaining_steps(&self) -> usize {
        self.script.len()
    }

    fn stamp_last_extra(&self, mut payload: Value) -> Result<Value, TransportError> {
        let last = self.sent.last().ok_or_else(|| {
            TransportError::Rejected("reply scripted before any request was sent".to_string())
        })?;
        if let (Some(extra), Some(fields)) = (&last.extra, payload.as_object_mut()) {
            fields.insert("@extra".to_string(), Value::String(extra.to_string()));
        }
        Ok(payload)
    }
}

impl Transport for ScriptedTransport {
    fn send(&mut self, request: &Request) -> Result<(), TransportError> {
        if let Some(err) = &self.send_failure {
            return Err(err.clone());
        }
        encode_request(request)?;
        self.sent.push(request.clone());
        Ok(())
    }

    fn receive(&mut self, timeout: Duration) -> Result<Option<Value>, TransportError> {
        self.receive_timeouts.push(timeout);
        match self.script.pop_front() {
            Some(Step::Deliver(payload)) => Ok(Some(payload)),
            Some(Step::ReplyToLast(payload)) => self.stamp_last_extra(payload).map(Some),
            Some(Step::Idle) => Ok(None),
            Some(Step::Fail(err)) => Err(err),
            None => Ok(self.fallback.clone()),
        }
    }

    fn execute(&mut self, request: &Request) -> Result<Option<Value>, TransportError> {
        encode_request(request)?;
        self.executed.push(request.clone());
        Ok(self.execute_replies.pop_front().flatten())
    }
}
