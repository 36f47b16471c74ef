//! Request/response correlation over a free-running transport
//!
//! The engine delivers packets whenever it likes: answers to our requests,
//! unsolicited updates, answers to requests someone else is waiting on.
//! `Correlator::query` turns that into a blocking call by tagging the request
//! with a fresh `@extra`, polling until the tagged answer comes back, and
//! parking every other packet in the [`Backlog`] for later `receive` calls.

use crate::backlog::Backlog;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use std::thread;
use std::time::{Duration, Instant};
use td_schema::{Decoder, ExtraGenerator, Request, Response, SchemaRegistry};
use td_transport::Transport;
use tracing::{debug, dispatcher, warn, Dispatch};

/// Whether `receive_with` may answer from the backlog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveMode {
    /// Hand out buffered packets before polling the transport
    DrainBacklog,
    /// Poll the transport even if packets are buffered
    TransportOnly,
}

/// Blocking query layer over a [`Transport`]
///
/// Methods take `&mut self`, so at most one query is in flight per instance.
/// Sharing a correlator between threads needs an external `Mutex`, which
/// then also guards the backlog.
#[derive(Debug)]
pub struct Correlator<T: Transport, D: Decoder = SchemaRegistry> {
    transport: T,
    decoder: D,
    backlog: Backlog,
    extras: ExtraGenerator,
    config: ClientConfig,
    logger: Dispatch,
}

impl<T: Transport> Correlator<T> {
    /// Creates a correlator with the default decoder, config and a silent logger
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            decoder: SchemaRegistry,
            backlog: Backlog::new(),
            extras: ExtraGenerator::new(),
            config: ClientConfig::default(),
            logger: Dispatch::none(),
        }
    }
}

impl<T: Transport, D: Decoder> Correlator<T, D> {
    /// Replaces the decoder
    pub fn with_decoder<E: Decoder>(self, decoder: E) -> Correlator<T, E> {
        Correlator {
            transport: self.transport,
            decoder,
            backlog: self.backlog,
            extras: self.extras,
            config: self.config,
            logger: self.logger,
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Routes this correlator's log events to `logger`
    pub fn with_logger(mut self, logger: Dispatch) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Packets received but not yet handed out
    pub fn backlog(&self) -> &Backlog {
        &self.backlog
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Sends a request without waiting for its answer
    pub fn send(&mut self, request: &Request) -> ClientResult<()> {
        self.log(|| {
            debug!(
                packet = request.type_name(),
                extra = ?request.extra,
                "Sending packet to TdLib"
            )
        });
        self.transport.send(request)?;
        Ok(())
    }

    /// Returns the next packet, oldest backlog entry first
    pub fn receive(&mut self, timeout: Duration) -> ClientResult<Option<Response>> {
        self.receive_with(timeout, ReceiveMode::DrainBacklog)
    }

    /// Returns the next packet
    ///
    /// An `error` object from the engine surfaces as [`ClientError::Remote`]
    /// and is never buffered. Returns `Ok(None)` if the transport delivered
    /// nothing within `timeout`.
    pub fn receive_with(
        &mut self,
        timeout: Duration,
        mode: ReceiveMode,
    ) -> ClientResult<Option<Response>> {
        if mode == ReceiveMode::DrainBacklog {
            if let Some(response) = self.backlog.pop() {
                return Ok(Some(response));
            }
        }

        let payload = match self.transport.receive(timeout)? {
            Some(payload) => payload,
            None => return Ok(None),
        };
        let response = self.decoder.decode(payload)?;

        self.log(|| {
            debug!(
                packet = response.type_name(),
                extra = ?response.extra,
                "Received packet from TdLib"
            )
        });

        if let Some((code, message)) = response.as_error() {
            return Err(ClientError::Remote {
                code,
                message: message.to_string(),
            });
        }

        Ok(Some(response))
    }

    /// Sends `request` and waits for its answer using the configured timeouts
    pub fn query(&mut self, request: Request) -> ClientResult<Response> {
        let overall = self.config.query_timeout;
        let poll = self.config.poll_timeout;
        self.query_with(request, overall, poll)
    }

    /// Sends `request` and waits up to `overall_timeout` for its answer
    ///
    /// The transport is polled in slices of `poll_timeout`; unrelated packets
    /// seen meanwhile are appended to the backlog, also when the query
    /// eventually times out.
    pub fn query_with(
        &mut self,
        mut request: Request,
        overall_timeout: Duration,
        poll_timeout: Duration,
    ) -> ClientResult<Response> {
        let extra = request
            .extra
            .get_or_insert_with(|| self.extras.next_id())
            .clone();

        self.send(&request)?;

        let deadline = Instant::now().checked_add(overall_timeout);
        loop {
            let response = match self.receive_with(poll_timeout, ReceiveMode::TransportOnly)? {
                Some(response) => response,
                None => {
                    if expired(deadline) {
                        return Err(self.timed_out(request));
                    }
                    continue;
                }
            };

            if response.answers(&extra) {
                return Ok(response);
            }

            self.backlog.push(response);

            if expired(deadline) {
                return Err(self.timed_out(request));
            }

            thread::sleep(self.config.poll_interval);
        }
    }

    /// Executes a request synchronously, bypassing correlation entirely
    ///
    /// Only functions the engine accepts synchronously reach the transport;
    /// anything else fails with [`ClientError::NotSynchronous`].
    pub fn execute(&mut self, request: &Request) -> ClientResult<Option<Response>> {
        if !request.function.is_synchronous() {
            return Err(ClientError::NotSynchronous(request.type_name()));
        }

        self.log(|| {
            debug!(
                packet = request.type_name(),
                "Executing packet synchronously"
            )
        });

        let payload = match self.transport.execute(request)? {
            Some(payload) => payload,
            None => return Ok(None),
        };
        let response = self.decoder.decode(payload)?;

        if let Some((code, message)) = response.as_error() {
            return Err(ClientError::Remote {
                code,
                message: message.to_string(),
            });
        }

        Ok(Some(response))
    }

    pub(crate) fn log<R>(&self, event: impl FnOnce() -> R) -> R {
        dispatcher::with_default(&self.logger, event)
    }

    fn timed_out(&self, request: Request) -> ClientError {
        self.log(|| {
            warn!(
                packet = request.type_name(),
                extra = ?request.extra,
                backlog = self.backlog.len(),
                "Query timed out"
            )
        });
        ClientError::QueryTimeout {
            request: Box::new(request),
        }
    }
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.map_or(false, |deadline| Instant::now() > deadline)
}
