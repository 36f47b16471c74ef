//! # TdLib Client
//!
//! Blocking request/response on top of an engine that answers whenever it
//! likes.
//!
//! ## Philosophy
//!
//! - **Nothing is dropped**: Packets that arrive while a query waits for its
//!   own answer are kept in a FIFO backlog and handed out by later receives
//! - **Failures are values**: Engine-reported errors, timeouts and version
//!   mismatches are distinct [`ClientError`] variants
//! - **Explicit time**: Every blocking call is bounded by a caller-visible
//!   timeout; there are no background threads
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use td_client::Correlator;
//! use td_schema::{Function, Request, TdObject};
//! use td_transport::{ScriptedTransport, Step};
//!
//! let transport = ScriptedTransport::new()
//!     .then(Step::Deliver(json!({"@type": "updateOption", "name": "version",
//!         "value": {"@type": "optionValueString", "value": "1.6.0"}})))
//!     .then(Step::ReplyToLast(json!({"@type": "ok"})));
//!
//! let mut client = Correlator::new(transport);
//! client.verify_version().unwrap();
//!
//! let response = client.query(Request::new(Function::TestCallEmpty)).unwrap();
//! assert_eq!(response.object, TdObject::Ok);
//! ```

pub mod backlog;
pub mod config;
pub mod correlator;
pub mod error;
pub mod log_settings;
pub mod version_gate;

pub use backlog::Backlog;
pub use config::ClientConfig;
pub use correlator::{Correlator, ReceiveMode};
pub use error::{ClientError, ClientResult};
pub use version_gate::VersionGate;
