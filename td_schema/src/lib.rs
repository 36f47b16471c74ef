//! # TdLib Schema
//!
//! This crate defines the typed objects exchanged with a TdLib JSON engine.
//!
//! ## Philosophy
//!
//! - **Typed, not stringly-typed**: Every request and response is a Rust type
//! - **Self-describing**: Every object carries its `@type` tag on the wire
//! - **Correlatable**: Requests and responses share an optional `@extra` field
//!   used to match a response to the request that produced it
//!
//! ## Architecture
//!
//! - [`Request`] wraps a [`Function`] (what to ask the engine) with an
//!   optional [`CorrelationId`]
//! - [`Response`] wraps a [`TdObject`] (what the engine sent back) with the
//!   echoed [`CorrelationId`], if any
//! - [`Decoder`] turns a raw JSON payload into a [`Response`]; the default
//!   [`SchemaRegistry`] does so through serde

pub mod extra;
pub mod function;
pub mod object;
pub mod registry;

pub use extra::{CorrelationId, ExtraGenerator};
pub use function::{Function, LogStream, Request};
pub use object::{OptionValue, Response, TdObject};
pub use registry::{Decoder, SchemaError, SchemaRegistry, SCHEMA_VERSION};
