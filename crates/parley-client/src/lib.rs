//! # JSON-RPC 2.0 Client Invocation Path
//!
//! The calling side of the protocol engine: builds requests out of call
//! arguments, ships them through a pluggable [`Transporter`], and
//! reconciles responses into typed return values or raised errors.
//!
//! A typed client is a plain struct whose methods call
//! [`RpcClient::call_op`] with their operation signatures - no runtime
//! proxy machinery is involved, so equality, hashing and display of such a
//! struct never touch the wire.

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub mod prelude;

// Re-export main types
pub use builder::RequestBuilder;
pub use client::RpcClient;
pub use config::ClientConfig;
pub use error::{ClientResult, RequestError, TransportError};
pub use transport::Transporter;
